// Review Sync - Server Core
//
// Periodically scrapes Trustpilot and Sitejabber review pages, upserts the
// normalized reviews into Supabase, and serves the last run report over a
// small diagnostics API.

pub mod config;
pub mod domains;
pub mod kernel;
pub mod server;

pub use config::*;
