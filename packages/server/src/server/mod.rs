// HTTP server setup (Axum diagnostics endpoints)
pub mod app;
pub mod routes;

pub use app::*;
