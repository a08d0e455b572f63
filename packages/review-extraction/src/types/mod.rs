//! Domain types for review extraction.

pub mod batch;
pub mod review;

pub use batch::SourceBatch;
pub use review::{Review, ReviewSource};
