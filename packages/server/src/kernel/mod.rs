//! Kernel module - server infrastructure and dependencies.

pub mod deps;
pub mod scheduled_tasks;
pub mod test_dependencies;
pub mod traits;

pub use deps::{ServerDeps, SupabaseReviewStore, REVIEWS_TABLE};
pub use scheduled_tasks::start_scheduler;
pub use test_dependencies::{MockReviewStore, TestDependencies};
pub use traits::*;

// Re-export the scraping seams so callers can assemble deps from one place
pub use review_extraction::{HttpFetcher, PageFetcher, ReviewAdapter};
