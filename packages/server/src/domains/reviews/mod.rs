//! Reviews domain - the scrape → normalize → upsert cycle and its run report
//!
//! # Components
//!
//! - `pipeline` - Runs every configured source once per cycle (single-flight)
//! - `report` - Per-cycle outcome: counts, rating breakdown, tagged errors
//! - `diagnostics` - Latest published report, swapped atomically per cycle

pub mod diagnostics;
pub mod pipeline;
pub mod report;

pub use diagnostics::Diagnostics;
pub use pipeline::{ReviewPipeline, SourceTarget};
pub use report::{RunErrorKind, RunReport, RunReportBuilder, SourceReport};
