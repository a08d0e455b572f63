//! Review Page Extraction Library
//!
//! Turns the publicly rendered review pages of Trustpilot and Sitejabber into
//! normalized [`Review`] records. Extraction is best-effort: every field has a
//! documented default, and a single malformed card never aborts a page.
//!
//! # Usage
//!
//! ```rust,ignore
//! use review_extraction::{HttpFetcher, PageFetcher, ReviewAdapter, TrustpilotAdapter};
//!
//! let fetcher = HttpFetcher::new()?;
//! let adapter = TrustpilotAdapter::new();
//!
//! let html = fetcher.fetch("https://nl.trustpilot.com/review/example.com").await?;
//! let batch = adapter.parse(&html, chrono::Utc::now());
//! for review in &batch.reviews {
//!     println!("{} {}/5", review.reviewer_name, review.rating);
//! }
//! ```
//!
//! # Modules
//!
//! - [`extract`] - Card locating and per-field fallback rules
//! - [`sources`] - Source adapters (Trustpilot, Sitejabber)
//! - [`normalize`] - Canonical record assembly and source-qualified ids
//! - [`fetch`] - Page fetch trait and reqwest implementation
//! - [`types`] - Review, batch and source types
//! - [`testing`] - Mock fetcher and HTML fixture builders

pub mod error;
pub mod extract;
pub mod fetch;
pub mod normalize;
pub mod sources;
pub mod testing;
pub mod types;

pub use error::{CardError, FetchError, FetchResult, ParseError, ParseResult, ScrapeError};
pub use extract::{first_match, CardLocator, CardProfile, FieldRule};
pub use fetch::{FetchConfig, HttpFetcher, PageFetcher};
pub use normalize::{normalize, LocalKey, RawReview, ReviewId};
pub use sources::{scrape, ReviewAdapter, SitejabberAdapter, TrustpilotAdapter, SITEJABBER_CARD_LIMIT};
pub use types::{
    batch::SourceBatch,
    review::{
        Review, ReviewSource, ANONYMOUS_REVIEWER, DEFAULT_RATING, DEFAULT_REVIEW_TEXT,
        SITEJABBER_VERIFIED,
    },
};
