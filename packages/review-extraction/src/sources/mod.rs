//! Source adapters: one per review platform.
//!
//! An adapter only understands page content. Fetching is done by the caller
//! through a [`PageFetcher`], so adapters are pure functions of the HTML and
//! the scrape instant and can be tested on fixtures.

pub mod sitejabber;
pub mod trustpilot;

pub use sitejabber::{SitejabberAdapter, SITEJABBER_CARD_LIMIT};
pub use trustpilot::TrustpilotAdapter;

use chrono::{DateTime, Utc};
use scraper::{ElementRef, Html};
use tracing::info;

use crate::error::{CardError, FetchResult};
use crate::extract::CardProfile;
use crate::fetch::PageFetcher;
use crate::normalize::{normalize, LocalKey};
use crate::types::{ReviewSource, SourceBatch};

/// Turns one platform's listing page into canonical reviews.
pub trait ReviewAdapter: Send + Sync {
    fn source(&self) -> ReviewSource;

    /// Extract every review on the page. Never fails: page-level and
    /// card-level problems are recorded in the returned batch.
    fn parse(&self, html: &str, scraped_at: DateTime<Utc>) -> SourceBatch;
}

/// Fetch `url` and run the adapter over it.
///
/// Only a fetch failure is returned as an error; everything after the page
/// arrives degrades into the batch.
pub async fn scrape(
    adapter: &dyn ReviewAdapter,
    fetcher: &dyn PageFetcher,
    url: &str,
) -> FetchResult<SourceBatch> {
    let html = fetcher.fetch(url).await?;
    let batch = adapter.parse(&html, Utc::now());

    info!(
        source = %adapter.source(),
        reviews = batch.reviews.len(),
        errors = batch.errors.len(),
        "Parsed review page"
    );

    Ok(batch)
}

/// Per-card loop shared by every card-markup variant.
pub(crate) struct CardPass<'p> {
    pub profile: &'p CardProfile,
    pub limit: usize,
    /// Platform review id on the card, if the markup exposes one
    pub local_id: fn(ElementRef<'_>) -> Option<String>,
    /// Forces the verified flag regardless of card content
    pub verified_override: Option<bool>,
}

impl CardPass<'_> {
    pub fn run(&self, document: &Html, scraped_at: DateTime<Utc>, batch: &mut SourceBatch) {
        for (index, card) in self.profile.locator.locate(document).take(self.limit).enumerate() {
            let mut raw = self.profile.extract(card);
            if raw.is_empty() {
                batch.push_card_error(CardError::NoContent { index });
                continue;
            }
            if let Some(verified) = self.verified_override {
                raw.verified = Some(verified);
            }

            let local_id = (self.local_id)(card);
            let key = match local_id.as_deref() {
                Some(id) => LocalKey::Platform(id),
                None => LocalKey::NameAndDate,
            };
            batch.push_review(normalize(batch.source, key, raw, scraped_at));
        }
    }
}
