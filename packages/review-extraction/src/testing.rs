//! Testing utilities: a mock fetcher and HTML fixture builders.
//!
//! These let applications exercise the full fetch → parse path without
//! network access.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::error::{FetchError, FetchResult};
use crate::fetch::PageFetcher;

#[derive(Debug, Clone)]
enum MockResponse {
    Page(String),
    Status(u16),
    Timeout,
}

/// Fetcher that serves canned pages per URL and records every call.
///
/// Unknown URLs answer with HTTP 404.
#[derive(Debug, Clone, Default)]
pub struct MockFetcher {
    responses: Arc<RwLock<HashMap<String, MockResponse>>>,
    calls: Arc<RwLock<Vec<String>>>,
}

impl MockFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `html` for `url`.
    pub fn with_page(self, url: impl Into<String>, html: impl Into<String>) -> Self {
        self.responses
            .write()
            .unwrap()
            .insert(url.into(), MockResponse::Page(html.into()));
        self
    }

    /// Answer `url` with a non-success status.
    pub fn with_status(self, url: impl Into<String>, status: u16) -> Self {
        self.responses
            .write()
            .unwrap()
            .insert(url.into(), MockResponse::Status(status));
        self
    }

    /// Make `url` time out.
    pub fn with_timeout(self, url: impl Into<String>) -> Self {
        self.responses
            .write()
            .unwrap()
            .insert(url.into(), MockResponse::Timeout);
        self
    }

    /// Replace the page served for `url` (e.g. between pipeline cycles).
    pub fn set_page(&self, url: impl Into<String>, html: impl Into<String>) {
        self.responses
            .write()
            .unwrap()
            .insert(url.into(), MockResponse::Page(html.into()));
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.read().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.read().unwrap().len()
    }
}

#[async_trait]
impl PageFetcher for MockFetcher {
    async fn fetch(&self, url: &str) -> FetchResult<String> {
        self.calls.write().unwrap().push(url.to_string());

        let response = self.responses.read().unwrap().get(url).cloned();
        match response {
            Some(MockResponse::Page(html)) => Ok(html),
            Some(MockResponse::Status(status)) => Err(FetchError::Status {
                url: url.to_string(),
                status,
            }),
            Some(MockResponse::Timeout) => Err(FetchError::Timeout {
                url: url.to_string(),
            }),
            None => Err(FetchError::Status {
                url: url.to_string(),
                status: 404,
            }),
        }
    }
}

// =============================================================================
// Trustpilot fixtures
// =============================================================================

/// One entry of Trustpilot's embedded review list.
pub fn trustpilot_entry(
    id: &str,
    name: &str,
    rating: u8,
    text: &str,
    published: &str,
    verified: bool,
) -> serde_json::Value {
    let verifications = if verified {
        serde_json::json!([{ "verificationSource": "invitation" }])
    } else {
        serde_json::json!([])
    };

    serde_json::json!({
        "id": id,
        "rating": rating,
        "text": text,
        "title": "Review",
        "consumer": { "displayName": name, "countryCode": "NL" },
        "dates": { "publishedDate": published, "experiencedDate": null },
        "verifications": verifications,
    })
}

/// A Trustpilot page carrying `entries` in its `__NEXT_DATA__` payload.
pub fn trustpilot_embedded_page(entries: &[serde_json::Value]) -> String {
    let data = serde_json::json!({
        "props": { "pageProps": { "reviews": entries, "businessUnit": { "numberOfReviews": entries.len() } } },
        "page": "/review/[businessUnit]",
    });

    format!(
        r#"<!DOCTYPE html><html><head><title>Reviews</title></head><body><div id="__next"></div><script id="__NEXT_DATA__" type="application/json">{}</script></body></html>"#,
        data
    )
}

/// A rendered Trustpilot review card using the current markup.
pub fn trustpilot_card(
    review_id: &str,
    name: &str,
    text: &str,
    star_alt: Option<&str>,
    datetime: Option<&str>,
) -> String {
    let rating = star_alt
        .map(|alt| {
            format!(r#"<div data-service-review-rating="x"><img src="/stars.svg" alt="{alt}"></div>"#)
        })
        .unwrap_or_default();
    let time = datetime
        .map(|dt| format!(r#"<time datetime="{dt}">{dt}</time>"#))
        .unwrap_or_default();

    format!(
        r#"<article data-service-review-card-paper="true">
  <aside><span data-consumer-name-typography="true">{name}</span></aside>
  <section>{rating}{time}
    <a href="/reviews/{review_id}"><h2>Title</h2></a>
    <p data-service-review-text-typography="true">{text}</p>
  </section>
</article>"#
    )
}

// =============================================================================
// Sitejabber fixtures
// =============================================================================

/// A rendered Sitejabber review card using the current markup.
pub fn sitejabber_card(name: &str, text: &str, rating: u8, date: Option<&str>) -> String {
    let time = date
        .map(|d| format!(r#"<time datetime="{d}">{d}</time>"#))
        .unwrap_or_default();

    format!(
        r#"<div class="review" data-review-id="r">
  <div data-testid="review-author">{name}</div>
  <div class="review__stars"><img src="/stars.png" alt="{rating} out of 5 stars"></div>
  {time}
  <p class="review__text">{text}</p>
</div>"#
    )
}

/// Wrap pre-rendered cards into a full listing page.
pub fn listing_page(cards: &[String]) -> String {
    format!(
        "<!DOCTYPE html><html><head><title>Reviews</title></head><body><main>{}</main></body></html>",
        cards.join("\n")
    )
}
