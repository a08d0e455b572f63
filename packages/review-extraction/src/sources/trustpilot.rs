//! Trustpilot review pages.
//!
//! Trustpilot is a Next.js site and usually ships the full review list as
//! JSON in `<script id="__NEXT_DATA__">`. That payload is preferred when it is
//! present and well formed. When it is missing or malformed, the rendered
//! review cards are scraped instead, so both variants sit behind the same
//! [`ReviewAdapter`] and the page content decides which one runs.

use chrono::{DateTime, Utc};
use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::sync::LazyLock;
use tracing::debug;

use super::{CardPass, ReviewAdapter};
use crate::error::{CardError, ParseError, ParseResult};
use crate::extract::rules::{
    attr_of, has_match, rating_from_alt, rating_from_class, text_of, STAR_ALT_RULE,
    TIME_MARKER_RULES,
};
use crate::extract::{CardLocator, CardProfile, FieldRule};
use crate::normalize::{normalize, LocalKey, RawReview};
use crate::types::{ReviewSource, SourceBatch};

/// JSON pointer to the review list inside the Next.js page props.
const REVIEWS_POINTER: &str = "/props/pageProps/reviews";
const REVIEWS_PATH: &str = "props.pageProps.reviews";

static NEXT_DATA: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("script#__NEXT_DATA__").unwrap());

static CARD: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("article[data-service-review-card-paper]").unwrap());
static CARD_ATTR_ALT: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("[data-review-id]").unwrap());
static CARD_MICRODATA: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("[itemprop='review']").unwrap());
static CARD_CLASS: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("article[class*='reviewCard'], article.review").unwrap());

static CARD_SELECTORS: [&LazyLock<Selector>; 4] =
    [&CARD, &CARD_ATTR_ALT, &CARD_MICRODATA, &CARD_CLASS];

static NAME_ATTR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("[data-consumer-name-typography]").unwrap());
static NAME_TAG: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("span[class*='consumerName'], .consumer-name").unwrap());
static NAME_LINK: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("a[data-consumer-profile-link], a[href^='/users/']").unwrap()
});

static TEXT_PARAGRAPH: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("p[data-service-review-text-typography]").unwrap());
static TEXT_CONTAINER: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("[class*='reviewContent'], .review-content").unwrap()
});
static TEXT_MICRODATA: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("[itemprop='reviewBody']").unwrap());

static RATING_IMG: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("[data-service-review-rating] img[alt]").unwrap());
static RATING_CLASS: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("[data-service-review-rating], [class*='star-rating']").unwrap()
});

static VERIFIED_LABEL: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("[data-review-label-tooltip-trigger], [class*='verified']").unwrap()
});
static REVIEW_LINK: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a[href*='/reviews/']").unwrap());

fn name_attr(card: ElementRef<'_>) -> Option<String> {
    text_of(card, &NAME_ATTR)
}

fn name_tag(card: ElementRef<'_>) -> Option<String> {
    text_of(card, &NAME_TAG)
}

fn name_link(card: ElementRef<'_>) -> Option<String> {
    text_of(card, &NAME_LINK)
}

fn text_paragraph(card: ElementRef<'_>) -> Option<String> {
    text_of(card, &TEXT_PARAGRAPH)
}

fn text_container(card: ElementRef<'_>) -> Option<String> {
    text_of(card, &TEXT_CONTAINER)
}

fn text_microdata(card: ElementRef<'_>) -> Option<String> {
    text_of(card, &TEXT_MICRODATA)
}

fn rating_img(card: ElementRef<'_>) -> Option<u8> {
    rating_from_alt(card, &RATING_IMG)
}

fn rating_class(card: ElementRef<'_>) -> Option<u8> {
    rating_from_class(card, &RATING_CLASS)
}

fn verified_label(card: ElementRef<'_>) -> Option<bool> {
    has_match(card, &VERIFIED_LABEL).then_some(true)
}

/// Review id from the card's permalink (`/reviews/<id>`), matching the id
/// used in the embedded payload.
fn review_link_id(card: ElementRef<'_>) -> Option<String> {
    card.value()
        .attr("data-review-id")
        .map(str::to_string)
        .or_else(|| attr_of(card, &REVIEW_LINK, "href"))
        .and_then(|href| {
            let path = href.split(['?', '#']).next().unwrap_or_default();
            path.trim_end_matches('/')
                .rsplit('/')
                .next()
                .filter(|segment| !segment.is_empty())
                .map(str::to_string)
        })
}

static PROFILE: CardProfile = CardProfile {
    locator: CardLocator::new(&CARD_SELECTORS),
    name: &[
        FieldRule {
            label: "consumer-name-attr",
            extract: name_attr,
        },
        FieldRule {
            label: "consumer-name-tag",
            extract: name_tag,
        },
        FieldRule {
            label: "consumer-profile-link",
            extract: name_link,
        },
    ],
    text: &[
        FieldRule {
            label: "review-text-paragraph",
            extract: text_paragraph,
        },
        FieldRule {
            label: "review-content",
            extract: text_container,
        },
        FieldRule {
            label: "review-body-microdata",
            extract: text_microdata,
        },
    ],
    rating: &[
        FieldRule {
            label: "rating-img-alt",
            extract: rating_img,
        },
        FieldRule {
            label: "rating-class",
            extract: rating_class,
        },
        STAR_ALT_RULE,
    ],
    date: &TIME_MARKER_RULES,
    verified: &[FieldRule {
        label: "verified-label",
        extract: verified_label,
    }],
};

/// One entry of the embedded review list. Everything is optional so that a
/// sparse entry still yields a record with defaults, and a field of the wrong
/// type reads as missing instead of rejecting the entry.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EmbeddedReview {
    #[serde(default, deserialize_with = "lenient_id")]
    id: Option<String>,
    #[serde(default, deserialize_with = "lenient_rating")]
    rating: Option<u8>,
    #[serde(default, deserialize_with = "lenient_string")]
    text: Option<String>,
    #[serde(default, deserialize_with = "lenient_object")]
    consumer: Option<EmbeddedConsumer>,
    #[serde(default, deserialize_with = "lenient_object")]
    dates: Option<EmbeddedDates>,
    #[serde(default, deserialize_with = "lenient_list")]
    verifications: Option<Vec<Value>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EmbeddedConsumer {
    #[serde(default, deserialize_with = "lenient_string")]
    display_name: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EmbeddedDates {
    #[serde(default, deserialize_with = "lenient_string")]
    published_date: Option<String>,
}

/// String or numeric id.
fn lenient_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(id) => Some(id),
        Value::Number(id) => Some(id.to_string()),
        _ => None,
    })
}

/// Integer, integer-valued float, or numeric string. Anything else is missing.
fn lenient_rating<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u8>, D::Error> {
    let number = match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    Ok(number
        .filter(|n| n.fract() == 0.0 && (0.0..=f64::from(u8::MAX)).contains(n))
        .map(|n| n as u8))
}

fn lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        _ => None,
    })
}

fn lenient_list<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Vec<Value>>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => Some(items),
        _ => None,
    })
}

fn lenient_object<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: serde::de::DeserializeOwned,
{
    Ok(match Value::deserialize(deserializer)? {
        value @ Value::Object(_) => serde_json::from_value(value).ok(),
        _ => None,
    })
}

impl EmbeddedReview {
    fn into_raw(self) -> (Option<String>, RawReview) {
        let raw = RawReview {
            reviewer_name: self.consumer.and_then(|c| c.display_name),
            review_text: self.text,
            rating: self.rating,
            review_date: self.dates.and_then(|d| d.published_date),
            verified: self.verifications.map(|v| !v.is_empty()),
        };
        (self.id, raw)
    }
}

/// Adapter for `trustpilot.com/review/<domain>` pages.
#[derive(Debug, Clone, Default)]
pub struct TrustpilotAdapter;

impl TrustpilotAdapter {
    pub fn new() -> Self {
        Self
    }

    /// Review list from the embedded payload, or `None` if the page has no
    /// `__NEXT_DATA__` marker at all.
    fn embedded_reviews(document: &Html) -> Option<ParseResult<Vec<Value>>> {
        let script = document.select(&NEXT_DATA).next()?;
        let json = script.text().collect::<String>();

        Some(Self::reviews_from_json(&json))
    }

    fn reviews_from_json(json: &str) -> ParseResult<Vec<Value>> {
        let mut data: Value = serde_json::from_str(json)?;
        match data.pointer_mut(REVIEWS_POINTER).map(Value::take) {
            Some(Value::Array(entries)) => Ok(entries),
            _ => Err(ParseError::MissingPath { path: REVIEWS_PATH }),
        }
    }

    fn map_embedded(
        entries: Vec<Value>,
        scraped_at: DateTime<Utc>,
        batch: &mut SourceBatch,
    ) {
        for (index, entry) in entries.into_iter().enumerate() {
            let entry: EmbeddedReview = match serde_json::from_value(entry) {
                Ok(entry) => entry,
                Err(source) => {
                    batch.push_card_error(CardError::Malformed { index, source });
                    continue;
                }
            };

            let (id, raw) = entry.into_raw();
            let Some(id) = id.filter(|id| !id.trim().is_empty()) else {
                batch.push_card_error(CardError::MissingId { index });
                continue;
            };

            batch.push_review(normalize(
                ReviewSource::Trustpilot,
                LocalKey::Platform(&id),
                raw,
                scraped_at,
            ));
        }
    }
}

impl ReviewAdapter for TrustpilotAdapter {
    fn source(&self) -> ReviewSource {
        ReviewSource::Trustpilot
    }

    fn parse(&self, html: &str, scraped_at: DateTime<Utc>) -> SourceBatch {
        let document = Html::parse_document(html);
        let mut batch = SourceBatch::new(ReviewSource::Trustpilot);

        match Self::embedded_reviews(&document) {
            Some(Ok(entries)) => {
                debug!(entries = entries.len(), "Using embedded review data");
                Self::map_embedded(entries, scraped_at, &mut batch);
                return batch;
            }
            Some(Err(e)) => batch.push_parse_error(e),
            None => debug!("No embedded review data, falling back to review cards"),
        }

        CardPass {
            profile: &PROFILE,
            limit: usize::MAX,
            local_id: review_link_id,
            verified_override: None,
        }
        .run(&document, scraped_at, &mut batch);

        batch
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn review_link_id_reads_permalink_segment() {
        let html = Html::parse_fragment(
            r#"<article><a href="/reviews/65f0c1d2e3?utm=x">Lees meer</a></article>"#,
        );
        let card = html.select(&Selector::parse("article").unwrap()).next().unwrap();
        assert_eq!(review_link_id(card), Some("65f0c1d2e3".to_string()));
    }

    #[test]
    fn missing_review_path_is_a_parse_error() {
        let err = TrustpilotAdapter::reviews_from_json(r#"{"props":{"pageProps":{}}}"#)
            .unwrap_err();
        assert!(matches!(err, ParseError::MissingPath { .. }));
    }

    fn entry(json: serde_json::Value) -> EmbeddedReview {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn ratings_accept_numeric_strings_and_whole_floats() {
        assert_eq!(entry(serde_json::json!({ "rating": 4 })).rating, Some(4));
        assert_eq!(entry(serde_json::json!({ "rating": "3" })).rating, Some(3));
        assert_eq!(entry(serde_json::json!({ "rating": 2.0 })).rating, Some(2));
        assert_eq!(entry(serde_json::json!({ "rating": 4.5 })).rating, None);
        assert_eq!(entry(serde_json::json!({ "rating": "five stars" })).rating, None);
        assert_eq!(entry(serde_json::json!({ "rating": -1 })).rating, None);
    }

    #[test]
    fn mistyped_fields_read_as_missing() {
        let parsed = entry(serde_json::json!({
            "id": 918273,
            "text": ["not", "text"],
            "consumer": "Anna",
            "dates": { "publishedDate": 20240101 },
            "verifications": {},
        }));

        assert_eq!(parsed.id.as_deref(), Some("918273"));
        assert!(parsed.text.is_none());
        assert!(parsed.consumer.is_none());
        assert!(parsed.dates.unwrap().published_date.is_none());
        assert!(parsed.verifications.is_none());
    }

    #[test]
    fn invalid_json_is_a_parse_error() {
        let err = TrustpilotAdapter::reviews_from_json("{not json").unwrap_err();
        assert!(matches!(err, ParseError::EmbeddedJson(_)));
    }
}
