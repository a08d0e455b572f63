//! Canonical record assembly and source-qualified identity.
//!
//! Adapters produce a [`RawReview`] where every field may be missing. This
//! module is the single place where missing values become the named defaults
//! from [`crate::types::review`], and where ids are qualified with the
//! platform prefix.

use chrono::{DateTime, SecondsFormat, Utc};
use sha2::{Digest, Sha256};
use std::fmt;

use crate::types::review::{
    Review, ReviewSource, ANONYMOUS_REVIEWER, DEFAULT_RATING, DEFAULT_REVIEW_TEXT, RATING_RANGE,
};

/// Number of hex characters kept from the name+date digest.
const HASH_ID_LEN: usize = 16;

/// Partially extracted review, before defaults are applied.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawReview {
    pub reviewer_name: Option<String>,
    pub review_text: Option<String>,
    pub rating: Option<u8>,
    pub review_date: Option<String>,
    pub verified: Option<bool>,
}

impl RawReview {
    /// True when no field was recovered at all.
    pub fn is_empty(&self) -> bool {
        self.reviewer_name.is_none()
            && self.review_text.is_none()
            && self.rating.is_none()
            && self.review_date.is_none()
            && self.verified.is_none()
    }
}

/// How the local part of a review id is obtained.
#[derive(Debug, Clone, Copy)]
pub enum LocalKey<'a> {
    /// The platform's own review identifier (stable across runs)
    Platform(&'a str),
    /// Digest of the normalized reviewer name and date.
    ///
    /// Collides when two reviews share name and date, and drifts when either
    /// field's extraction changes between runs. An undated card hashes the
    /// scrape instant, so it never dedupes across runs.
    NameAndDate,
}

/// Source-qualified review identifier: `<prefix>-<local>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ReviewId(String);

impl ReviewId {
    pub fn qualified(source: ReviewSource, local: &str) -> Self {
        Self(format!("{}-{}", source.id_prefix(), local.trim()))
    }

    pub fn from_name_and_date(source: ReviewSource, name: &str, date: &str) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(name.as_bytes());
        hasher.update(b"|");
        hasher.update(date.as_bytes());
        let digest = hex::encode(hasher.finalize());
        Self::qualified(source, &digest[..HASH_ID_LEN])
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for ReviewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Date assigned to reviews whose page gives no timestamp.
pub fn default_review_date(scraped_at: DateTime<Utc>) -> String {
    scraped_at.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Build the canonical record, applying every documented default.
pub fn normalize(
    source: ReviewSource,
    key: LocalKey<'_>,
    raw: RawReview,
    scraped_at: DateTime<Utc>,
) -> Review {
    let reviewer_name =
        non_blank(raw.reviewer_name).unwrap_or_else(|| ANONYMOUS_REVIEWER.to_string());
    let review_text = non_blank(raw.review_text).unwrap_or_else(|| DEFAULT_REVIEW_TEXT.to_string());
    let review_date =
        non_blank(raw.review_date).unwrap_or_else(|| default_review_date(scraped_at));
    let rating = raw
        .rating
        .filter(|r| RATING_RANGE.contains(r))
        .unwrap_or(DEFAULT_RATING);

    let id = match key {
        LocalKey::Platform(local) => ReviewId::qualified(source, local),
        LocalKey::NameAndDate => ReviewId::from_name_and_date(source, &reviewer_name, &review_date),
    };

    Review {
        id: id.into_string(),
        source,
        rating,
        reviewer_name,
        review_text,
        review_date,
        verified: raw.verified.unwrap_or_else(|| source.default_verified()),
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|v| !v.is_empty())
}
