use serde::{Deserialize, Serialize};
use std::fmt;

/// Rating used when no star signal can be recovered from the markup.
pub const DEFAULT_RATING: u8 = 5;

/// Reviewer name used when no name marker is present.
pub const ANONYMOUS_REVIEWER: &str = "Anonymous";

/// Review body used when no text marker is present.
pub const DEFAULT_REVIEW_TEXT: &str = "";

/// Sitejabber listing pages never expose verification status.
pub const SITEJABBER_VERIFIED: bool = false;

/// Valid star range, inclusive.
pub const RATING_RANGE: std::ops::RangeInclusive<u8> = 1..=5;

/// Review platform a record was scraped from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ReviewSource {
    Trustpilot,
    Sitejabber,
}

impl ReviewSource {
    pub const ALL: [ReviewSource; 2] = [ReviewSource::Trustpilot, ReviewSource::Sitejabber];

    /// Short tag prepended to local ids so ids never collide across platforms.
    pub fn id_prefix(&self) -> &'static str {
        match self {
            ReviewSource::Trustpilot => "tp",
            ReviewSource::Sitejabber => "sj",
        }
    }

    /// Verified flag used when the platform gives no verification metadata.
    pub fn default_verified(&self) -> bool {
        match self {
            ReviewSource::Trustpilot => false,
            ReviewSource::Sitejabber => SITEJABBER_VERIFIED,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ReviewSource::Trustpilot => "Trustpilot",
            ReviewSource::Sitejabber => "Sitejabber",
        }
    }
}

impl fmt::Display for ReviewSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Canonical review record, the row shape of the `reviews` table.
///
/// No field is optional: absence in the source markup is mapped to one of the
/// defaults above during [`crate::normalize::normalize`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
    /// Source-qualified id, e.g. `tp-5f1c...` or `sj-9a3b...`
    pub id: String,
    pub source: ReviewSource,
    /// Always within 1..=5
    pub rating: u8,
    pub reviewer_name: String,
    pub review_text: String,
    /// RFC 3339 timestamp
    pub review_date: String,
    pub verified: bool,
}
