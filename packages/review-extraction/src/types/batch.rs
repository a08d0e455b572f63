use crate::error::{CardError, ParseError, ScrapeError};
use crate::types::review::{Review, ReviewSource};

/// Output of one adapter over one fetched page.
///
/// Errors are collected rather than returned so that one bad card (or a
/// malformed embedded blob) costs only its own records.
#[derive(Debug)]
pub struct SourceBatch {
    pub source: ReviewSource,
    pub reviews: Vec<Review>,
    pub errors: Vec<ScrapeError>,
}

impl SourceBatch {
    pub fn new(source: ReviewSource) -> Self {
        Self {
            source,
            reviews: Vec::new(),
            errors: Vec::new(),
        }
    }

    pub fn push_review(&mut self, review: Review) {
        self.reviews.push(review);
    }

    pub fn push_card_error(&mut self, error: CardError) {
        tracing::warn!(source = %self.source, error = %error, "Skipping review card");
        self.errors.push(ScrapeError::Card(error));
    }

    pub fn push_parse_error(&mut self, error: ParseError) {
        tracing::warn!(source = %self.source, error = %error, "Page-level parse failed");
        self.errors.push(ScrapeError::Parse(error));
    }

    pub fn is_empty(&self) -> bool {
        self.reviews.is_empty()
    }

    pub fn ids(&self) -> Vec<&str> {
        self.reviews.iter().map(|r| r.id.as_str()).collect()
    }
}
