//! Card locating and per-field fallback rules.
//!
//! A platform is described as data: a [`CardProfile`] holds the card locator
//! and, for each field, an ordered list of [`FieldRule`]s. The first rule that
//! returns `Some` wins. Adding or reordering a fallback is an edit to a rule
//! list, not to control flow.

pub mod locate;
pub mod rules;

pub use locate::CardLocator;

use scraper::ElementRef;
use tracing::trace;

use crate::normalize::RawReview;

/// One extraction strategy for one field.
pub struct FieldRule<T> {
    /// Short name used in trace logs
    pub label: &'static str,
    pub extract: fn(ElementRef<'_>) -> Option<T>,
}

impl<T> std::fmt::Debug for FieldRule<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldRule").field("label", &self.label).finish()
    }
}

/// Run rules in order and return the first hit.
pub fn first_match<T>(card: ElementRef<'_>, rules: &[FieldRule<T>]) -> Option<T> {
    rules.iter().find_map(|rule| {
        let value = (rule.extract)(card);
        if value.is_some() {
            trace!(rule = rule.label, "Field rule matched");
        }
        value
    })
}

/// Everything needed to turn one platform's listing page into raw reviews.
#[derive(Debug)]
pub struct CardProfile {
    pub locator: CardLocator,
    pub name: &'static [FieldRule<String>],
    pub text: &'static [FieldRule<String>],
    pub rating: &'static [FieldRule<u8>],
    pub date: &'static [FieldRule<String>],
    /// Empty when the platform exposes no verification signal on cards
    pub verified: &'static [FieldRule<bool>],
}

impl CardProfile {
    /// Apply every field chain to a card. Missing fields stay `None`.
    pub fn extract(&self, card: ElementRef<'_>) -> RawReview {
        RawReview {
            reviewer_name: first_match(card, self.name),
            review_text: first_match(card, self.text),
            rating: first_match(card, self.rating),
            review_date: first_match(card, self.date),
            verified: first_match(card, self.verified),
        }
    }
}
