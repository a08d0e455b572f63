//! Sitejabber listing pages (HTML cards only).
//!
//! Cards carry no verification status and no usable review id, so ids are a
//! digest of the normalized reviewer name and date.

use chrono::{DateTime, Utc};
use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;

use super::{CardPass, ReviewAdapter};
use crate::extract::rules::{
    rating_from_alt, rating_from_class, text_of, STAR_ALT_RULE, TIME_MARKER_RULES,
};
use crate::extract::{CardLocator, CardProfile, FieldRule};
use crate::types::review::SITEJABBER_VERIFIED;
use crate::types::{ReviewSource, SourceBatch};

/// At most this many cards are processed per page.
pub const SITEJABBER_CARD_LIMIT: usize = 20;

static CARD: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("div[data-review-id]").unwrap());
static CARD_ATTR_ALT: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("[data-testid='review-card']").unwrap());
static CARD_MICRODATA: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("[itemprop='review']").unwrap());
static CARD_CLASS: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("div.review, div.review-card").unwrap());

static CARD_SELECTORS: [&LazyLock<Selector>; 4] =
    [&CARD, &CARD_ATTR_ALT, &CARD_MICRODATA, &CARD_CLASS];

static NAME_ATTR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("[data-testid='review-author']").unwrap());
static NAME_TAG: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(".review__author, .author-name").unwrap());
static NAME_LINK: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a[href*='/users/']").unwrap());

static TEXT_PARAGRAPH: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("p.review__text, p[data-testid='review-text']").unwrap());
static TEXT_CONTAINER: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(".review__content, .review-content").unwrap());
static TEXT_MICRODATA: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("[itemprop='reviewBody']").unwrap());

static RATING_IMG: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(".review__stars img[alt], .stars img[alt]").unwrap());
static RATING_CLASS: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("[class*='star']").unwrap());

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

fn no_platform_id(_: ElementRef<'_>) -> Option<String> {
    None
}

static PROFILE: CardProfile = CardProfile {
    locator: CardLocator::new(&CARD_SELECTORS),
    name: &[
        FieldRule {
            label: "author-attr",
            extract: name_attr,
        },
        FieldRule {
            label: "author-tag",
            extract: name_tag,
        },
        FieldRule {
            label: "author-link",
            extract: name_link,
        },
    ],
    text: &[
        FieldRule {
            label: "text-paragraph",
            extract: text_paragraph,
        },
        FieldRule {
            label: "text-container",
            extract: text_container,
        },
        FieldRule {
            label: "text-microdata",
            extract: text_microdata,
        },
    ],
    rating: &[
        FieldRule {
            label: "stars-img-alt",
            extract: rating_img,
        },
        FieldRule {
            label: "star-class",
            extract: rating_class,
        },
        STAR_ALT_RULE,
    ],
    date: &TIME_MARKER_RULES,
    verified: &[],
};

/// Adapter for `www.sitejabber.com/reviews/<domain>`.
#[derive(Debug, Clone)]
pub struct SitejabberAdapter {
    card_limit: usize,
}

impl Default for SitejabberAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl SitejabberAdapter {
    pub fn new() -> Self {
        Self {
            card_limit: SITEJABBER_CARD_LIMIT,
        }
    }

    /// Override the per-page card cap.
    pub fn with_card_limit(mut self, limit: usize) -> Self {
        self.card_limit = limit;
        self
    }
}

impl ReviewAdapter for SitejabberAdapter {
    fn source(&self) -> ReviewSource {
        ReviewSource::Sitejabber
    }

    fn parse(&self, html: &str, scraped_at: DateTime<Utc>) -> SourceBatch {
        let document = Html::parse_document(html);
        let mut batch = SourceBatch::new(ReviewSource::Sitejabber);

        CardPass {
            profile: &PROFILE,
            limit: self.card_limit,
            local_id: no_platform_id,
            verified_override: Some(SITEJABBER_VERIFIED),
        }
        .run(&document, scraped_at, &mut batch);

        batch
    }
}
