//! Building blocks for field rules.
//!
//! Every helper returns `None` for anything it does not recognize, so a rule
//! chain can always fall through to the next strategy.

use regex::Regex;
use scraper::{ElementRef, Selector};
use std::sync::LazyLock;

use super::FieldRule;
use crate::types::review::RATING_RANGE;

static RE_STANDALONE_DIGIT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b(\d)\b").unwrap());
static RE_ANY_DIGIT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d").unwrap());

static IMG_WITH_ALT: LazyLock<Selector> = LazyLock::new(|| Selector::parse("img[alt]").unwrap());
static TIME_WITH_DATETIME: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("time[datetime]").unwrap());
static TIME: LazyLock<Selector> = LazyLock::new(|| Selector::parse("time").unwrap());

/// Trimmed text of the first element matching `selector`, if non-empty.
pub fn text_of(card: ElementRef<'_>, selector: &Selector) -> Option<String> {
    card.select(selector)
        .map(|el| el.text().collect::<Vec<_>>().join(" "))
        .map(|text| text.split_whitespace().collect::<Vec<_>>().join(" "))
        .find(|text| !text.is_empty())
}

/// Trimmed attribute value of the first element matching `selector`.
pub fn attr_of(card: ElementRef<'_>, selector: &Selector, attr: &str) -> Option<String> {
    card.select(selector)
        .filter_map(|el| el.value().attr(attr))
        .map(str::trim)
        .find(|value| !value.is_empty())
        .map(str::to_string)
}

/// Whether anything inside the card matches `selector`.
pub fn has_match(card: ElementRef<'_>, selector: &Selector) -> bool {
    card.select(selector).next().is_some()
}

/// First standalone single-digit token, if it is a valid star count.
///
/// "Rated 4 out of 5 stars" gives 4. "Rated 0 out of 5" misses rather than
/// skipping ahead to the 5.
pub fn first_standalone_digit(text: &str) -> Option<u8> {
    RE_STANDALONE_DIGIT
        .captures(text)
        .and_then(|cap| cap[1].parse::<u8>().ok())
        .filter(|n| RATING_RANGE.contains(n))
}

/// First digit anywhere in `text`, if it is a valid star count.
pub fn first_digit(text: &str) -> Option<u8> {
    RE_ANY_DIGIT
        .find(text)
        .and_then(|m| m.as_str().parse::<u8>().ok())
        .filter(|n| RATING_RANGE.contains(n))
}

/// First digit found in the class tokens of an element, e.g. `star-rating-4`.
pub fn first_class_digit(element: ElementRef<'_>) -> Option<u8> {
    element.value().classes().find_map(first_digit)
}

/// Rating from the alt text of the first image matching `selector`.
pub fn rating_from_alt(card: ElementRef<'_>, selector: &Selector) -> Option<u8> {
    attr_of(card, selector, "alt").and_then(|alt| first_standalone_digit(&alt))
}

/// Rating from the class tokens of the first element matching `selector`.
pub fn rating_from_class(card: ElementRef<'_>, selector: &Selector) -> Option<u8> {
    card.select(selector).find_map(first_class_digit)
}

/// Rating from any image whose alt text mentions stars or a rating.
pub fn star_alt_digit(card: ElementRef<'_>) -> Option<u8> {
    card.select(&IMG_WITH_ALT)
        .filter_map(|img| img.value().attr("alt"))
        .filter(|alt| {
            let alt = alt.to_lowercase();
            alt.contains("star") || alt.contains("rating")
        })
        .find_map(first_digit)
}

fn time_datetime(card: ElementRef<'_>) -> Option<String> {
    attr_of(card, &TIME_WITH_DATETIME, "datetime")
}

fn time_text(card: ElementRef<'_>) -> Option<String> {
    text_of(card, &TIME)
}

fn any_star_alt(card: ElementRef<'_>) -> Option<u8> {
    star_alt_digit(card)
}

/// Date rules shared by every card profile: machine-readable attribute first,
/// then the displayed text.
pub const TIME_MARKER_RULES: [FieldRule<String>; 2] = [
    FieldRule {
        label: "time-datetime",
        extract: time_datetime,
    },
    FieldRule {
        label: "time-text",
        extract: time_text,
    },
];

/// Last-resort rating rule shared by every card profile.
pub const STAR_ALT_RULE: FieldRule<u8> = FieldRule {
    label: "any-star-alt",
    extract: any_star_alt,
};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::first_match;
    use scraper::Html;

    fn root(html: &Html) -> ElementRef<'_> {
        html.root_element()
    }

    #[test]
    fn standalone_digit_takes_the_first_token() {
        assert_eq!(first_standalone_digit("Rated 4 out of 5 stars"), Some(4));
        assert_eq!(first_standalone_digit("Beoordeeld met 2 van de 5 sterren"), Some(2));
        assert_eq!(first_standalone_digit("Rated 0 out of 5"), None);
        assert_eq!(first_standalone_digit("Rated 45 points"), None);
        assert_eq!(first_standalone_digit("no digits"), None);
    }

    #[test]
    fn class_digit_reads_star_hints() {
        let html = Html::parse_fragment(r#"<div class="stars star-rating-3">x</div>"#);
        let sel = Selector::parse("div").unwrap();
        assert_eq!(rating_from_class(root(&html), &sel), Some(3));
    }

    #[test]
    fn star_alt_ignores_unrelated_images() {
        let html = Html::parse_fragment(
            r#"<img alt="Profile photo 2"><img alt="4 stars"><img alt="rating: 1">"#,
        );
        assert_eq!(star_alt_digit(root(&html)), Some(4));
    }

    #[test]
    fn time_rules_prefer_the_datetime_attribute() {
        let html = Html::parse_fragment(
            r#"<time datetime="2024-03-05T08:00:00.000Z">5 maart 2024</time>"#,
        );
        assert_eq!(
            first_match(root(&html), &TIME_MARKER_RULES),
            Some("2024-03-05T08:00:00.000Z".to_string())
        );

        let html = Html::parse_fragment("<time> 5 maart 2024 </time>");
        assert_eq!(
            first_match(root(&html), &TIME_MARKER_RULES),
            Some("5 maart 2024".to_string())
        );
    }

    #[test]
    fn text_of_collapses_whitespace() {
        let html = Html::parse_fragment("<p>  Fast\n   delivery  </p>");
        let sel = Selector::parse("p").unwrap();
        assert_eq!(text_of(root(&html), &sel), Some("Fast delivery".to_string()));
    }
}
