use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;
use tracing::debug;

/// Finds review cards on a listing page.
///
/// Selectors are tried in order; the first one that matches at least one
/// element wins and later selectors are never consulted. Zero matches across
/// the whole list is a normal outcome (empty iterator), not an error.
#[derive(Debug, Clone, Copy)]
pub struct CardLocator {
    selectors: &'static [&'static LazyLock<Selector>],
}

impl CardLocator {
    pub const fn new(selectors: &'static [&'static LazyLock<Selector>]) -> Self {
        Self { selectors }
    }

    /// Lazily yield the cards matched by the first productive selector.
    pub fn locate<'a>(&self, document: &'a Html) -> impl Iterator<Item = ElementRef<'a>> + 'a {
        let selectors: &'static [&'static LazyLock<Selector>] = self.selectors;

        selectors
            .iter()
            .enumerate()
            .find_map(|(index, selector)| {
                let selector: &'static Selector = selector;
                let mut cards = document.select(selector).peekable();
                if cards.peek().is_some() {
                    debug!(selector_index = index, "Card selector matched");
                    Some(cards)
                } else {
                    None
                }
            })
            .into_iter()
            .flatten()
    }

    /// Index of the selector `locate` would use, if any matches.
    pub fn matched_selector(&self, document: &Html) -> Option<usize> {
        self.selectors.iter().position(|selector| {
            let selector: &Selector = selector;
            document.select(selector).next().is_some()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    static PRIMARY: LazyLock<Selector> =
        LazyLock::new(|| Selector::parse("article[data-card]").unwrap());
    static FALLBACK: LazyLock<Selector> =
        LazyLock::new(|| Selector::parse("div.review").unwrap());
    static SELECTORS: [&LazyLock<Selector>; 2] = [&PRIMARY, &FALLBACK];
    static LOCATOR: CardLocator = CardLocator::new(&SELECTORS);

    #[test]
    fn primary_selector_wins_when_it_matches() {
        let html = Html::parse_document(
            r#"<article data-card>a</article><div class="review">b</div><div class="review">c</div>"#,
        );

        assert_eq!(LOCATOR.locate(&html).count(), 1);
        assert_eq!(LOCATOR.matched_selector(&html), Some(0));
    }

    #[test]
    fn fallback_fires_only_when_primary_is_empty() {
        let html = Html::parse_document(r#"<div class="review">b</div><div class="review">c</div>"#);

        assert_eq!(LOCATOR.locate(&html).count(), 2);
        assert_eq!(LOCATOR.matched_selector(&html), Some(1));
    }

    #[test]
    fn no_match_is_an_empty_sequence() {
        let html = Html::parse_document("<p>nothing here</p>");

        assert_eq!(LOCATOR.locate(&html).count(), 0);
        assert_eq!(LOCATOR.matched_selector(&html), None);
    }
}
