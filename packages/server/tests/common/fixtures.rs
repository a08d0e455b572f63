// Canned review pages served by the mock fetcher

use review_extraction::testing::{
    listing_page, sitejabber_card, trustpilot_embedded_page, trustpilot_entry,
};

pub const TRUSTPILOT_URL: &str = "https://nl.trustpilot.com/review/example.com";
pub const SITEJABBER_URL: &str = "https://www.sitejabber.com/reviews/example.com";

/// Embedded-payload page with `n` reviews, ratings cycling 1..=5
pub fn trustpilot_page(n: usize) -> String {
    let entries: Vec<_> = (0..n)
        .map(|i| {
            trustpilot_entry(
                &format!("tp{i:03}"),
                &format!("Klant {i}"),
                (i % 5 + 1) as u8,
                "Snelle levering",
                "2024-06-01T12:00:00.000Z",
                i % 2 == 0,
            )
        })
        .collect();
    trustpilot_embedded_page(&entries)
}

/// Card page with `n` four-star reviews
pub fn sitejabber_page(n: usize) -> String {
    let cards: Vec<String> = (0..n)
        .map(|i| {
            sitejabber_card(
                &format!("Reviewer {i}"),
                &format!("Body {i}"),
                4,
                Some(&format!("2024-05-{:02}", i + 1)),
            )
        })
        .collect();
    listing_page(&cards)
}
