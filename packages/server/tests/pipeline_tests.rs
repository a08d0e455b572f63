mod common;

use common::*;
use review_extraction::testing::MockFetcher;
use review_extraction::ReviewSource;
use server_core::domains::reviews::RunErrorKind;
use server_core::kernel::MockReviewStore;

fn both_sources() -> MockFetcher {
    MockFetcher::new()
        .with_page(TRUSTPILOT_URL, trustpilot_page(6))
        .with_page(SITEJABBER_URL, sitejabber_page(3))
}

// =============================================================================
// Cycle outcome
// =============================================================================

#[tokio::test]
async fn cycle_persists_both_sources_in_order() {
    let harness = TestHarness::new(both_sources());

    let report = harness.pipeline.run_cycle().await;

    assert_eq!(report.total_processed, 9);
    assert!(report.errors.is_empty());
    assert_eq!(harness.store.row_count(), 9);
    assert_eq!(
        harness.fetcher.calls(),
        vec![TRUSTPILOT_URL.to_string(), SITEJABBER_URL.to_string()]
    );

    let calls = harness.store.upsert_calls();
    assert!(calls[..6].iter().all(|id| id.starts_with("tp-")));
    assert!(calls[6..].iter().all(|id| id.starts_with("sj-")));

    let sitejabber = report.source(ReviewSource::Sitejabber).unwrap();
    assert_eq!(sitejabber.rating_breakdown[&4], 3);
    assert!(report.average_rating.is_some());
}

#[tokio::test]
async fn unchanged_pages_upsert_the_same_ids_every_cycle() {
    let harness = TestHarness::new(both_sources());

    harness.pipeline.run_cycle().await;
    let first = harness.store.upsert_calls();
    harness.pipeline.run_cycle().await;
    let all = harness.store.upsert_calls();

    assert_eq!(all.len(), first.len() * 2);
    assert_eq!(&all[first.len()..], &first[..]);
    assert_eq!(harness.store.row_count(), first.len());
}

#[tokio::test]
async fn changed_page_updates_rows_in_place() {
    let harness = TestHarness::new(both_sources());
    harness.pipeline.run_cycle().await;

    harness.fetcher.set_page(TRUSTPILOT_URL, trustpilot_page(8));
    let report = harness.pipeline.run_cycle().await;

    assert_eq!(report.total_processed, 11);
    assert_eq!(harness.store.row_count(), 11);
    assert_eq!(harness.fetcher.call_count(), 4);
}

#[tokio::test]
async fn fetch_failure_is_isolated_to_its_source() {
    let fetcher = MockFetcher::new()
        .with_timeout(TRUSTPILOT_URL)
        .with_page(SITEJABBER_URL, sitejabber_page(3));
    let harness = TestHarness::new(fetcher);

    let report = harness.pipeline.run_cycle().await;

    let trustpilot = report.source(ReviewSource::Trustpilot).unwrap();
    assert_eq!(trustpilot.extracted, 0);
    assert_eq!(trustpilot.persisted, 0);
    assert_eq!(report.error_count(RunErrorKind::Fetch), 1);
    assert_eq!(report.errors.len(), 1);
    assert!(report.errors[0].starts_with("FetchError [Trustpilot]"));

    let sitejabber = report.source(ReviewSource::Sitejabber).unwrap();
    assert_eq!(sitejabber.persisted, 3);
    assert_eq!(report.total_processed, 3);
}

#[tokio::test]
async fn http_error_status_is_a_fetch_error() {
    let fetcher = MockFetcher::new()
        .with_page(TRUSTPILOT_URL, trustpilot_page(2))
        .with_status(SITEJABBER_URL, 403);
    let harness = TestHarness::new(fetcher);

    let report = harness.pipeline.run_cycle().await;

    assert_eq!(report.total_processed, 2);
    assert_eq!(report.error_count(RunErrorKind::Fetch), 1);
    assert!(report.errors[0].contains("Sitejabber"));
}

#[tokio::test]
async fn store_failure_skips_only_that_review() {
    let store = MockReviewStore::new().with_failure_for("tp-tp001");
    let harness = TestHarness::with_store(both_sources(), store);

    let report = harness.pipeline.run_cycle().await;

    assert_eq!(report.total_processed, 8);
    assert_eq!(report.error_count(RunErrorKind::Persistence), 1);
    assert!(report.errors[0].contains("tp-tp001"));
    let trustpilot = report.source(ReviewSource::Trustpilot).unwrap();
    assert_eq!((trustpilot.extracted, trustpilot.persisted, trustpilot.failed), (6, 5, 1));
    assert!(harness.store.get("tp-tp001").is_none());
}

#[tokio::test]
async fn card_errors_are_carried_into_the_report() {
    let mut cards: Vec<String> = (0..3)
        .map(|i| {
            review_extraction::testing::sitejabber_card(&format!("R{i}"), "ok", 5, None)
        })
        .collect();
    cards.push(r#"<div data-review-id="ad"></div>"#.to_string());
    let fetcher = MockFetcher::new()
        .with_page(TRUSTPILOT_URL, trustpilot_page(1))
        .with_page(SITEJABBER_URL, review_extraction::testing::listing_page(&cards));
    let harness = TestHarness::new(fetcher);

    let report = harness.pipeline.run_cycle().await;

    assert_eq!(report.total_processed, 4);
    assert_eq!(report.error_count(RunErrorKind::CardExtraction), 1);
}

// =============================================================================
// Diagnostics and single-flight
// =============================================================================

#[tokio::test]
async fn finished_cycle_is_published() {
    let harness = TestHarness::new(both_sources());
    assert!(harness.pipeline.diagnostics().latest().is_pending());

    let report = harness.pipeline.run_cycle().await;

    let latest = harness.pipeline.diagnostics().latest();
    assert_eq!(*latest, *report);
    assert!(latest.last_run.is_some());
    assert!(latest.finished_at >= latest.last_run);
}

#[tokio::test]
async fn overlapping_triggers_are_skipped() {
    let (harness, opener, entered) = TestHarness::gated(both_sources());
    let mut updates = harness.pipeline.diagnostics().subscribe();

    assert!(harness.pipeline.spawn_cycle());
    entered.notified().await;

    assert!(harness.pipeline.is_running());
    assert!(harness.pipeline.trigger().await.is_none());
    assert!(!harness.pipeline.spawn_cycle());

    opener.open();
    updates.changed().await.unwrap();

    assert!(!updates.borrow().is_pending());
    assert_eq!(harness.store.row_count(), 9);
    // Only the first cycle fetched anything
    assert_eq!(harness.fetcher.calls().len(), 2);
}
