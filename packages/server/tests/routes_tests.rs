mod common;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use common::*;
use review_extraction::testing::MockFetcher;
use server_core::server::build_app;
use server_core::server::routes::{RefreshResponse, ReviewsResponse};
use tower::ServiceExt;

async fn send(app: Router, method: &str, uri: &str) -> (StatusCode, Vec<u8>) {
    let response = app
        .oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, body.to_vec())
}

fn pages() -> MockFetcher {
    MockFetcher::new()
        .with_page(TRUSTPILOT_URL, trustpilot_page(4))
        .with_page(SITEJABBER_URL, sitejabber_page(2))
}

#[tokio::test]
async fn root_reports_the_scraper_is_active() {
    let harness = TestHarness::new(pages());

    let (status, body) = send(build_app(harness.pipeline), "GET", "/").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"Scraper is actief");
}

#[tokio::test]
async fn status_is_online() {
    let harness = TestHarness::new(pages());

    let (status, body) = send(build_app(harness.pipeline), "GET", "/status").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"Online!");
}

#[tokio::test]
async fn reviews_before_first_run_is_pending() {
    let harness = TestHarness::new(pages());

    let (status, body) = send(build_app(harness.pipeline), "GET", "/reviews").await;
    let response: ReviewsResponse = serde_json::from_slice(&body).unwrap();

    assert_eq!(status, StatusCode::OK);
    assert!(response.log.is_pending());
    assert_eq!(response.log.status, "waiting for first run");
    assert!(response.server_time.ends_with('Z'));
}

#[tokio::test]
async fn reviews_serves_the_last_report() {
    let harness = TestHarness::new(pages());
    harness.pipeline.run_cycle().await;

    let (_, body) = send(build_app(harness.pipeline.clone()), "GET", "/reviews").await;
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();

    assert_eq!(json["log"]["total_processed"], 6);
    assert_eq!(json["log"]["errors"].as_array().unwrap().len(), 0);
    assert_eq!(json["log"]["sources"][0]["source"], "Trustpilot");
    assert_eq!(json["log"]["sources"][1]["rating_breakdown"]["4"], 2);
}

#[tokio::test]
async fn refresh_starts_a_background_cycle() {
    let harness = TestHarness::new(pages());
    let mut updates = harness.pipeline.diagnostics().subscribe();

    let (status, body) = send(build_app(harness.pipeline.clone()), "POST", "/reviews/refresh").await;
    let response: RefreshResponse = serde_json::from_slice(&body).unwrap();

    assert_eq!(status, StatusCode::ACCEPTED);
    assert!(response.started);

    updates.changed().await.unwrap();
    assert_eq!(harness.store.row_count(), 6);
}

#[tokio::test]
async fn refresh_conflicts_while_a_cycle_is_running() {
    let (harness, opener, entered) = TestHarness::gated(pages());
    assert!(harness.pipeline.spawn_cycle());
    entered.notified().await;

    let (status, body) = send(build_app(harness.pipeline.clone()), "POST", "/reviews/refresh").await;
    let response: RefreshResponse = serde_json::from_slice(&body).unwrap();

    assert_eq!(status, StatusCode::CONFLICT);
    assert!(!response.started);
    opener.open();
}

#[tokio::test]
async fn unknown_route_is_not_found() {
    let harness = TestHarness::new(pages());

    let (status, _) = send(build_app(harness.pipeline), "GET", "/graphql").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}
