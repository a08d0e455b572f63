use axum::{extract::Extension, http::StatusCode, Json};
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::domains::reviews::RunReport;
use crate::server::app::AppState;

#[derive(Debug, Serialize, Deserialize)]
pub struct ReviewsResponse {
    pub server_time: String,
    pub log: RunReport,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RefreshResponse {
    pub started: bool,
}

/// Latest run report plus the server clock
pub async fn reviews_handler(Extension(state): Extension<AppState>) -> Json<ReviewsResponse> {
    let report = state.diagnostics.latest();

    Json(ReviewsResponse {
        server_time: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
        log: RunReport::clone(&report),
    })
}

/// Start an on-demand sync cycle in the background
///
/// Returns 202 when a cycle was started, 409 when one is already running.
pub async fn refresh_handler(
    Extension(state): Extension<AppState>,
) -> (StatusCode, Json<RefreshResponse>) {
    if state.pipeline.spawn_cycle() {
        tracing::info!("On-demand review sync started");
        (StatusCode::ACCEPTED, Json(RefreshResponse { started: true }))
    } else {
        (StatusCode::CONFLICT, Json(RefreshResponse { started: false }))
    }
}
