use axum::http::StatusCode;

/// Root liveness text
pub async fn home_handler() -> &'static str {
    "Scraper is actief"
}

/// Status endpoint used by uptime checks
///
/// Always 200 while the process is serving; sync failures show up in
/// `/reviews`, not here.
pub async fn status_handler() -> (StatusCode, &'static str) {
    (StatusCode::OK, "Online!")
}
