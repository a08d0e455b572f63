//! Application setup and server configuration.

use std::sync::Arc;

use axum::{
    extract::Extension,
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::domains::reviews::{Diagnostics, ReviewPipeline};
use crate::server::routes::{home_handler, refresh_handler, reviews_handler, status_handler};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<ReviewPipeline>,
    pub diagnostics: Diagnostics,
}

impl AppState {
    pub fn new(pipeline: Arc<ReviewPipeline>) -> Self {
        let diagnostics = pipeline.diagnostics().clone();
        Self {
            pipeline,
            diagnostics,
        }
    }
}

/// Build the Axum application router
pub fn build_app(pipeline: Arc<ReviewPipeline>) -> Router {
    let state = AppState::new(pipeline);

    Router::new()
        .route("/", get(home_handler))
        .route("/status", get(status_handler))
        .route("/reviews", get(reviews_handler))
        .route("/reviews/refresh", post(refresh_handler))
        .layer(Extension(state))
        .layer(TraceLayer::new_for_http())
}
