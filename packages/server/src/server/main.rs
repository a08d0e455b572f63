// Main entry point for the review sync server

use anyhow::{Context, Result};
use review_extraction::{FetchConfig, HttpFetcher, SitejabberAdapter, TrustpilotAdapter};
use server_core::domains::reviews::{Diagnostics, ReviewPipeline, SourceTarget};
use server_core::kernel::{start_scheduler, ServerDeps, SupabaseReviewStore};
use server_core::{server::build_app, Config};
use std::sync::Arc;
use supabase_client::SupabaseClient;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,server_core=debug,review_extraction=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting review sync server");

    // Load configuration
    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::info!("Configuration loaded");

    // Collaborators
    let fetcher = HttpFetcher::with_config(
        FetchConfig::default()
            .with_timeout(config.fetch_timeout)
            .with_max_attempts(config.fetch_max_attempts),
    )
    .context("Failed to build HTTP client")?;
    let supabase = SupabaseClient::new(&config.supabase_url, config.supabase_key.clone())
        .context("Failed to create Supabase client")?;
    let deps = ServerDeps::new(
        Arc::new(fetcher),
        Arc::new(SupabaseReviewStore::new(Arc::new(supabase))),
    );

    // Sources run in this order every cycle
    let targets = vec![
        SourceTarget::new(Arc::new(TrustpilotAdapter::new()), config.trustpilot_url.clone()),
        SourceTarget::new(Arc::new(SitejabberAdapter::new()), config.sitejabber_url.clone()),
    ];
    let pipeline = Arc::new(ReviewPipeline::new(&deps, targets, Diagnostics::new()));

    // Keep the scheduler handle alive for the lifetime of the server
    let _scheduler = start_scheduler(pipeline.clone(), config.scrape_interval)
        .await
        .context("Failed to start scheduler")?;

    // Build application
    let app = build_app(pipeline);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("Starting server on {}", addr);
    tracing::info!("Run report: http://localhost:{}/reviews", config.port);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app)
        .await
        .context("Server error")?;

    Ok(())
}
