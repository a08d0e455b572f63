//! One sync cycle: fetch each source, parse it, upsert what it yields.

use chrono::Utc;
use review_extraction::{scrape, PageFetcher, ReviewAdapter};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{error, info, warn};

use super::diagnostics::Diagnostics;
use super::report::{RunErrorKind, RunReport, RunReportBuilder};
use crate::kernel::{BaseReviewStore, ServerDeps};

/// A source adapter paired with the page it scrapes
#[derive(Clone)]
pub struct SourceTarget {
    pub adapter: Arc<dyn ReviewAdapter>,
    pub url: String,
}

impl SourceTarget {
    pub fn new(adapter: Arc<dyn ReviewAdapter>, url: impl Into<String>) -> Self {
        Self {
            adapter,
            url: url.into(),
        }
    }
}

/// Runs sync cycles over the configured targets, at most one at a time.
pub struct ReviewPipeline {
    targets: Vec<SourceTarget>,
    fetcher: Arc<dyn PageFetcher>,
    store: Arc<dyn BaseReviewStore>,
    diagnostics: Diagnostics,
    running: Arc<Mutex<()>>,
}

impl ReviewPipeline {
    pub fn new(deps: &ServerDeps, targets: Vec<SourceTarget>, diagnostics: Diagnostics) -> Self {
        Self {
            targets,
            fetcher: deps.fetcher.clone(),
            store: deps.store.clone(),
            diagnostics,
            running: Arc::new(Mutex::new(())),
        }
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    pub fn is_running(&self) -> bool {
        self.running.try_lock().is_err()
    }

    /// Run a cycle, waiting for any cycle already in progress to finish first.
    pub async fn run_cycle(&self) -> Arc<RunReport> {
        let _guard = self.running.lock().await;
        self.execute().await
    }

    /// Run a cycle unless one is already in progress.
    pub async fn trigger(&self) -> Option<Arc<RunReport>> {
        let Ok(_guard) = self.running.try_lock() else {
            info!("Sync cycle already running, skipping trigger");
            return None;
        };
        Some(self.execute().await)
    }

    /// Start a cycle in the background unless one is already in progress.
    ///
    /// Returns whether a cycle was started.
    pub fn spawn_cycle(self: &Arc<Self>) -> bool {
        let Ok(guard) = self.running.clone().try_lock_owned() else {
            info!("Sync cycle already running, skipping background trigger");
            return false;
        };

        let pipeline = Arc::clone(self);
        tokio::spawn(async move {
            let _guard = guard;
            pipeline.execute().await;
        });
        true
    }

    async fn execute(&self) -> Arc<RunReport> {
        let mut report = RunReportBuilder::start(Utc::now());
        info!(sources = self.targets.len(), "Starting review sync cycle");

        for target in &self.targets {
            let source = target.adapter.source();
            report.begin_source(source, &target.url);

            let fetched =
                scrape(target.adapter.as_ref(), self.fetcher.as_ref(), &target.url).await;
            let batch = match fetched {
                Ok(batch) => batch,
                Err(e) => {
                    error!(%source, url = %target.url, error = %e, "Failed to fetch review page");
                    report.record_error(RunErrorKind::Fetch, source, &e);
                    continue;
                }
            };

            report.record_batch(&batch);

            for review in &batch.reviews {
                match self.store.upsert_review(review).await {
                    Ok(()) => report.record_persisted(review),
                    Err(e) => {
                        warn!(%source, review_id = %review.id, error = %e, "Failed to upsert review");
                        report.record_persist_failure(review, &e);
                    }
                }
            }

            info!(
                %source,
                extracted = batch.reviews.len(),
                errors = batch.errors.len(),
                "Source synced"
            );
        }

        let report = Arc::new(report.finish(Utc::now()));
        info!(
            total_processed = report.total_processed,
            errors = report.errors.len(),
            status = %report.status,
            "Review sync cycle finished"
        );
        self.diagnostics.publish(report.clone());
        report
    }
}
