//! Scheduled background tasks using tokio-cron-scheduler.
//!
//! The review sync runs once at startup and then on a fixed interval:
//!
//! ```text
//! startup ──► spawn_cycle()
//! Scheduler (every SCRAPE_INTERVAL_SECS)
//!     │
//!     └─► trigger()  (skipped while a cycle is still running)
//!             └─► Trustpilot → Sitejabber → upsert → publish RunReport
//! ```

use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;
use tokio_cron_scheduler::{Job, JobScheduler};

use crate::domains::reviews::ReviewPipeline;

/// Start the periodic review sync and kick off the first cycle immediately
pub async fn start_scheduler(pipeline: Arc<ReviewPipeline>, interval: Duration) -> Result<JobScheduler> {
    let scheduler = JobScheduler::new().await?;

    let sync_pipeline = pipeline.clone();
    let sync_job = Job::new_repeated_async(interval, move |_uuid, _lock| {
        let pipeline = sync_pipeline.clone();
        Box::pin(async move {
            if pipeline.trigger().await.is_none() {
                tracing::warn!("Periodic review sync skipped: previous cycle still running");
            }
        })
    })?;

    scheduler.add(sync_job).await?;
    scheduler.start().await?;

    if !pipeline.spawn_cycle() {
        tracing::warn!("Startup review sync skipped: a cycle is already running");
    }

    tracing::info!(
        interval_secs = interval.as_secs(),
        "Scheduled tasks started (review sync at startup and on interval)"
    );
    Ok(scheduler)
}
