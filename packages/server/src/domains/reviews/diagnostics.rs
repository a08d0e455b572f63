//! Latest run report, shared between the pipeline and the HTTP handlers.

use std::sync::Arc;
use tokio::sync::watch;

use super::report::RunReport;

/// Single-slot holder for the most recent `RunReport`.
///
/// Publishing replaces the whole `Arc` in one step, so a reader gets either
/// the previous report or the new one, never a mix.
#[derive(Clone)]
pub struct Diagnostics {
    tx: Arc<watch::Sender<Arc<RunReport>>>,
}

impl Diagnostics {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(Arc::new(RunReport::pending()));
        Self { tx: Arc::new(tx) }
    }

    pub fn publish(&self, report: Arc<RunReport>) {
        self.tx.send_replace(report);
    }

    pub fn latest(&self) -> Arc<RunReport> {
        self.tx.borrow().clone()
    }

    /// Receiver notified on every publish
    pub fn subscribe(&self) -> watch::Receiver<Arc<RunReport>> {
        self.tx.subscribe()
    }
}

impl Default for Diagnostics {
    fn default() -> Self {
        Self::new()
    }
}
