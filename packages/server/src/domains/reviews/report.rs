use chrono::{DateTime, Utc};
use review_extraction::{Review, ReviewSource, ScrapeError, SourceBatch};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Status shown before the first cycle has finished.
pub const PENDING_STATUS: &str = "waiting for first run";

/// Error taxonomy used to prefix report entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunErrorKind {
    Fetch,
    Parse,
    CardExtraction,
    Persistence,
}

impl RunErrorKind {
    pub fn label(&self) -> &'static str {
        match self {
            RunErrorKind::Fetch => "FetchError",
            RunErrorKind::Parse => "ParseError",
            RunErrorKind::CardExtraction => "CardExtractionError",
            RunErrorKind::Persistence => "PersistenceError",
        }
    }

    pub fn of(error: &ScrapeError) -> Self {
        match error {
            ScrapeError::Fetch(_) => RunErrorKind::Fetch,
            ScrapeError::Parse(_) => RunErrorKind::Parse,
            ScrapeError::Card(_) => RunErrorKind::CardExtraction,
        }
    }
}

impl fmt::Display for RunErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Outcome for one source within a cycle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceReport {
    pub source: ReviewSource,
    pub url: String,
    /// Records produced by the adapter
    pub extracted: usize,
    /// Records the store accepted
    pub persisted: usize,
    /// Records the store rejected
    pub failed: usize,
    /// Persisted records per star value, 1 through 5
    pub rating_breakdown: BTreeMap<u8, usize>,
}

impl SourceReport {
    fn new(source: ReviewSource, url: &str) -> Self {
        Self {
            source,
            url: url.to_string(),
            extracted: 0,
            persisted: 0,
            failed: 0,
            rating_breakdown: (1..=5).map(|star| (star, 0)).collect(),
        }
    }
}

/// Summary of the most recent sync cycle, served by `GET /reviews`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    /// Cycle start; `None` until the first cycle finishes
    pub last_run: Option<DateTime<Utc>>,
    pub finished_at: Option<DateTime<Utc>>,
    pub status: String,
    /// Reviews upserted successfully across all sources
    pub total_processed: usize,
    /// Mean star rating over persisted reviews
    pub average_rating: Option<f64>,
    pub sources: Vec<SourceReport>,
    /// Ordered, each prefixed with its kind, e.g. `FetchError [Trustpilot]: ...`
    pub errors: Vec<String>,
}

impl RunReport {
    pub fn pending() -> Self {
        Self {
            last_run: None,
            finished_at: None,
            status: PENDING_STATUS.to_string(),
            total_processed: 0,
            average_rating: None,
            sources: Vec::new(),
            errors: Vec::new(),
        }
    }

    pub fn is_pending(&self) -> bool {
        self.last_run.is_none()
    }

    pub fn source(&self, source: ReviewSource) -> Option<&SourceReport> {
        self.sources.iter().find(|s| s.source == source)
    }

    /// Number of error entries of the given kind
    pub fn error_count(&self, kind: RunErrorKind) -> usize {
        let prefix = kind.label();
        self.errors
            .iter()
            .filter(|e| e.starts_with(prefix))
            .count()
    }
}

impl Default for RunReport {
    fn default() -> Self {
        Self::pending()
    }
}

/// Accumulates a cycle's outcome; `finish` produces the immutable report.
#[derive(Debug)]
pub struct RunReportBuilder {
    started_at: DateTime<Utc>,
    sources: Vec<SourceReport>,
    errors: Vec<String>,
}

impl RunReportBuilder {
    pub fn start(started_at: DateTime<Utc>) -> Self {
        Self {
            started_at,
            sources: Vec::new(),
            errors: Vec::new(),
        }
    }

    /// Open the entry for a source. Later calls for this source update it.
    pub fn begin_source(&mut self, source: ReviewSource, url: &str) {
        self.sources.push(SourceReport::new(source, url));
    }

    pub fn record_error(
        &mut self,
        kind: RunErrorKind,
        source: ReviewSource,
        detail: impl fmt::Display,
    ) {
        self.errors.push(format!("{kind} [{source}]: {detail}"));
    }

    /// Count the batch's records and carry over its parse and card errors
    pub fn record_batch(&mut self, batch: &SourceBatch) {
        for error in &batch.errors {
            self.record_error(RunErrorKind::of(error), batch.source, error);
        }
        if let Some(entry) = self.entry(batch.source) {
            entry.extracted += batch.reviews.len();
        }
    }

    pub fn record_persisted(&mut self, review: &Review) {
        if let Some(entry) = self.entry(review.source) {
            entry.persisted += 1;
            *entry.rating_breakdown.entry(review.rating).or_insert(0) += 1;
        }
    }

    pub fn record_persist_failure(&mut self, review: &Review, error: impl fmt::Display) {
        if let Some(entry) = self.entry(review.source) {
            entry.failed += 1;
        }
        self.record_error(
            RunErrorKind::Persistence,
            review.source,
            format!("{}: {}", review.id, error),
        );
    }

    fn entry(&mut self, source: ReviewSource) -> Option<&mut SourceReport> {
        self.sources.iter_mut().rev().find(|s| s.source == source)
    }

    pub fn finish(self, finished_at: DateTime<Utc>) -> RunReport {
        let total_processed: usize = self.sources.iter().map(|s| s.persisted).sum();

        let star_sum: usize = self
            .sources
            .iter()
            .flat_map(|s| s.rating_breakdown.iter())
            .map(|(star, count)| *star as usize * count)
            .sum();
        let average_rating = (total_processed > 0)
            .then(|| ((star_sum as f64 / total_processed as f64) * 100.0).round() / 100.0);

        let status = match (total_processed, self.errors.len()) {
            (n, 0) => format!("ok: {n} reviews processed"),
            (0, e) => format!("failed: no reviews processed ({e} errors)"),
            (n, e) => format!("completed with {e} errors: {n} reviews processed"),
        };

        RunReport {
            last_run: Some(self.started_at),
            finished_at: Some(finished_at),
            status,
            total_processed,
            average_rating,
            sources: self.sources,
            errors: self.errors,
        }
    }
}
