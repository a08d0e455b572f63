// TestDependencies - mock implementations for testing
//
// Provides a recording review store and assembles ServerDeps around the
// MockFetcher from review-extraction.

use anyhow::Result;
use async_trait::async_trait;
use review_extraction::testing::MockFetcher;
use review_extraction::Review;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use super::{BaseReviewStore, ServerDeps};

// =============================================================================
// Mock Review Store
// =============================================================================

/// In-memory keyed store. Rows are replaced on id conflict, like the real table.
#[derive(Clone, Default)]
pub struct MockReviewStore {
    rows: Arc<Mutex<HashMap<String, Review>>>,
    upsert_calls: Arc<Mutex<Vec<String>>>,
    failing_ids: Arc<Mutex<HashSet<String>>>,
    fail_all: Arc<Mutex<bool>>,
}

impl MockReviewStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject upserts of the review with this id
    pub fn with_failure_for(self, id: &str) -> Self {
        self.failing_ids.lock().unwrap().insert(id.to_string());
        self
    }

    /// Reject every upsert
    pub fn failing(self) -> Self {
        *self.fail_all.lock().unwrap() = true;
        self
    }

    /// Ids passed to `upsert_review`, in call order (failed calls included)
    pub fn upsert_calls(&self) -> Vec<String> {
        self.upsert_calls.lock().unwrap().clone()
    }

    pub fn row_count(&self) -> usize {
        self.rows.lock().unwrap().len()
    }

    pub fn get(&self, id: &str) -> Option<Review> {
        self.rows.lock().unwrap().get(id).cloned()
    }

    pub fn ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.rows.lock().unwrap().keys().cloned().collect();
        ids.sort();
        ids
    }
}

#[async_trait]
impl BaseReviewStore for MockReviewStore {
    async fn upsert_review(&self, review: &Review) -> Result<()> {
        self.upsert_calls.lock().unwrap().push(review.id.clone());

        if *self.fail_all.lock().unwrap() || self.failing_ids.lock().unwrap().contains(&review.id)
        {
            anyhow::bail!("store rejected review {}", review.id);
        }

        self.rows
            .lock()
            .unwrap()
            .insert(review.id.clone(), review.clone());
        Ok(())
    }
}

// =============================================================================
// TestDependencies
// =============================================================================

/// Builder for ServerDeps backed by mocks
#[derive(Clone, Default)]
pub struct TestDependencies {
    pub fetcher: MockFetcher,
    pub store: MockReviewStore,
}

impl TestDependencies {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mock_fetcher(mut self, fetcher: MockFetcher) -> Self {
        self.fetcher = fetcher;
        self
    }

    pub fn mock_store(mut self, store: MockReviewStore) -> Self {
        self.store = store;
        self
    }

    /// Build ServerDeps that share state with the mocks held here
    pub fn into_server_deps(&self) -> ServerDeps {
        ServerDeps::new(Arc::new(self.fetcher.clone()), Arc::new(self.store.clone()))
    }
}
