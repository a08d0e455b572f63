//! Server dependencies for the sync cycle (using traits for testability)
//!
//! This module provides the dependency container handed to the review
//! pipeline. The page fetcher and the review store are trait objects so tests
//! can swap in the mocks from `test_dependencies`.

use anyhow::Result;
use async_trait::async_trait;
use review_extraction::{PageFetcher, Review};
use std::sync::Arc;
use supabase_client::SupabaseClient;

use crate::kernel::BaseReviewStore;

/// Supabase table holding the persisted reviews.
pub const REVIEWS_TABLE: &str = "reviews";

// =============================================================================
// SupabaseClient Adapter (implements BaseReviewStore trait)
// =============================================================================

/// Wrapper around SupabaseClient that implements BaseReviewStore trait
pub struct SupabaseReviewStore(pub Arc<SupabaseClient>);

impl SupabaseReviewStore {
    pub fn new(client: Arc<SupabaseClient>) -> Self {
        Self(client)
    }
}

#[async_trait]
impl BaseReviewStore for SupabaseReviewStore {
    async fn upsert_review(&self, review: &Review) -> Result<()> {
        self.0
            .upsert(REVIEWS_TABLE, review)
            .await
            .map_err(anyhow::Error::from)
    }
}

// =============================================================================
// ServerDeps
// =============================================================================

/// Dependencies shared by every sync cycle
#[derive(Clone)]
pub struct ServerDeps {
    pub fetcher: Arc<dyn PageFetcher>,
    pub store: Arc<dyn BaseReviewStore>,
}

impl ServerDeps {
    pub fn new(fetcher: Arc<dyn PageFetcher>, store: Arc<dyn BaseReviewStore>) -> Self {
        Self { fetcher, store }
    }
}
