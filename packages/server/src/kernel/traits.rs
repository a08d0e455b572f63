// Trait definitions for dependency injection
//
// These are INFRASTRUCTURE traits only - no business logic.
// The sync cycle itself lives in domains::reviews and only talks to these traits.
//
// Naming convention: Base* for trait names (e.g., BaseReviewStore)

use anyhow::Result;
use async_trait::async_trait;
use review_extraction::Review;

// =============================================================================
// Review Store Trait (Infrastructure - keyed upsert)
// =============================================================================

#[async_trait]
pub trait BaseReviewStore: Send + Sync {
    /// Insert the review, or update the stored row that has the same id.
    async fn upsert_review(&self, review: &Review) -> Result<()>;
}
