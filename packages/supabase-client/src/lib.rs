//! Pure Supabase REST client.
//!
//! A minimal client for the PostgREST API that Supabase exposes under
//! `/rest/v1`. Supports upserting rows keyed by a conflict column.
//!
//! # Example
//!
//! ```rust,ignore
//! use supabase_client::SupabaseClient;
//!
//! let client = SupabaseClient::new("https://xyz.supabase.co", "anon-key")?;
//!
//! client.upsert("reviews", &review).await?;
//! ```

pub mod error;

pub use error::{Result, SupabaseError};

use serde::Serialize;
use std::time::Duration;

const REST_PATH: &str = "rest/v1";

/// Column used for conflict resolution unless overridden.
pub const DEFAULT_CONFLICT_COLUMN: &str = "id";

pub struct SupabaseClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl SupabaseClient {
    /// Create a client for a project URL such as `https://<ref>.supabase.co`.
    pub fn new(project_url: &str, api_key: impl Into<String>) -> Result<Self> {
        let base_url = project_url.trim().trim_end_matches('/').to_string();
        if !(base_url.starts_with("https://") || base_url.starts_with("http://")) {
            return Err(SupabaseError::InvalidUrl(project_url.to_string()));
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            client,
            base_url,
            api_key: api_key.into(),
        })
    }

    /// PostgREST endpoint for upserting into `table`.
    pub fn upsert_url(&self, table: &str, conflict_column: &str) -> String {
        format!(
            "{}/{}/{}?on_conflict={}",
            self.base_url, REST_PATH, table, conflict_column
        )
    }

    /// Insert `row` into `table`, or update the existing row with the same `id`.
    pub async fn upsert<T: Serialize + ?Sized>(&self, table: &str, row: &T) -> Result<()> {
        self.upsert_on(table, DEFAULT_CONFLICT_COLUMN, row).await
    }

    /// Upsert keyed by an explicit conflict column.
    pub async fn upsert_on<T: Serialize + ?Sized>(
        &self,
        table: &str,
        conflict_column: &str,
        row: &T,
    ) -> Result<()> {
        let url = self.upsert_url(table, conflict_column);
        let resp = self
            .client
            .post(&url)
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .header("Prefer", "resolution=merge-duplicates,return=minimal")
            .json(row)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(SupabaseError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        tracing::debug!(table, "Upserted row");
        Ok(())
    }
}
