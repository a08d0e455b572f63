use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;
use std::time::Duration;

pub const DEFAULT_TRUSTPILOT_URL: &str = "https://nl.trustpilot.com/review/skinvaults.online";
pub const DEFAULT_SITEJABBER_URL: &str = "https://www.sitejabber.com/reviews/skinvaults.online";

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub supabase_url: String,
    pub supabase_key: String,
    pub trustpilot_url: String,
    pub sitejabber_url: String,
    pub port: u16,
    pub scrape_interval: Duration,
    pub fetch_timeout: Duration,
    pub fetch_max_attempts: u32,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Self::from_vars(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        Ok(Self {
            supabase_url: var("SUPABASE_URL").context("SUPABASE_URL must be set")?,
            supabase_key: var("SUPABASE_KEY").context("SUPABASE_KEY must be set")?,
            trustpilot_url: var("TRUSTPILOT_URL")
                .unwrap_or_else(|| DEFAULT_TRUSTPILOT_URL.to_string()),
            sitejabber_url: var("SITEJABBER_URL")
                .unwrap_or_else(|| DEFAULT_SITEJABBER_URL.to_string()),
            port: var("PORT")
                .unwrap_or_else(|| "5000".to_string())
                .parse()
                .context("PORT must be a valid number")?,
            scrape_interval: Duration::from_secs(
                var("SCRAPE_INTERVAL_SECS")
                    .unwrap_or_else(|| "3600".to_string())
                    .parse()
                    .context("SCRAPE_INTERVAL_SECS must be a number of seconds")?,
            ),
            fetch_timeout: Duration::from_secs(
                var("FETCH_TIMEOUT_SECS")
                    .unwrap_or_else(|| "15".to_string())
                    .parse()
                    .context("FETCH_TIMEOUT_SECS must be a number of seconds")?,
            ),
            fetch_max_attempts: var("FETCH_MAX_ATTEMPTS")
                .unwrap_or_else(|| "2".to_string())
                .parse()
                .context("FETCH_MAX_ATTEMPTS must be a positive number")?,
        })
    }
}
