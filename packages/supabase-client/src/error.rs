use thiserror::Error;

#[derive(Debug, Error)]
pub enum SupabaseError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Supabase API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("invalid project URL: {0}")]
    InvalidUrl(String),
}

pub type Result<T> = std::result::Result<T, SupabaseError>;
