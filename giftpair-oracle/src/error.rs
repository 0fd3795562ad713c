//! Oracle error types.
//!
//! Every failure mode has a named variant. The pipeline seams take
//! strings, so these are flattened with `to_string()` at the boundary.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum OracleError {
    #[error("OPENAI_API_KEY is not set")]
    MissingApiKey,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Response held no message content")]
    EmptyResponse,

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias for oracle calls.
pub type OracleResult<T> = Result<T, OracleError>;
