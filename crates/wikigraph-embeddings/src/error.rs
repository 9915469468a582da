//! Embedding error types.

use thiserror::Error;

/// Error type for embedding operations.
#[derive(Debug, Error)]
pub enum EmbeddingError {
    #[error("API request failed: {0}")]
    ApiError(String),

    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    #[error("Invalid configuration: {0}")]
    ConfigError(String),
}
