//! Classifier error types.

use thiserror::Error;

/// Error type for classification operations.
///
/// These never escape a pipeline run as hard failures: the batch engine
/// absorbs them into its retry loop and defaults unresolved titles.
#[derive(Debug, Error)]
pub enum ClassifierError {
    #[error("API request failed: {0}")]
    ApiError(String),

    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    #[error("Invalid configuration: {0}")]
    ConfigError(String),
}
