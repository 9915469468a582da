//! Shared error type.

use thiserror::Error;

/// Errors that can occur in the shared types layer.
#[derive(Debug, Error)]
pub enum WikigraphError {
    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
