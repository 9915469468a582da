//! Pipeline error types.

use thiserror::Error;

/// Errors that can occur while running the construction pipeline.
///
/// Only I/O and setup problems surface here; classification and embedding
/// failures are absorbed as degraded values inside the run.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Empty corpus: {0}")]
    EmptyCorpus(String),
}
