//! # wikigraph-classifier
//!
//! Batched entity classification for article titles.
//!
//! Titles are sent to a text-classification endpoint in batches of at most
//! 100; the service answers with a JSON array of `{title, is_entity}`
//! objects. Titles the service fails to answer for are retried up to a
//! bounded number of attempts and then conservatively defaulted to
//! `is_entity = false`, so a flaky endpoint degrades output instead of
//! failing the run.
//!
//! The client is pluggable via [`ClassificationClient`]; production use goes
//! through [`ApiClassificationClient`] against an OpenAI-compatible
//! chat-completions endpoint.

pub mod classifier;
pub mod client;
pub mod error;

pub use classifier::EntityClassifier;
pub use client::{ApiClassificationClient, ApiClientConfig, ClassificationClient};
pub use error::ClassifierError;
