//! # wikigraph-embeddings
//!
//! Batched title embedding generation.
//!
//! Titles go out in fixed sub-batches to respect endpoint throughput
//! limits. A failed sub-batch is not retried: every title in it gets an
//! empty-vector sentinel instead, a deliberately weaker guarantee than the
//! classifier's retry loop. Downstream similarity computation treats the
//! sentinel as "no signal" (similarity 0).
//!
//! Input and output are parallel arrays: `generate` returns exactly one
//! vector per input title, in input order.

pub mod client;
pub mod error;
pub mod generator;

pub use client::{ApiEmbeddingClient, EmbeddingClient, EmbeddingClientConfig};
pub use error::EmbeddingError;
pub use generator::EmbeddingGenerator;
