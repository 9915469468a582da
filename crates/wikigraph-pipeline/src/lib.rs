//! # wikigraph-pipeline
//!
//! End-to-end graph construction: read a corpus of encyclopedia articles,
//! classify titles as entities, close the surviving corpus under its own
//! links, embed titles, score similarity edges, preprocess the result, and
//! write the node/edge/audit artifacts.
//!
//! No stage in the pipeline is fatal: external-call failures degrade
//! individual values (non-entity flags, empty embeddings) and the run
//! always produces output, possibly tagged as degraded.

pub mod artifacts;
pub mod error;
pub mod ingest;
pub mod run;

pub use error::PipelineError;
pub use run::{Pipeline, PipelineOutput};
