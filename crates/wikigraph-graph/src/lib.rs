//! # wikigraph-graph
//!
//! Similarity-edge construction and graph preprocessing.
//!
//! [`SimilarityGraphBuilder`] turns a link-closed corpus plus title
//! embeddings into a flat edge list: cosine similarity per candidate edge,
//! non-positive scores dropped, at most K outgoing edges per source.
//!
//! [`preprocess`] then enforces the structural invariants a served graph
//! must hold: unique node ids, no self-loops, at most one edge per
//! unordered node pair, no isolated nodes. It is idempotent and reports
//! degradation through a tagged outcome instead of failing.

pub mod builder;
pub mod preprocess;
pub mod query;
pub mod similarity;

pub use builder::SimilarityGraphBuilder;
pub use preprocess::{preprocess, PreprocessOutcome};
pub use query::{filter_edges_by_threshold, ConnectionIndex};
pub use similarity::cosine_similarity;
