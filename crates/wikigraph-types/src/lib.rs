//! # wikigraph-types
//!
//! Shared data model and configuration for the wikigraph pipeline.
//!
//! The pipeline turns a corpus of encyclopedia articles into a weighted
//! similarity graph: articles are classified as entities or plain topics,
//! titles are embedded, outgoing links become similarity-scored edges, and
//! the result is cleaned into a simple undirected graph for serving.
//!
//! This crate holds the value types that cross crate boundaries (Article,
//! Node, Edge, Graph, TitleClassification), the layered `Settings`
//! configuration, and the shared error type.

pub mod article;
pub mod config;
pub mod error;

pub use article::{Article, Edge, Graph, Node, TitleClassification};
pub use config::{ClassifierSettings, EmbeddingSettings, GraphSettings, Settings};
pub use error::WikigraphError;

/// An embedding vector. An empty vector is the degraded-value sentinel for
/// "embedding unavailable"; similarity against it is defined as 0.0.
pub type Embedding = Vec<f32>;
