//! Corpus and graph data types.

use serde::{Deserialize, Serialize};

/// One encyclopedia article as scraped from the source site.
///
/// `title` is the unique key for the whole pipeline: links refer to other
/// articles by title, and graph nodes inherit it as their id. `links` is
/// kept in scrape order and may contain duplicates or titles outside the
/// corpus; both are resolved later by the graph builder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Article {
    /// Article title, unique within a corpus
    pub title: String,
    /// Short lead-section summary
    #[serde(default)]
    pub summary: String,
    /// Full body text
    #[serde(default)]
    pub text: String,
    /// Source URL
    #[serde(default)]
    pub url: String,
    /// Category labels from the source site; accepted on ingest, unused downstream
    #[serde(default)]
    pub categories: Vec<String>,
    /// Outgoing link titles, in page order, duplicates allowed
    #[serde(default)]
    pub links: Vec<String>,
}

impl Article {
    /// Create an article with just a title and links, for tests and tools.
    pub fn new(title: impl Into<String>, links: Vec<String>) -> Self {
        Self {
            title: title.into(),
            summary: String::new(),
            text: String::new(),
            url: String::new(),
            categories: Vec::new(),
            links,
        }
    }
}

/// Audit record for one classified title.
///
/// One of these is emitted for every input title, including titles that were
/// defaulted to `false` after the retry budget ran out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TitleClassification {
    pub title: String,
    pub is_entity: bool,
}

/// A graph node: one surviving article.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    /// Node id (the article title)
    pub id: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub text: String,
}

impl Node {
    pub fn new(id: impl Into<String>, summary: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            summary: summary.into(),
            text: text.into(),
        }
    }
}

/// A weighted edge between two nodes.
///
/// `similarity` is cosine similarity between the endpoint title embeddings.
/// Only positive values survive the pipeline; 0.0 also stands in for "one
/// endpoint had no embedding".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Edge {
    pub source: String,
    pub target: String,
    pub similarity: f64,
}

impl Edge {
    pub fn new(source: impl Into<String>, target: impl Into<String>, similarity: f64) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            similarity,
        }
    }
}

/// A (nodes, edges) pair as handed between pipeline stages and written to disk.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Graph {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

impl Graph {
    pub fn new(nodes: Vec<Node>, edges: Vec<Edge>) -> Self {
        Self { nodes, edges }
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }
}
