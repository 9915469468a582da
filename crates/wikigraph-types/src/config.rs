//! Configuration loading for the wikigraph pipeline.
//!
//! Layered precedence: built-in defaults -> config file -> WIKIGRAPH_* env
//! vars. CLI flags are applied by the binary after `Settings::load` returns.

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::error::WikigraphError;

/// Entity classifier settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierSettings {
    /// Model used for classification requests
    #[serde(default = "default_classifier_model")]
    pub model: String,

    /// Maximum titles per classification batch (caller-enforced cap)
    #[serde(default = "default_classifier_batch_size")]
    pub batch_size: usize,

    /// Number of batches classified concurrently
    #[serde(default = "default_classifier_concurrency")]
    pub concurrency: usize,

    /// Attempts per batch before unclassified titles default to false
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Pause between retry attempts, in milliseconds
    #[serde(default = "default_retry_pause_ms")]
    pub retry_pause_ms: u64,
}

impl Default for ClassifierSettings {
    fn default() -> Self {
        Self {
            model: default_classifier_model(),
            batch_size: default_classifier_batch_size(),
            concurrency: default_classifier_concurrency(),
            max_attempts: default_max_attempts(),
            retry_pause_ms: default_retry_pause_ms(),
        }
    }
}

fn default_classifier_model() -> String {
    "gpt-4o-mini".to_string()
}
fn default_classifier_batch_size() -> usize {
    100
}
fn default_classifier_concurrency() -> usize {
    4
}
fn default_max_attempts() -> u32 {
    3
}
fn default_retry_pause_ms() -> u64 {
    1000
}

/// Embedding generator settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingSettings {
    /// Embedding model
    #[serde(default = "default_embedding_model")]
    pub model: String,

    /// Titles per embedding request
    #[serde(default = "default_embedding_batch_size")]
    pub batch_size: usize,

    /// Courtesy pause between sub-batches, in milliseconds
    #[serde(default = "default_embedding_pause_ms")]
    pub pause_ms: u64,
}

impl Default for EmbeddingSettings {
    fn default() -> Self {
        Self {
            model: default_embedding_model(),
            batch_size: default_embedding_batch_size(),
            pause_ms: default_embedding_pause_ms(),
        }
    }
}

fn default_embedding_model() -> String {
    "text-embedding-3-small".to_string()
}
fn default_embedding_batch_size() -> usize {
    20
}
fn default_embedding_pause_ms() -> u64 {
    100
}

/// Graph construction and serving settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphSettings {
    /// Outgoing edges kept per source node
    #[serde(default = "default_top_k")]
    pub top_k: usize,

    /// Load-time similarity cutoff applied before re-preprocessing for serving
    #[serde(default = "default_serving_similarity_threshold")]
    pub serving_similarity_threshold: f64,
}

impl Default for GraphSettings {
    fn default() -> Self {
        Self {
            top_k: default_top_k(),
            serving_similarity_threshold: default_serving_similarity_threshold(),
        }
    }
}

fn default_top_k() -> usize {
    10
}
fn default_serving_similarity_threshold() -> f64 {
    0.42
}

/// API endpoint settings shared by the classifier and embedder clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiSettings {
    /// OpenAI-compatible API base URL
    #[serde(default = "default_api_base_url")]
    pub base_url: String,

    /// API key; usually supplied via WIKIGRAPH_API__API_KEY
    #[serde(default)]
    pub api_key: Option<String>,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: default_api_base_url(),
            api_key: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_api_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}
fn default_timeout_secs() -> u64 {
    60
}

/// Main application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Path to the corpus JSONL file
    #[serde(default = "default_corpus_path")]
    pub corpus_path: String,

    /// Directory for output artifacts (nodes/edges/audit)
    #[serde(default = "default_output_dir")]
    pub output_dir: String,

    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub api: ApiSettings,

    #[serde(default)]
    pub classifier: ClassifierSettings,

    #[serde(default)]
    pub embedding: EmbeddingSettings,

    #[serde(default)]
    pub graph: GraphSettings,
}

fn default_corpus_path() -> String {
    "wikipedia_articles.jsonl".to_string()
}

fn default_output_dir() -> String {
    ".".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            corpus_path: default_corpus_path(),
            output_dir: default_output_dir(),
            log_level: default_log_level(),
            api: ApiSettings::default(),
            classifier: ClassifierSettings::default(),
            embedding: EmbeddingSettings::default(),
            graph: GraphSettings::default(),
        }
    }
}

impl Settings {
    /// Load settings with layered precedence:
    /// 1. Built-in defaults
    /// 2. Optional config file given on the CLI
    /// 3. Environment variables (WIKIGRAPH_*, `__` as section separator)
    ///
    /// CLI flags should be applied by the caller after this returns.
    pub fn load(cli_config_path: Option<&str>) -> Result<Self, WikigraphError> {
        let mut builder = Config::builder()
            .set_default("corpus_path", default_corpus_path())
            .map_err(|e| WikigraphError::Config(e.to_string()))?
            .set_default("output_dir", default_output_dir())
            .map_err(|e| WikigraphError::Config(e.to_string()))?
            .set_default("log_level", default_log_level())
            .map_err(|e| WikigraphError::Config(e.to_string()))?;

        if let Some(path) = cli_config_path {
            builder = builder.add_source(File::with_name(path).required(true));
        }

        // WIKIGRAPH_API__API_KEY, WIKIGRAPH_CLASSIFIER__BATCH_SIZE, ...
        builder = builder.add_source(
            Environment::with_prefix("WIKIGRAPH")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder
            .build()
            .map_err(|e| WikigraphError::Config(e.to_string()))?;

        config
            .try_deserialize()
            .map_err(|e| WikigraphError::Config(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.classifier.batch_size, 100);
        assert_eq!(settings.classifier.concurrency, 4);
        assert_eq!(settings.classifier.max_attempts, 3);
        assert_eq!(settings.embedding.batch_size, 20);
        assert_eq!(settings.graph.top_k, 10);
        assert!((settings.graph.serving_similarity_threshold - 0.42).abs() < 1e-9);
        assert_eq!(settings.log_level, "info");
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .unwrap();
        writeln!(
            file,
            "corpus_path = \"articles.jsonl\"\n\n[classifier]\nbatch_size = 50\n\n[graph]\ntop_k = 5"
        )
        .unwrap();

        let settings = Settings::load(Some(file.path().to_str().unwrap())).unwrap();
        assert_eq!(settings.corpus_path, "articles.jsonl");
        assert_eq!(settings.classifier.batch_size, 50);
        assert_eq!(settings.graph.top_k, 5);
        // Untouched sections keep defaults
        assert_eq!(settings.embedding.batch_size, 20);
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let result = Settings::load(Some("/nonexistent/wikigraph.toml"));
        assert!(result.is_err());
    }

    #[test]
    fn test_serialization_roundtrip() {
        let settings = Settings::default();
        let json = serde_json::to_string(&settings).unwrap();
        let parsed: Settings = serde_json::from_str(&json).unwrap();
        assert_eq!(settings.classifier.model, parsed.classifier.model);
        assert_eq!(settings.graph.top_k, parsed.graph.top_k);
    }
}
