//! wikigraph pipeline binary.
//!
//! Reads a corpus of encyclopedia articles (JSONL), builds the weighted
//! topic graph, and writes node/edge tables plus the classification audit.
//!
//! # Usage
//!
//! ```bash
//! wikigraph-pipeline [--config CONFIG] [--corpus PATH] [--output-dir DIR]
//! ```
//!
//! # Configuration
//!
//! Configuration is loaded in order (later sources override earlier):
//! 1. Built-in defaults
//! 2. Config file (via --config)
//! 3. Environment variables (WIKIGRAPH_*, e.g. WIKIGRAPH_API__API_KEY)
//! 4. CLI flags

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};

use wikigraph_classifier::{ApiClassificationClient, ApiClientConfig};
use wikigraph_embeddings::{ApiEmbeddingClient, EmbeddingClientConfig};
use wikigraph_pipeline::{artifacts, ingest, Pipeline};
use wikigraph_types::Settings;

/// Wikigraph construction pipeline
///
/// Builds a weighted similarity graph over an encyclopedia corpus.
#[derive(Parser, Debug)]
#[command(name = "wikigraph-pipeline")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to config file
    #[arg(short, long)]
    config: Option<String>,

    /// Corpus JSONL file (overrides config)
    #[arg(long)]
    corpus: Option<String>,

    /// Output directory for artifacts (overrides config)
    #[arg(short, long)]
    output_dir: Option<String>,

    /// Set log level (trace, debug, info, warn, error)
    #[arg(short, long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut settings = Settings::load(cli.config.as_deref()).context("Failed to load configuration")?;

    // CLI flags have the highest precedence.
    if let Some(corpus) = cli.corpus {
        settings.corpus_path = corpus;
    }
    if let Some(output_dir) = cli.output_dir {
        settings.output_dir = output_dir;
    }
    if let Some(log_level) = cli.log_level {
        settings.log_level = log_level;
    }

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&settings.log_level)),
        )
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;

    info!("Wikigraph pipeline starting");
    info!("  Corpus: {}", settings.corpus_path);
    info!("  Output: {}", settings.output_dir);

    let api_key = settings
        .api
        .api_key
        .clone()
        .context("API key missing; set WIKIGRAPH_API__API_KEY or api.api_key in the config file")?;
    let timeout = Duration::from_secs(settings.api.timeout_secs);

    let classification_client = ApiClassificationClient::new(
        ApiClientConfig::new(
            &settings.api.base_url,
            api_key.clone(),
            &settings.classifier.model,
        )
        .with_timeout(timeout),
    )
    .context("Failed to build classification client")?;

    let embedding_client = ApiEmbeddingClient::new(
        EmbeddingClientConfig::new(&settings.api.base_url, api_key, &settings.embedding.model)
            .with_timeout(timeout),
    )
    .context("Failed to build embedding client")?;

    let articles = ingest::read_corpus(Path::new(&settings.corpus_path))?;

    let pipeline = Pipeline::new(classification_client, embedding_client, settings.clone());
    let output = pipeline.run(articles).await;

    if let Some(cause) = &output.degraded {
        warn!(%cause, "Pipeline output is degraded: preprocessing was skipped");
    }

    artifacts::write_artifacts(Path::new(&settings.output_dir), &output.graph, &output.audit)?;

    info!(
        nodes = output.graph.nodes.len(),
        edges = output.graph.edges.len(),
        "Pipeline complete"
    );

    Ok(())
}
