//! Sub-batched embedding generation with degraded-failure handling.

use std::time::Duration;

use tracing::{info, warn};

use wikigraph_types::{Embedding, EmbeddingSettings};

use crate::client::EmbeddingClient;

/// Batched embedding generator.
///
/// Processes titles in fixed sub-batches, pausing briefly between requests
/// as a rate-limiting courtesy. A failed sub-batch yields one empty-vector
/// sentinel per title in it; the run continues.
pub struct EmbeddingGenerator<C: EmbeddingClient> {
    client: C,
    settings: EmbeddingSettings,
}

impl<C: EmbeddingClient> EmbeddingGenerator<C> {
    pub fn new(client: C, settings: EmbeddingSettings) -> Self {
        Self { client, settings }
    }

    /// Embed every title, returning one vector (possibly the empty sentinel)
    /// per input title, in input order. Never fails.
    pub async fn generate(&self, titles: &[String]) -> Vec<Embedding> {
        let batch_size = self.settings.batch_size.max(1);
        let mut embeddings: Vec<Embedding> = Vec::with_capacity(titles.len());

        info!(titles = titles.len(), batch_size, "Generating embeddings");

        let batch_count = titles.chunks(batch_size).count();
        for (i, batch) in titles.chunks(batch_size).enumerate() {
            match self.client.embed(batch).await {
                Ok(vectors) if vectors.len() == batch.len() => {
                    embeddings.extend(vectors);
                }
                Ok(vectors) => {
                    warn!(
                        expected = batch.len(),
                        got = vectors.len(),
                        "Embedding sub-batch length mismatch, degrading sub-batch"
                    );
                    embeddings.extend(std::iter::repeat(Vec::new()).take(batch.len()));
                }
                Err(e) => {
                    warn!(batch = i, error = %e, "Embedding sub-batch failed, degrading sub-batch");
                    embeddings.extend(std::iter::repeat(Vec::new()).take(batch.len()));
                }
            }

            // Courtesy pause, skipped after the final sub-batch.
            if i + 1 < batch_count && self.settings.pause_ms > 0 {
                tokio::time::sleep(Duration::from_millis(self.settings.pause_ms)).await;
            }
        }

        embeddings
    }
}
