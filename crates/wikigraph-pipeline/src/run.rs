//! Pipeline orchestration.

use std::collections::HashMap;

use tracing::{info, instrument, warn};

use wikigraph_classifier::{ClassificationClient, EntityClassifier};
use wikigraph_embeddings::{EmbeddingClient, EmbeddingGenerator};
use wikigraph_graph::{preprocess, PreprocessOutcome, SimilarityGraphBuilder};
use wikigraph_types::{Article, Graph, Node, Settings, TitleClassification};

/// Result of one construction run.
#[derive(Debug)]
pub struct PipelineOutput {
    /// Preprocessed graph, ready to be written.
    pub graph: Graph,
    /// One classification record per input title, in input order.
    pub audit: Vec<TitleClassification>,
    /// Set when preprocessing fell back to its unmodified input.
    pub degraded: Option<String>,
}

/// The graph construction pipeline.
///
/// Stages run in a fixed order: classify titles, drop non-entities, embed
/// surviving titles, build similarity edges, preprocess. Each worker-facing
/// stage owns its own client; there is no process-wide API state.
pub struct Pipeline<C: ClassificationClient, E: EmbeddingClient> {
    classifier: EntityClassifier<C>,
    embedder: EmbeddingGenerator<E>,
    settings: Settings,
}

impl<C: ClassificationClient, E: EmbeddingClient> Pipeline<C, E> {
    pub fn new(classification_client: C, embedding_client: E, settings: Settings) -> Self {
        Self {
            classifier: EntityClassifier::new(classification_client, settings.classifier.clone()),
            embedder: EmbeddingGenerator::new(embedding_client, settings.embedding.clone()),
            settings,
        }
    }

    /// Run the full pipeline over a corpus.
    #[instrument(skip_all, fields(articles = articles.len()))]
    pub async fn run(&self, articles: Vec<Article>) -> PipelineOutput {
        let titles: Vec<String> = articles.iter().map(|a| a.title.clone()).collect();

        let audit = self.classifier.classify_titles(&titles).await;

        let is_entity: HashMap<&str, bool> = audit
            .iter()
            .map(|c| (c.title.as_str(), c.is_entity))
            .collect();

        let survivors: Vec<Article> = articles
            .into_iter()
            .filter(|a| *is_entity.get(a.title.as_str()).unwrap_or(&false))
            .collect();

        info!(
            entities = survivors.len(),
            dropped = titles.len() - survivors.len(),
            "Entity filter applied"
        );

        let surviving_titles: Vec<String> = survivors.iter().map(|a| a.title.clone()).collect();
        let embeddings = self.embedder.generate(&surviving_titles).await;

        let builder = SimilarityGraphBuilder::new(self.settings.graph.top_k);
        let edges = builder.build(&survivors, &embeddings);

        let nodes: Vec<Node> = survivors
            .into_iter()
            .map(|a| Node::new(a.title, a.summary, a.text))
            .collect();

        let raw = Graph::new(nodes, edges);
        let (graph, degraded) = match preprocess(&raw) {
            PreprocessOutcome::Clean(graph) => (graph, None),
            PreprocessOutcome::DegradedFallback { graph, cause } => {
                warn!(%cause, "Shipping unpreprocessed graph");
                (graph, Some(cause))
            }
        };

        PipelineOutput {
            graph,
            audit,
            degraded,
        }
    }
}
