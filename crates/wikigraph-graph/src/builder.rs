//! Candidate-edge construction: link closure, similarity scoring, top-K.

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use tracing::{debug, info};

use wikigraph_types::{Article, Edge, Embedding};

use crate::similarity::cosine_similarity;

/// Builds the weighted candidate edge list for a corpus.
///
/// Pipeline per source article, in corpus order:
/// 1. expand `links` into one (source, target) row per link, duplicates
///    preserved, and keep only targets that are themselves corpus articles;
/// 2. score each row with cosine similarity between the endpoint title
///    embeddings (missing embedding = similarity 0);
/// 3. drop rows with similarity <= 0;
/// 4. keep the top K rows per source, ordered by similarity descending with
///    ties broken by target id ascending so runs are reproducible.
pub struct SimilarityGraphBuilder {
    top_k: usize,
}

impl SimilarityGraphBuilder {
    pub fn new(top_k: usize) -> Self {
        Self { top_k }
    }

    /// Expand each article's links and keep only links that resolve to
    /// another article in `articles` (closing the corpus under itself).
    ///
    /// Duplicate links yield duplicate rows on purpose; the undirected
    /// dedup belongs to preprocessing, not here.
    pub fn candidate_links(&self, articles: &[Article]) -> Vec<(String, String)> {
        let known: HashSet<&str> = articles.iter().map(|a| a.title.as_str()).collect();

        let rows: Vec<(String, String)> = articles
            .iter()
            .flat_map(|article| {
                article
                    .links
                    .iter()
                    .filter(|link| known.contains(link.as_str()))
                    .map(|link| (article.title.clone(), link.clone()))
            })
            .collect();

        debug!(rows = rows.len(), "Expanded candidate links");
        rows
    }

    /// Build the final edge list from a corpus and its title embeddings.
    ///
    /// `embeddings` is positional with `articles`; the empty vector is the
    /// "no embedding" sentinel and scores 0 against everything.
    pub fn build(&self, articles: &[Article], embeddings: &[Embedding]) -> Vec<Edge> {
        let by_title: HashMap<&str, &Embedding> = articles
            .iter()
            .zip(embeddings.iter())
            .map(|(article, embedding)| (article.title.as_str(), embedding))
            .collect();

        let rows = self.candidate_links(articles);

        let mut per_source: HashMap<String, Vec<Edge>> = HashMap::new();
        let mut source_order: Vec<String> = Vec::new();

        for (source, target) in rows {
            let similarity = match (by_title.get(source.as_str()), by_title.get(target.as_str())) {
                (Some(src), Some(tgt)) => cosine_similarity(src, tgt),
                _ => 0.0,
            };

            // Positive-signal filter: genuinely dissimilar pairs and
            // failed-embedding pairs both land here and are dropped.
            if similarity <= 0.0 {
                continue;
            }

            let entry = per_source.entry(source.clone()).or_default();
            if entry.is_empty() {
                source_order.push(source.clone());
            }
            entry.push(Edge::new(source, target, similarity));
        }

        let mut edges = Vec::new();
        for source in &source_order {
            let mut candidates = per_source.remove(source).unwrap_or_default();
            candidates.sort_by(compare_candidates);
            candidates.truncate(self.top_k);
            edges.extend(candidates);
        }

        info!(edges = edges.len(), top_k = self.top_k, "Built edge list");
        edges
    }
}

/// Similarity descending, then target id ascending. The secondary key is a
/// deliberate policy choice to keep output stable across runs.
fn compare_candidates(a: &Edge, b: &Edge) -> Ordering {
    b.similarity
        .partial_cmp(&a.similarity)
        .unwrap_or(Ordering::Equal)
        .then_with(|| a.target.cmp(&b.target))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn article(title: &str, links: &[&str]) -> Article {
        Article::new(title, links.iter().map(|s| s.to_string()).collect())
    }

    #[test]
    fn test_closure_filter_drops_unknown_links() {
        let articles = vec![
            article("A", &["B", "Outside", "C"]),
            article("B", &["A"]),
            article("C", &[]),
        ];
        let builder = SimilarityGraphBuilder::new(10);

        let rows = builder.candidate_links(&articles);

        assert_eq!(
            rows,
            vec![
                ("A".to_string(), "B".to_string()),
                ("A".to_string(), "C".to_string()),
                ("B".to_string(), "A".to_string()),
            ]
        );
    }

    #[test]
    fn test_closure_filter_keeps_duplicate_links() {
        let articles = vec![article("A", &["B", "B"]), article("B", &[])];
        let builder = SimilarityGraphBuilder::new(10);

        let rows = builder.candidate_links(&articles);
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn test_build_scores_and_filters() {
        let articles = vec![
            article("A", &["B", "C"]),
            article("B", &[]),
            article("C", &[]),
        ];
        // B points the same way as A, C points the opposite way.
        let embeddings = vec![vec![1.0, 0.0], vec![0.9, 0.1], vec![-1.0, 0.0]];
        let builder = SimilarityGraphBuilder::new(10);

        let edges = builder.build(&articles, &embeddings);

        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].source, "A");
        assert_eq!(edges[0].target, "B");
        assert!(edges[0].similarity > 0.9);
    }

    #[test]
    fn test_missing_embedding_scores_zero_and_is_dropped() {
        let articles = vec![article("A", &["B"]), article("B", &[])];
        let embeddings = vec![vec![1.0, 0.0], Vec::new()];
        let builder = SimilarityGraphBuilder::new(10);

        let edges = builder.build(&articles, &embeddings);
        assert!(edges.is_empty());
    }

    #[test]
    fn test_top_k_bound() {
        // One source with 15 targets of distinct similarities.
        let mut articles = vec![article(
            "Hub",
            &[
                "T00", "T01", "T02", "T03", "T04", "T05", "T06", "T07", "T08", "T09", "T10",
                "T11", "T12", "T13", "T14",
            ],
        )];
        let mut embeddings = vec![vec![1.0, 0.0]];
        for i in 0..15 {
            articles.push(article(&format!("T{:02}", i), &[]));
            // Angle grows with i, so similarity strictly decreases with i.
            let angle = 0.05 + 0.09 * i as f32;
            embeddings.push(vec![angle.cos(), angle.sin()]);
        }

        let builder = SimilarityGraphBuilder::new(10);
        let edges = builder.build(&articles, &embeddings);

        assert_eq!(edges.len(), 10);
        // Highest 10 similarities, sorted descending.
        for window in edges.windows(2) {
            assert!(window[0].similarity >= window[1].similarity);
        }
        let targets: Vec<&str> = edges.iter().map(|e| e.target.as_str()).collect();
        assert_eq!(targets[0], "T00");
        assert!(!targets.contains(&"T10"));
    }

    #[test]
    fn test_tie_break_is_lexicographic_by_target() {
        let articles = vec![
            article("A", &["Zebra", "Apple", "Mango"]),
            article("Zebra", &[]),
            article("Apple", &[]),
            article("Mango", &[]),
        ];
        // All targets identical to the source: similarity ties at 1.0.
        let embeddings = vec![
            vec![1.0, 0.0],
            vec![1.0, 0.0],
            vec![1.0, 0.0],
            vec![1.0, 0.0],
        ];

        let builder = SimilarityGraphBuilder::new(2);
        let edges = builder.build(&articles, &embeddings);

        let targets: Vec<&str> = edges.iter().map(|e| e.target.as_str()).collect();
        assert_eq!(targets, vec!["Apple", "Mango"]);
    }

    #[test]
    fn test_per_source_cap_not_global() {
        let articles = vec![
            article("A", &["B", "C"]),
            article("B", &["A", "C"]),
            article("C", &[]),
        ];
        let embeddings = vec![vec![1.0, 0.1], vec![1.0, 0.2], vec![1.0, 0.3]];

        let builder = SimilarityGraphBuilder::new(1);
        let edges = builder.build(&articles, &embeddings);

        // One edge per source, two sources.
        assert_eq!(edges.len(), 2);
        let sources: HashSet<&str> = edges.iter().map(|e| e.source.as_str()).collect();
        assert_eq!(sources.len(), 2);
    }

    #[test]
    fn test_empty_corpus() {
        let builder = SimilarityGraphBuilder::new(10);
        assert!(builder.build(&[], &[]).is_empty());
    }
}
