//! Output artifacts: node/edge tables and the classification audit.
//!
//! Tables are line-delimited JSON, one record per line, written once per
//! pipeline run and treated as read-only by downstream consumers. The audit
//! file is a single JSON array covering every input title, including ones
//! that were defaulted to non-entity.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use tracing::info;

use wikigraph_types::{Edge, Graph, Node, TitleClassification};

use crate::error::PipelineError;

pub const NODES_FILE: &str = "nodes.jsonl";
pub const EDGES_FILE: &str = "edges.jsonl";
pub const AUDIT_FILE: &str = "entity_classification.json";

/// Write the nodes table, edges table, and classification audit into
/// `output_dir`.
pub fn write_artifacts(
    output_dir: &Path,
    graph: &Graph,
    audit: &[TitleClassification],
) -> Result<(), PipelineError> {
    std::fs::create_dir_all(output_dir)?;

    write_jsonl(&output_dir.join(NODES_FILE), &graph.nodes)?;
    write_jsonl(&output_dir.join(EDGES_FILE), &graph.edges)?;

    let audit_file = File::create(output_dir.join(AUDIT_FILE))?;
    serde_json::to_writer(BufWriter::new(audit_file), audit)?;

    info!(
        nodes = graph.nodes.len(),
        edges = graph.edges.len(),
        audited_titles = audit.len(),
        dir = %output_dir.display(),
        "Wrote artifacts"
    );

    Ok(())
}

fn write_jsonl<T: serde::Serialize>(path: &Path, records: &[T]) -> Result<(), PipelineError> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    for record in records {
        serde_json::to_writer(&mut writer, record)?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;
    Ok(())
}

/// Read a stored nodes table.
pub fn read_nodes(path: &Path) -> Result<Vec<Node>, PipelineError> {
    read_jsonl(path)
}

/// Read a stored edges table.
pub fn read_edges(path: &Path) -> Result<Vec<Edge>, PipelineError> {
    read_jsonl(path)
}

fn read_jsonl<T: serde::de::DeserializeOwned>(path: &Path) -> Result<Vec<T>, PipelineError> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);

    let mut records = Vec::new();
    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        records.push(serde_json::from_str(&line)?);
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_and_read_back() {
        let dir = tempfile::tempdir().unwrap();
        let graph = Graph::new(
            vec![Node::new("A", "s", "t"), Node::new("B", "", "")],
            vec![Edge::new("A", "B", 0.5)],
        );
        let audit = vec![
            TitleClassification {
                title: "A".to_string(),
                is_entity: true,
            },
            TitleClassification {
                title: "Physics".to_string(),
                is_entity: false,
            },
        ];

        write_artifacts(dir.path(), &graph, &audit).unwrap();

        let nodes = read_nodes(&dir.path().join(NODES_FILE)).unwrap();
        let edges = read_edges(&dir.path().join(EDGES_FILE)).unwrap();
        assert_eq!(nodes, graph.nodes);
        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].source, "A");

        let audit_text = std::fs::read_to_string(dir.path().join(AUDIT_FILE)).unwrap();
        let decoded: Vec<TitleClassification> = serde_json::from_str(&audit_text).unwrap();
        assert_eq!(decoded, audit);
    }

    #[test]
    fn test_empty_graph_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        write_artifacts(dir.path(), &Graph::default(), &[]).unwrap();

        let nodes = read_nodes(&dir.path().join(NODES_FILE)).unwrap();
        assert!(nodes.is_empty());
    }
}
