//! Corpus ingestion from line-delimited JSON.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use tracing::{info, warn};

use wikigraph_types::Article;

use crate::error::PipelineError;

/// Read a corpus file: one JSON article record per line.
///
/// Ingest is best-effort: blank lines are ignored and unparsable lines are
/// skipped with a warning rather than failing the run. An empty result is
/// an error, since nothing downstream can work without articles.
pub fn read_corpus(path: &Path) -> Result<Vec<Article>, PipelineError> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);

    let mut articles = Vec::new();
    let mut skipped = 0usize;

    for (line_number, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        match serde_json::from_str::<Article>(&line) {
            Ok(article) => articles.push(article),
            Err(e) => {
                skipped += 1;
                warn!(line = line_number + 1, error = %e, "Skipping unparsable corpus line");
            }
        }
    }

    if articles.is_empty() {
        return Err(PipelineError::EmptyCorpus(format!(
            "no parsable articles in {}",
            path.display()
        )));
    }

    info!(
        articles = articles.len(),
        skipped,
        path = %path.display(),
        "Read corpus"
    );

    Ok(articles)
}
