//! Batch classification engine with bounded retries and a conservative
//! default.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use futures::stream::{self, StreamExt};
use tracing::{debug, info, warn};

use wikigraph_types::{ClassifierSettings, TitleClassification};

use crate::client::ClassificationClient;

/// Batched entity classifier.
///
/// Splits the input into batches of at most `batch_size` titles and runs up
/// to `concurrency` batches at once. Each batch is retried until every title
/// has a flag or `max_attempts` calls have been made; leftover titles are
/// defaulted to `is_entity = false`. Workers own disjoint title partitions,
/// so there is no shared mutable state across batches; the client is shared
/// behind an `Arc`.
pub struct EntityClassifier<C: ClassificationClient> {
    client: Arc<C>,
    settings: ClassifierSettings,
}

impl<C: ClassificationClient> EntityClassifier<C> {
    pub fn new(client: C, settings: ClassifierSettings) -> Self {
        Self {
            client: Arc::new(client),
            settings,
        }
    }

    /// Classify every title, returning one flag per input title in input
    /// order. This never fails: service errors are absorbed into the retry
    /// loop and unresolved titles come back as non-entities.
    pub async fn classify_titles(&self, titles: &[String]) -> Vec<TitleClassification> {
        if titles.is_empty() {
            return Vec::new();
        }

        let batch_size = self.settings.batch_size.max(1);
        let concurrency = self.settings.concurrency.max(1);

        let batches: Vec<(usize, Vec<String>)> = titles
            .chunks(batch_size)
            .map(|c| c.to_vec())
            .enumerate()
            .collect();

        info!(
            titles = titles.len(),
            batches = batches.len(),
            concurrency,
            "Classifying titles"
        );

        let mut results: Vec<(usize, Vec<TitleClassification>)> = stream::iter(batches)
            .map(|(index, batch)| {
                let client = Arc::clone(&self.client);
                let settings = self.settings.clone();
                async move {
                    let flags = classify_batch(client.as_ref(), &batch, &settings).await;
                    (index, flags)
                }
            })
            .buffer_unordered(concurrency)
            .collect()
            .await;

        // Batches complete in any order; input order is restored by index.
        results.sort_by_key(|(index, _)| *index);
        results.into_iter().flat_map(|(_, flags)| flags).collect()
    }
}

/// Classify one batch to completion.
///
/// Re-issues the call with only the still-pending titles until the batch is
/// resolved or the attempt budget runs out, pausing a fixed interval between
/// attempts. A failed or garbled response leaves every requested title
/// pending; it never propagates as an error.
async fn classify_batch<C: ClassificationClient>(
    client: &C,
    titles: &[String],
    settings: &ClassifierSettings,
) -> Vec<TitleClassification> {
    let mut resolved: HashMap<String, bool> = HashMap::new();
    let mut pending: Vec<String> = titles.to_vec();

    let mut attempt = 0;
    while !pending.is_empty() && attempt < settings.max_attempts {
        attempt += 1;

        match client.classify(&pending).await {
            Ok(flags) => {
                for flag in flags {
                    // Only accept answers for titles we actually asked about.
                    if pending.iter().any(|t| *t == flag.title) {
                        resolved.insert(flag.title, flag.is_entity);
                    }
                }
            }
            Err(e) => {
                warn!(attempt, error = %e, "Classification attempt failed");
            }
        }

        pending.retain(|t| !resolved.contains_key(t));

        if !pending.is_empty() && attempt < settings.max_attempts {
            debug!(
                attempt,
                pending = pending.len(),
                "Titles still pending, retrying"
            );
            tokio::time::sleep(Duration::from_millis(settings.retry_pause_ms)).await;
        }
    }

    if !pending.is_empty() {
        warn!(
            unresolved = pending.len(),
            "Defaulting unresolved titles to non-entity"
        );
    }

    titles
        .iter()
        .map(|title| TitleClassification {
            title: title.clone(),
            is_entity: *resolved.get(title).unwrap_or(&false),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    use crate::error::ClassifierError;

    /// Test client that replays a scripted sequence of attempt results.
    struct ScriptedClient {
        responses: Mutex<Vec<Result<Vec<TitleClassification>, ClassifierError>>>,
        requests: Mutex<Vec<Vec<String>>>,
    }

    impl ScriptedClient {
        fn new(responses: Vec<Result<Vec<TitleClassification>, ClassifierError>>) -> Self {
            Self {
                responses: Mutex::new(responses),
                requests: Mutex::new(Vec::new()),
            }
        }

        fn request_log(&self) -> Vec<Vec<String>> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ClassificationClient for ScriptedClient {
        async fn classify(
            &self,
            titles: &[String],
        ) -> Result<Vec<TitleClassification>, ClassifierError> {
            self.requests.lock().unwrap().push(titles.to_vec());
            let mut responses = self.responses.lock().unwrap();
            if responses.is_empty() {
                return Ok(Vec::new());
            }
            responses.remove(0)
        }
    }

    /// Client that answers every title on the first attempt, flagging titles
    /// containing a marker word as entities.
    struct EchoClient;

    #[async_trait]
    impl ClassificationClient for EchoClient {
        async fn classify(
            &self,
            titles: &[String],
        ) -> Result<Vec<TitleClassification>, ClassifierError> {
            Ok(titles
                .iter()
                .map(|t| TitleClassification {
                    title: t.clone(),
                    is_entity: t.contains("person"),
                })
                .collect())
        }
    }

    fn fast_settings() -> ClassifierSettings {
        ClassifierSettings {
            retry_pause_ms: 0,
            ..Default::default()
        }
    }

    fn flag(title: &str, is_entity: bool) -> TitleClassification {
        TitleClassification {
            title: title.to_string(),
            is_entity,
        }
    }

    #[tokio::test]
    async fn test_all_resolved_first_attempt() {
        let classifier = EntityClassifier::new(EchoClient, fast_settings());
        let titles = vec!["person one".to_string(), "Physics".to_string()];

        let result = classifier.classify_titles(&titles).await;

        assert_eq!(result.len(), 2);
        assert_eq!(result[0], flag("person one", true));
        assert_eq!(result[1], flag("Physics", false));
    }

    #[tokio::test]
    async fn test_retry_then_default_false() {
        // Attempt 1 answers only Obama; attempts 2 and 3 answer nothing.
        let client = ScriptedClient::new(vec![
            Ok(vec![flag("Obama", true)]),
            Ok(Vec::new()),
            Ok(Vec::new()),
        ]);

        let titles = vec!["Obama".to_string(), "Physics".to_string()];
        let result = classify_batch(&client, &titles, &fast_settings()).await;

        assert_eq!(result, vec![flag("Obama", true), flag("Physics", false)]);

        // Exactly 3 attempts; retries carry only the pending titles.
        let log = client.request_log();
        assert_eq!(log.len(), 3);
        assert_eq!(log[0], titles);
        assert_eq!(log[1], vec!["Physics".to_string()]);
        assert_eq!(log[2], vec!["Physics".to_string()]);
    }

    #[tokio::test]
    async fn test_error_treated_as_all_pending() {
        let client = ScriptedClient::new(vec![
            Err(ClassifierError::ApiError("boom".to_string())),
            Ok(vec![flag("Ada Lovelace", true)]),
        ]);

        let titles = vec!["Ada Lovelace".to_string()];
        let result = classify_batch(&client, &titles, &fast_settings()).await;

        assert_eq!(result, vec![flag("Ada Lovelace", true)]);
        assert_eq!(client.request_log().len(), 2);
    }

    #[tokio::test]
    async fn test_no_retry_once_resolved() {
        let client = ScriptedClient::new(vec![Ok(vec![flag("Physics", false)])]);

        let titles = vec!["Physics".to_string()];
        let result = classify_batch(&client, &titles, &fast_settings()).await;

        assert_eq!(result, vec![flag("Physics", false)]);
        assert_eq!(client.request_log().len(), 1);
    }

    #[tokio::test]
    async fn test_unrequested_titles_ignored() {
        // A confused model answering for a title we never asked about must
        // not leak into the results.
        let client = ScriptedClient::new(vec![
            Ok(vec![flag("Hallucinated", true), flag("Physics", false)]),
            Ok(Vec::new()),
            Ok(Vec::new()),
        ]);

        let titles = vec!["Physics".to_string()];
        let result = classify_batch(&client, &titles, &fast_settings()).await;

        assert_eq!(result, vec![flag("Physics", false)]);
    }

    #[tokio::test]
    async fn test_order_preserved_across_batches() {
        let settings = ClassifierSettings {
            batch_size: 2,
            concurrency: 4,
            retry_pause_ms: 0,
            ..Default::default()
        };
        let classifier = EntityClassifier::new(EchoClient, settings);

        let titles: Vec<String> = (0..7)
            .map(|i| {
                if i % 2 == 0 {
                    format!("person {}", i)
                } else {
                    format!("topic {}", i)
                }
            })
            .collect();

        let result = classifier.classify_titles(&titles).await;

        assert_eq!(result.len(), titles.len());
        for (input, output) in titles.iter().zip(result.iter()) {
            assert_eq!(&output.title, input);
            assert_eq!(output.is_entity, input.contains("person"));
        }
    }

    #[tokio::test]
    async fn test_empty_input() {
        let classifier = EntityClassifier::new(EchoClient, fast_settings());
        let result = classifier.classify_titles(&[]).await;
        assert!(result.is_empty());
    }
}
