//! Embedding client trait and OpenAI-compatible implementation.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::debug;

use wikigraph_types::Embedding;

use crate::error::EmbeddingError;

/// One embedding request over a sub-batch of texts.
///
/// Contract: on success the result has exactly one vector per input text,
/// in input order. On `Err` the caller degrades the whole sub-batch.
#[async_trait]
pub trait EmbeddingClient: Send + Sync {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Embedding>, EmbeddingError>;
}

/// Configuration for the API-backed embedding client.
#[derive(Debug, Clone)]
pub struct EmbeddingClientConfig {
    /// API base URL (e.g., "https://api.openai.com/v1")
    pub base_url: String,

    /// Embedding model (e.g., "text-embedding-3-small")
    pub model: String,

    /// API key
    pub api_key: SecretString,

    /// Request timeout
    pub timeout: Duration,
}

impl EmbeddingClientConfig {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            model: model.into(),
            api_key: SecretString::from(api_key.into()),
            timeout: Duration::from_secs(60),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Embedding client backed by an OpenAI-compatible embeddings endpoint.
pub struct ApiEmbeddingClient {
    client: Client,
    config: EmbeddingClientConfig,
}

impl ApiEmbeddingClient {
    pub fn new(config: EmbeddingClientConfig) -> Result<Self, EmbeddingError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| EmbeddingError::ConfigError(e.to_string()))?;

        Ok(Self { client, config })
    }
}

#[async_trait]
impl EmbeddingClient for ApiEmbeddingClient {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Embedding>, EmbeddingError> {
        #[derive(Serialize)]
        struct EmbeddingRequest<'a> {
            model: &'a str,
            input: &'a [String],
        }

        #[derive(Deserialize)]
        struct EmbeddingResponse {
            data: Vec<EmbeddingData>,
        }

        #[derive(Deserialize)]
        struct EmbeddingData {
            index: usize,
            embedding: Vec<f32>,
        }

        debug!(count = texts.len(), "Sending embedding request");

        let request = EmbeddingRequest {
            model: &self.config.model,
            input: texts,
        };

        let url = format!("{}/embeddings", self.config.base_url);

        let response = self
            .client
            .post(&url)
            .header(
                "Authorization",
                format!("Bearer {}", self.config.api_key.expose_secret()),
            )
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| EmbeddingError::ApiError(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(EmbeddingError::ApiError(format!(
                "HTTP {}: {}",
                status, body
            )));
        }

        let response_body: EmbeddingResponse = response
            .json()
            .await
            .map_err(|e| EmbeddingError::ParseError(e.to_string()))?;

        if response_body.data.len() != texts.len() {
            return Err(EmbeddingError::ParseError(format!(
                "Expected {} embeddings, got {}",
                texts.len(),
                response_body.data.len()
            )));
        }

        // The response carries an index per vector; place vectors by index so
        // the positional contract holds even if the service reorders them.
        let mut embeddings = vec![Vec::new(); texts.len()];
        for data in response_body.data {
            if data.index >= embeddings.len() {
                return Err(EmbeddingError::ParseError(format!(
                    "Embedding index {} out of range",
                    data.index
                )));
            }
            embeddings[data.index] = data.embedding;
        }

        Ok(embeddings)
    }
}
