//! Classification client trait and OpenAI-compatible implementation.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::debug;

use wikigraph_types::TitleClassification;

use crate::error::ClassifierError;

/// Instruction sent with every classification batch. The few-shot block
/// keeps the model on the exact output schema.
const SYSTEM_PROMPT: &str = "You are given a list of topic titles. For each topic, determine whether it refers to a person or an organization. If it does, set \"is_entity\" to true; otherwise, set \"is_entity\" to false. Return your answer as a valid JSON array, where each element has the format:\n\n{\n\"title\": \"<TOPIC_TITLE>\",\n\"is_entity\": <true_or_false>\n}\n\nDo not return any additional keys, text, or commentary. Include ALL the titles I provide in your response. Here are some examples:\n\nInput:\n\nHarvey Milk, 1999 Israeli general election, Book of Genesis, Janis Joplin, Orthotropic deck, Music & Media\n\nExpected output: ```json\n[ { \"title\": \"Harvey Milk\", \"is_entity\": true }, { \"title\": \"1999 Israeli general election\", \"is_entity\": false }, { \"title\": \"Book of Genesis\", \"is_entity\": false }, { \"title\": \"Janis Joplin\", \"is_entity\": true }, { \"title\": \"Orthotropic deck\", \"is_entity\": false }, { \"title\": \"Music & Media\", \"is_entity\": false } ]\n```";

/// One classification attempt over a set of titles.
///
/// Implementations return whatever flags the service produced; the caller
/// treats titles missing from the result as still pending. An `Err` means
/// the whole attempt failed and every requested title stays pending.
#[async_trait]
pub trait ClassificationClient: Send + Sync {
    async fn classify(
        &self,
        titles: &[String],
    ) -> Result<Vec<TitleClassification>, ClassifierError>;
}

/// Configuration for the API-backed classification client.
#[derive(Debug, Clone)]
pub struct ApiClientConfig {
    /// API base URL (e.g., "https://api.openai.com/v1")
    pub base_url: String,

    /// Model to use (e.g., "gpt-4o-mini")
    pub model: String,

    /// API key
    pub api_key: SecretString,

    /// Request timeout
    pub timeout: Duration,
}

impl ApiClientConfig {
    /// Create config for an OpenAI-compatible endpoint.
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

/// Classification client backed by an OpenAI-compatible chat-completions API.
pub struct ApiClassificationClient {
    client: Client,
    config: ApiClientConfig,
}

impl ApiClassificationClient {
    /// Create a new API client. The bounded timeout means a hung call
    /// surfaces as a failed attempt rather than stalling the pipeline.
    pub fn new(config: ApiClientConfig) -> Result<Self, ClassifierError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ClassifierError::ConfigError(e.to_string()))?;

        Ok(Self { client, config })
    }

    async fn make_request(&self, titles_text: &str) -> Result<String, ClassifierError> {
        #[derive(Serialize)]
        struct ChatRequest {
            model: String,
            messages: Vec<ChatMessage>,
            temperature: f32,
        }

        #[derive(Serialize)]
        struct ChatMessage {
            role: String,
            content: String,
        }

        #[derive(Deserialize)]
        struct ChatResponse {
            choices: Vec<ChatChoice>,
        }

        #[derive(Deserialize)]
        struct ChatChoice {
            message: ChatMessageResponse,
        }

        #[derive(Deserialize)]
        struct ChatMessageResponse {
            content: String,
        }

        let request = ChatRequest {
            model: self.config.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: titles_text.to_string(),
                },
            ],
            temperature: 0.0,
        };

        let url = format!("{}/chat/completions", self.config.base_url);

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
            .map_err(|e| ClassifierError::ApiError(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ClassifierError::ApiError(format!(
                "HTTP {}: {}",
                status, body
            )));
        }

        let response_body: ChatResponse = response
            .json()
            .await
            .map_err(|e| ClassifierError::ParseError(e.to_string()))?;

        response_body
            .choices
            .first()
            .map(|c| c.message.content.clone())
            .ok_or_else(|| ClassifierError::ParseError("No choices in response".to_string()))
    }
}

#[async_trait]
impl ClassificationClient for ApiClassificationClient {
    async fn classify(
        &self,
        titles: &[String],
    ) -> Result<Vec<TitleClassification>, ClassifierError> {
        let titles_text = titles.join(", ");
        debug!(count = titles.len(), "Sending classification request");

        let response = self.make_request(&titles_text).await?;
        parse_classification_response(&response)
    }
}

/// Parse a classification response body into flags.
///
/// The model is asked for a bare JSON array but will sometimes wrap it in
/// markdown code fences; those are stripped before parsing.
pub fn parse_classification_response(
    response: &str,
) -> Result<Vec<TitleClassification>, ClassifierError> {
    let json_str = extract_json_array(response);

    serde_json::from_str(&json_str).map_err(|e| {
        ClassifierError::ParseError(format!("Failed to parse classification JSON: {}", e))
    })
}

/// Extract a JSON array from text (handles markdown code blocks).
fn extract_json_array(text: &str) -> String {
    if let Some(start) = text.find("```json") {
        if let Some(end) = text[start + 7..].find("```") {
            return text[start + 7..start + 7 + end].trim().to_string();
        }
    }

    if let Some(start) = text.find("```") {
        if let Some(end) = text[start + 3..].find("```") {
            return text[start + 3..start + 3 + end].trim().to_string();
        }
    }

    // Find first [ and last ]
    if let (Some(start), Some(end)) = (text.find('['), text.rfind(']')) {
        if start < end {
            return text[start..=end].to_string();
        }
    }

    text.trim().to_string()
}
