//! Ollama native `/api/chat` adapter (non-streaming).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use unillm_core::config::find_spec;
use unillm_core::{ProviderConfig, ProviderKind, Result};

use super::http::{endpoint, execute, parse_body};
use crate::traits::{GenerateRequest, LlmProvider};

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    options: Options,
    stream: bool,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
    /// Raw base64 payloads, no data-URI prefix.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    images: Vec<String>,
}

#[derive(Debug, Serialize)]
struct Options {
    temperature: f64,
    num_predict: u32,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: String,
}

pub struct OllamaProvider {
    http: reqwest::Client,
    host: String,
    model: String,
    available: bool,
}

impl std::fmt::Debug for OllamaProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OllamaProvider")
            .field("host", &self.host)
            .field("model", &self.model)
            .finish()
    }
}

impl OllamaProvider {
    pub fn new(config: &ProviderConfig, http: reqwest::Client) -> Self {
        let host = config
            .base_url
            .clone()
            .or_else(|| find_spec(ProviderKind::Ollama).default_base_url.map(String::from))
            .unwrap_or_default();

        Self {
            http,
            host,
            model: config.model.clone(),
            available: config.is_available(),
        }
    }
}

#[async_trait]
impl LlmProvider for OllamaProvider {
    async fn generate(&self, request: &GenerateRequest) -> Result<String> {
        debug!(
            provider = %ProviderKind::Ollama,
            model = %self.model,
            host = %self.host,
            "Calling LLM"
        );

        let body = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: request.prompt.text.clone(),
                images: request
                    .prompt
                    .image
                    .iter()
                    .map(|image| image.data.clone())
                    .collect(),
            }],
            options: Options {
                temperature: request.temperature,
                num_predict: request.max_tokens,
            },
            stream: false,
        };

        let builder = self.http.post(endpoint(&self.host, "api/chat")).json(&body);
        let text = execute(ProviderKind::Ollama, builder).await?;
        let response: ChatResponse = parse_body(ProviderKind::Ollama, &text)?;
        Ok(response.message.content)
    }

    fn is_available(&self) -> bool {
        self.available
    }

    fn kind(&self) -> ProviderKind {
        ProviderKind::Ollama
    }

    fn model(&self) -> &str {
        &self.model
    }
}
