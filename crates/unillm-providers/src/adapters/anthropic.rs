//! Anthropic messages API adapter (`x-api-key` auth).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use unillm_core::{ProviderConfig, ProviderKind, Result};

use super::http::{endpoint, execute, parse_body};
use crate::traits::{GenerateRequest, LlmProvider};

const ANTHROPIC_VERSION: &str = "2023-06-01";

// ─────────────────────────────────────────────
// Wire types
// ─────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f64,
    messages: Vec<Message>,
}

#[derive(Debug, Serialize)]
struct Message {
    role: &'static str,
    content: Vec<ContentBlock>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum ContentBlock {
    Text { text: String },
    Image { source: ImageSource },
}

#[derive(Debug, Serialize)]
struct ImageSource {
    #[serde(rename = "type")]
    kind: &'static str,
    media_type: String,
    data: String,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    content: Vec<ResponseBlock>,
}

#[derive(Debug, Deserialize)]
struct ResponseBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

/// Image block (if any) first, then the text instruction.
fn content_blocks(request: &GenerateRequest) -> Vec<ContentBlock> {
    let mut blocks = Vec::with_capacity(2);
    if let Some(image) = &request.prompt.image {
        blocks.push(ContentBlock::Image {
            source: ImageSource {
                kind: "base64",
                media_type: image.media_type.clone(),
                data: image.data.clone(),
            },
        });
    }
    if request.prompt.has_text() || blocks.is_empty() {
        blocks.push(ContentBlock::Text {
            text: request.prompt.text.clone(),
        });
    }
    blocks
}

// ─────────────────────────────────────────────
// AnthropicProvider
// ─────────────────────────────────────────────

pub struct AnthropicProvider {
    http: reqwest::Client,
    api_base: String,
    api_key: String,
    model: String,
    available: bool,
}

impl std::fmt::Debug for AnthropicProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnthropicProvider")
            .field("api_base", &self.api_base)
            .field("model", &self.model)
            .finish()
    }
}

impl AnthropicProvider {
    pub fn new(config: &ProviderConfig, http: reqwest::Client) -> Self {
        Self {
            http,
            api_base: config.base_url.clone().unwrap_or_default(),
            api_key: config.api_key.clone().unwrap_or_default(),
            model: config.model.clone(),
            available: config.is_available(),
        }
    }
}

#[async_trait]
impl LlmProvider for AnthropicProvider {
    async fn generate(&self, request: &GenerateRequest) -> Result<String> {
        debug!(
            provider = %ProviderKind::Anthropic,
            model = %self.model,
            image = request.prompt.image.is_some(),
            "Calling LLM"
        );

        let body = MessagesRequest {
            model: &self.model,
            max_tokens: request.max_tokens,
            temperature: request.temperature,
            messages: vec![Message {
                role: "user",
                content: content_blocks(request),
            }],
        };

        let builder = self
            .http
            .post(endpoint(&self.api_base, "messages"))
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&body);

        let text = execute(ProviderKind::Anthropic, builder).await?;
        let response: MessagesResponse = parse_body(ProviderKind::Anthropic, &text)?;

        Ok(response
            .content
            .into_iter()
            .filter(|block| block.kind == "text")
            .filter_map(|block| block.text)
            .collect())
    }

    fn is_available(&self) -> bool {
        self.available
    }

    fn kind(&self) -> ProviderKind {
        ProviderKind::Anthropic
    }

    fn model(&self) -> &str {
        &self.model
    }
}
