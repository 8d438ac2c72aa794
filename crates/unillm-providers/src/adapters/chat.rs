//! OpenAI chat-completions wire types, shared by the openai, local, and apigee adapters.

use serde::{Deserialize, Serialize};

use unillm_core::{LlmError, ProviderKind, Result};

use super::http::parse_body;
use crate::multimodal::ParsedPrompt;
use crate::traits::GenerateRequest;

// ─────────────────────────────────────────────
// Request
// ─────────────────────────────────────────────

/// Request body for `/chat/completions`.
#[derive(Debug, Serialize)]
pub(crate) struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f64,
    pub max_tokens: u32,
}

/// A single user message. The adapters only ever send one.
#[derive(Debug, Serialize)]
pub(crate) struct ChatMessage {
    pub role: &'static str,
    pub content: MessageContent,
}

/// Plain text or multipart (vision) content.
///
/// When serialized: text becomes a plain string, parts become an array of objects.
#[derive(Debug, Serialize, PartialEq)]
#[serde(untagged)]
pub(crate) enum MessageContent {
    Text(String),
    Parts(Vec<ContentPart>),
}

#[derive(Debug, Serialize, PartialEq)]
#[serde(tag = "type")]
pub(crate) enum ContentPart {
    #[serde(rename = "text")]
    Text { text: String },
    #[serde(rename = "image_url")]
    ImageUrl { image_url: ImageUrl },
}

#[derive(Debug, Serialize, PartialEq)]
pub(crate) struct ImageUrl {
    pub url: String,
}

impl MessageContent {
    pub fn from_prompt(prompt: &ParsedPrompt) -> Self {
        match &prompt.image {
            None => MessageContent::Text(prompt.text.clone()),
            Some(image) => {
                let mut parts = Vec::with_capacity(2);
                if prompt.has_text() {
                    parts.push(ContentPart::Text {
                        text: prompt.text.clone(),
                    });
                }
                parts.push(ContentPart::ImageUrl {
                    image_url: ImageUrl {
                        url: image.data_uri(),
                    },
                });
                MessageContent::Parts(parts)
            }
        }
    }
}

impl ChatCompletionRequest {
    pub fn new(model: &str, request: &GenerateRequest) -> Self {
        Self {
            model: model.to_string(),
            messages: vec![ChatMessage {
                role: "user",
                content: MessageContent::from_prompt(&request.prompt),
            }],
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        }
    }
}

// ─────────────────────────────────────────────
// Response
// ─────────────────────────────────────────────

/// Raw chat completion response. Only the generated text is read.
#[derive(Debug, Deserialize)]
pub(crate) struct ChatCompletionResponse {
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChatChoice {
    pub message: AssistantMessage,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AssistantMessage {
    #[serde(default)]
    pub content: Option<String>,
}

/// `choices[0].message.content`; a `null` content is an empty success.
pub(crate) fn extract_text(provider: ProviderKind, body: &str) -> Result<String> {
    let response: ChatCompletionResponse = parse_body(provider, body)?;
    response
        .choices
        .into_iter()
        .next()
        .map(|choice| choice.message.content.unwrap_or_default())
        .ok_or_else(|| LlmError::malformed(provider, "no choices in response"))
}
