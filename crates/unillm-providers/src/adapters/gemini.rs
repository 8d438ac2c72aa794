//! Google Gemini `generateContent` adapter. The API key travels as a `key` query parameter.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use unillm_core::{LlmError, ProviderConfig, ProviderKind, Result};

use super::http::{endpoint, execute, parse_body};
use crate::traits::{GenerateRequest, LlmProvider};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content {
    role: &'static str,
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Part {
    Text { text: String },
    InlineData { inline_data: InlineData },
}

#[derive(Debug, Serialize)]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f64,
    max_output_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: Option<String>,
}

fn parts(request: &GenerateRequest) -> Vec<Part> {
    let prompt = &request.prompt;
    let mut parts = Vec::with_capacity(2);
    if prompt.has_text() || prompt.image.is_none() {
        parts.push(Part::Text {
            text: prompt.text.clone(),
        });
    }
    if let Some(image) = &prompt.image {
        parts.push(Part::InlineData {
            inline_data: InlineData {
                mime_type: image.media_type.clone(),
                data: image.data.clone(),
            },
        });
    }
    parts
}

pub struct GeminiProvider {
    http: reqwest::Client,
    api_base: String,
    api_key: String,
    model: String,
    available: bool,
}

impl std::fmt::Debug for GeminiProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiProvider")
            .field("api_base", &self.api_base)
            .field("model", &self.model)
            .finish()
    }
}

impl GeminiProvider {
    pub fn new(config: &ProviderConfig, http: reqwest::Client) -> Self {
        Self {
            http,
            api_base: config.base_url.clone().unwrap_or_default(),
            api_key: config.api_key.clone().unwrap_or_default(),
            model: config.model.clone(),
            available: config.is_available(),
        }
    }

    fn generate_url(&self) -> String {
        endpoint(
            &self.api_base,
            &format!("models/{}:generateContent", self.model),
        )
    }
}

#[async_trait]
impl LlmProvider for GeminiProvider {
    async fn generate(&self, request: &GenerateRequest) -> Result<String> {
        debug!(
            provider = %ProviderKind::Gemini,
            model = %self.model,
            image = request.prompt.image.is_some(),
            "Calling LLM"
        );

        let body = GenerateContentRequest {
            contents: vec![Content {
                role: "user",
                parts: parts(request),
            }],
            generation_config: GenerationConfig {
                temperature: request.temperature,
                max_output_tokens: request.max_tokens,
            },
        };

        let builder = self
            .http
            .post(self.generate_url())
            .query(&[("key", self.api_key.as_str())])
            .json(&body);

        let text = execute(ProviderKind::Gemini, builder).await?;
        let response: GenerateContentResponse = parse_body(ProviderKind::Gemini, &text)?;

        let candidate = response
            .candidates
            .into_iter()
            .next()
            .ok_or_else(|| LlmError::malformed(ProviderKind::Gemini, "no candidates in response"))?;

        let content = candidate
            .content
            .ok_or_else(|| LlmError::malformed(ProviderKind::Gemini, "candidate has no content"))?;
        Ok(content.parts.into_iter().filter_map(|p| p.text).collect())
    }

    fn is_available(&self) -> bool {
        self.available
    }

    fn kind(&self) -> ProviderKind {
        ProviderKind::Gemini
    }

    fn model(&self) -> &str {
        &self.model
    }
}
