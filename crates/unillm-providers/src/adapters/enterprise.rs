//! Enterprise gateway with a static token and a flat `prompt` body.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use unillm_core::{ProviderConfig, ProviderKind, Result};

use super::http::{execute, extract_gateway_text};
use crate::token::{StaticTokenManager, TokenManager};
use crate::traits::{GenerateRequest, LlmProvider};

const KIND: ProviderKind = ProviderKind::Enterprise;

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    temperature: f64,
    max_tokens: u32,
    /// Data URIs.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    images: Vec<String>,
}

/// Parse the extra-headers JSON object. Bad entries are logged and skipped.
fn parse_extra_headers(raw: Option<&str>) -> HeaderMap {
    let mut headers = HeaderMap::new();
    let Some(raw) = raw else {
        return headers;
    };

    let object = match serde_json::from_str::<serde_json::Map<String, Value>>(raw) {
        Ok(object) => object,
        Err(e) => {
            warn!(provider = %KIND, error = %e, "Ignoring ENTERPRISE_LLM_HEADERS: not a JSON object");
            return headers;
        }
    };

    for (key, value) in object {
        let Some(value) = value.as_str() else {
            warn!(provider = %KIND, header = %key, "Ignoring non-string header value");
            continue;
        };
        match (
            HeaderName::from_bytes(key.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            (Ok(name), Ok(val)) => {
                headers.insert(name, val);
            }
            _ => warn!(provider = %KIND, header = %key, "Invalid header"),
        }
    }
    headers
}

pub struct EnterpriseProvider {
    http: reqwest::Client,
    url: String,
    model: String,
    extra_headers: HeaderMap,
    tokens: Arc<dyn TokenManager>,
    available: bool,
}

impl std::fmt::Debug for EnterpriseProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EnterpriseProvider")
            .field("url", &self.url)
            .field("model", &self.model)
            .field("extra_headers", &self.extra_headers.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

impl EnterpriseProvider {
    pub fn new(config: &ProviderConfig, http: reqwest::Client) -> Self {
        let settings = config.static_token().cloned().unwrap_or_default();
        let tokens = Arc::new(StaticTokenManager::new(KIND, settings.token.clone()));

        Self {
            http,
            url: config.base_url.clone().unwrap_or_default(),
            model: config.model.clone(),
            extra_headers: parse_extra_headers(settings.extra_headers.as_deref()),
            tokens,
            available: config.is_available(),
        }
    }
}

#[async_trait]
impl LlmProvider for EnterpriseProvider {
    async fn generate(&self, request: &GenerateRequest) -> Result<String> {
        debug!(
            provider = %KIND,
            model = %self.model,
            extra_headers = self.extra_headers.len(),
            "Calling LLM"
        );

        let token = self.tokens.get_token().await?;
        let body = CompletionRequest {
            model: &self.model,
            prompt: &request.prompt.text,
            temperature: request.temperature,
            max_tokens: request.max_tokens,
            images: request.prompt.image.iter().map(|i| i.data_uri()).collect(),
        };

        let builder = self
            .http
            .post(&self.url)
            .bearer_auth(&token)
            .headers(self.extra_headers.clone())
            .json(&body);

        let text = execute(KIND, builder).await?;
        extract_gateway_text(KIND, &text)
    }

    fn is_available(&self) -> bool {
        self.available
    }

    fn kind(&self) -> ProviderKind {
        KIND
    }

    fn model(&self) -> &str {
        &self.model
    }
}
