//! OpenAI chat-completions adapter.
//!
//! Serves both the hosted OpenAI API (`openai`, bearer key required) and
//! self-hosted OpenAI-compatible servers such as LM Studio, vLLM, or
//! llama.cpp (`local`, bearer key optional).

use async_trait::async_trait;
use tracing::debug;

use unillm_core::config::find_spec;
use unillm_core::{ProviderConfig, ProviderKind, Result};

use super::chat::{extract_text, ChatCompletionRequest};
use super::http::{endpoint, execute};
use crate::traits::{GenerateRequest, LlmProvider};

/// Adapter for any `/chat/completions` endpoint.
pub struct OpenAiProvider {
    kind: ProviderKind,
    http: reqwest::Client,
    api_base: String,
    api_key: Option<String>,
    model: String,
    available: bool,
}

impl std::fmt::Debug for OpenAiProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiProvider")
            .field("kind", &self.kind)
            .field("api_base", &self.api_base)
            .field("model", &self.model)
            .finish()
    }
}

impl OpenAiProvider {
    pub fn new(config: &ProviderConfig, http: reqwest::Client) -> Self {
        // Resolve API base: config > registry default
        let api_base = config
            .base_url
            .clone()
            .or_else(|| find_spec(config.provider).default_base_url.map(String::from))
            .unwrap_or_default();

        Self {
            kind: config.provider,
            http,
            api_base,
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            available: config.is_available(),
        }
    }

    fn completions_url(&self) -> String {
        endpoint(&self.api_base, "chat/completions")
    }
}

#[async_trait]
impl LlmProvider for OpenAiProvider {
    async fn generate(&self, request: &GenerateRequest) -> Result<String> {
        debug!(
            provider = %self.kind,
            model = %self.model,
            image = request.prompt.image.is_some(),
            "Calling LLM"
        );

        let body = ChatCompletionRequest::new(&self.model, request);
        let mut builder = self.http.post(self.completions_url()).json(&body);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }

        let text = execute(self.kind, builder).await?;
        extract_text(self.kind, &text)
    }

    fn is_available(&self) -> bool {
        self.available
    }

    fn kind(&self) -> ProviderKind {
        self.kind
    }

    fn model(&self) -> &str {
        &self.model
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::multimodal::parse_prompt;
    use unillm_core::ErrorKind;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, Request, ResponseTemplate};

    fn request(prompt: &str) -> GenerateRequest {
        GenerateRequest {
            prompt: parse_prompt(prompt),
            temperature: 0.1,
            max_tokens: 4000,
        }
    }

    fn ok_body(content: &str) -> serde_json::Value {
        serde_json::json!({
            "id": "chatcmpl-test",
            "choices": [{ "message": { "role": "assistant", "content": content }, "finish_reason": "stop" }],
            "usage": { "prompt_tokens": 10, "completion_tokens": 5, "total_tokens": 15 }
        })
    }

    #[test]
    fn test_completions_url_trailing_slash() {
        let config = ProviderConfig::new(ProviderKind::OpenAi, "gpt-4o")
            .with_base_url("https://api.openai.com/v1/");
        let provider = OpenAiProvider::new(&config, reqwest::Client::new());
        assert_eq!(provider.completions_url(), "https://api.openai.com/v1/chat/completions");
    }

    #[test]
    fn test_local_defaults_to_lmstudio_port() {
        let config = ProviderConfig::new(ProviderKind::Local, "google/gemma-3n-e4b");
        let provider = OpenAiProvider::new(&config, reqwest::Client::new());
        assert_eq!(provider.completions_url(), "http://localhost:1234/v1/chat/completions");
        assert!(!provider.is_available());
    }

    #[tokio::test]
    async fn test_generate_success() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("Authorization", "Bearer test-key-123"))
            .and(body_partial_json(serde_json::json!({
                "model": "gpt-4o",
                "temperature": 0.1,
                "max_tokens": 4000,
                "messages": [{ "role": "user", "content": "Hello" }]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(ok_body("Hi there")))
            .expect(1)
            .mount(&server)
            .await;

        let config = ProviderConfig::new(ProviderKind::OpenAi, "gpt-4o")
            .with_api_key("test-key-123")
            .with_base_url(server.uri());
        let provider = OpenAiProvider::new(&config, reqwest::Client::new());

        assert!(provider.is_available());
        assert_eq!(provider.generate(&request("Hello")).await.unwrap(), "Hi there");
    }

    #[tokio::test]
    async fn test_generate_with_image_sends_parts() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(body_partial_json(serde_json::json!({
                "messages": [{
                    "role": "user",
                    "content": [
                        { "type": "text", "text": "Describe" },
                        { "type": "image_url", "image_url": { "url": "data:image/jpeg;base64,/9j/4AAQ" } }
                    ]
                }]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(ok_body("a cat")))
            .mount(&server)
            .await;

        let config = ProviderConfig::new(ProviderKind::OpenAi, "gpt-4o")
            .with_api_key("k")
            .with_base_url(server.uri());
        let provider = OpenAiProvider::new(&config, reqwest::Client::new());
        let out = provider
            .generate(&request("Describe\nBase64 Image Data: /9j/4AAQ"))
            .await
            .unwrap();
        assert_eq!(out, "a cat");
    }

    #[tokio::test]
    async fn test_api_error_maps_to_http() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(429).set_body_json(serde_json::json!({
                "error": { "message": "Rate limit exceeded", "type": "rate_limit_error" }
            })))
            .mount(&server)
            .await;

        let config = ProviderConfig::new(ProviderKind::OpenAi, "gpt-4o")
            .with_api_key("k")
            .with_base_url(server.uri());
        let provider = OpenAiProvider::new(&config, reqwest::Client::new());
        let err = provider.generate(&request("Hello")).await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Http);
        assert_eq!(err.status(), Some(429));
        assert_eq!(err.provider(), Some(ProviderKind::OpenAi));
        assert!(err.to_string().contains("Rate limit exceeded"));
    }

    #[tokio::test]
    async fn test_network_error_maps_to_unknown() {
        let config = ProviderConfig::new(ProviderKind::OpenAi, "gpt-4o")
            .with_api_key("k")
            .with_base_url("http://127.0.0.1:1");
        let provider = OpenAiProvider::new(&config, reqwest::Client::new());
        let err = provider.generate(&request("Hello")).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unknown);
        assert_eq!(err.provider(), Some(ProviderKind::OpenAi));
    }

    #[tokio::test]
    async fn test_local_without_key_sends_no_auth_header() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(|req: &Request| {
                if req.headers.contains_key("authorization") {
                    ResponseTemplate::new(400)
                } else {
                    ResponseTemplate::new(200).set_body_json(ok_body("local ok"))
                }
            })
            .mount(&server)
            .await;

        let config = ProviderConfig::new(ProviderKind::Local, "qwen2.5")
            .with_base_url(format!("{}/v1", server.uri()));
        let provider = OpenAiProvider::new(&config, reqwest::Client::new());

        assert!(provider.is_available());
        assert_eq!(provider.kind(), ProviderKind::Local);
        assert_eq!(provider.generate(&request("ping")).await.unwrap(), "local ok");
    }

    #[tokio::test]
    async fn test_garbage_body_is_unknown() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>ok</html>"))
            .mount(&server)
            .await;

        let config = ProviderConfig::new(ProviderKind::Local, "m").with_base_url(server.uri());
        let provider = OpenAiProvider::new(&config, reqwest::Client::new());
        let err = provider.generate(&request("ping")).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unknown);
    }
}
