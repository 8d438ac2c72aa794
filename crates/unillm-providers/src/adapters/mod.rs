//! Provider adapters: one per backend wire format.

pub mod anthropic;
pub mod apigee;
pub(crate) mod chat;
pub mod enterprise;
pub mod gemini;
pub(crate) mod http;
pub mod ollama;
pub mod openai;

pub use anthropic::AnthropicProvider;
pub use apigee::ApigeeProvider;
pub use enterprise::EnterpriseProvider;
pub use gemini::GeminiProvider;
pub use ollama::OllamaProvider;
pub use openai::OpenAiProvider;

use unillm_core::{ProviderConfig, ProviderKind};

use crate::traits::LlmProvider;

/// Build the adapter bound to `config.provider`, sharing `http` for connection pooling.
pub fn build_adapter(config: &ProviderConfig, http: reqwest::Client) -> Box<dyn LlmProvider> {
    match config.provider {
        ProviderKind::OpenAi | ProviderKind::Local => Box::new(OpenAiProvider::new(config, http)),
        ProviderKind::Anthropic => Box::new(AnthropicProvider::new(config, http)),
        ProviderKind::Gemini => Box::new(GeminiProvider::new(config, http)),
        ProviderKind::Apigee => Box::new(ApigeeProvider::new(config, http)),
        ProviderKind::Enterprise => Box::new(EnterpriseProvider::new(config, http)),
        ProviderKind::Ollama => Box::new(OllamaProvider::new(config, http)),
    }
}
