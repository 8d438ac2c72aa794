//! LLM provider trait: the capability interface behind every adapter.
//!
//! Adding a backend means adding a [`ProviderKind`] variant and one type
//! implementing this trait; the dispatcher never branches on the backend.

use async_trait::async_trait;
use unillm_core::{ProviderKind, Result};

use crate::multimodal::ParsedPrompt;

/// A fully resolved request, handed from the dispatcher to one adapter.
#[derive(Clone, Debug, PartialEq)]
pub struct GenerateRequest {
    /// Prompt with any embedded image already split out.
    pub prompt: ParsedPrompt,
    /// Effective temperature (call override or config default).
    pub temperature: f64,
    /// Effective max output tokens (call override or config default).
    pub max_tokens: u32,
}

/// Trait that every provider adapter implements.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Perform one request/response exchange and return the generated text.
    ///
    /// Every failure is already normalized into an `LlmError` tagged with
    /// [`LlmProvider::kind`]. The caller bounds the call with a timeout.
    async fn generate(&self, request: &GenerateRequest) -> Result<String>;

    /// Whether all required settings are present. Never touches the network.
    fn is_available(&self) -> bool;

    /// The provider tag this adapter serves.
    fn kind(&self) -> ProviderKind;

    /// Model identifier sent to the backend.
    fn model(&self) -> &str;
}
