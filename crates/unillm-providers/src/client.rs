//! The unified dispatcher.
//!
//! An [`LlmClient`] is bound to one resolved [`ProviderConfig`] and owns the
//! adapter for it. `generate` resolves per-call options against the config,
//! splits out any embedded image, and bounds the whole adapter call
//! (token exchange included) with a timeout.

use std::time::Instant;

use serde::Serialize;
use tracing::{debug, warn};

use unillm_core::config::missing_settings;
use unillm_core::{CallOptions, LlmError, ProviderClass, ProviderConfig, ProviderKind, Result};

use crate::adapters::build_adapter;
use crate::multimodal::parse_prompt;
use crate::traits::{GenerateRequest, LlmProvider};

/// Snapshot of a client's binding, for status output.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ClientInfo {
    pub provider: ProviderKind,
    pub model: String,
    pub available: bool,
    pub timeout_ms: u128,
}

pub struct LlmClient {
    config: ProviderConfig,
    provider: Box<dyn LlmProvider>,
}

impl std::fmt::Debug for LlmClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl LlmClient {
    /// Build a client with its own pooled HTTP client.
    pub fn new(config: ProviderConfig) -> Result<Self> {
        let http = reqwest::Client::builder().build().map_err(|e| {
            LlmError::config(config.provider, format!("failed to build HTTP client: {e}"))
        })?;
        Ok(Self::with_http(config, http))
    }

    /// Build a client that shares an existing HTTP client.
    pub fn with_http(config: ProviderConfig, http: reqwest::Client) -> Self {
        let provider = build_adapter(&config, http);
        Self { config, provider }
    }

    /// Build a client around a custom adapter. The adapter must serve the config's provider.
    pub fn with_provider(config: ProviderConfig, provider: Box<dyn LlmProvider>) -> Result<Self> {
        if provider.kind() != config.provider {
            return Err(LlmError::config(
                config.provider,
                format!(
                    "adapter serves {} but the configuration is for {}",
                    provider.kind(),
                    config.provider
                ),
            ));
        }
        Ok(Self { config, provider })
    }

    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    pub fn provider(&self) -> ProviderKind {
        self.config.provider
    }

    pub fn model(&self) -> &str {
        self.provider.model()
    }

    pub fn is_available(&self) -> bool {
        self.provider.is_available()
    }

    pub fn info(&self) -> ClientInfo {
        ClientInfo {
            provider: self.config.provider,
            model: self.provider.model().to_string(),
            available: self.is_available(),
            timeout_ms: self.config.timeout.as_millis(),
        }
    }

    /// Send one prompt and return the generated text.
    ///
    /// Self-hosted providers are attempted even without an explicit endpoint,
    /// using their default one. Every other provider fails with a
    /// configuration error naming whatever required settings are missing.
    pub async fn generate(&self, prompt: &str, options: &CallOptions) -> Result<String> {
        let kind = self.config.provider;

        if kind.class() != ProviderClass::SelfHosted {
            let missing = missing_settings(&self.config);
            if !missing.is_empty() {
                return Err(LlmError::config(
                    kind,
                    format!("{kind} is not configured, missing: {}", missing.join(", ")),
                ));
            }
        }

        let request = GenerateRequest {
            prompt: parse_prompt(prompt),
            temperature: options.temperature.unwrap_or(self.config.temperature),
            max_tokens: options.max_tokens.unwrap_or(self.config.max_tokens),
        };
        let timeout = options.timeout.unwrap_or(self.config.timeout);

        let started = Instant::now();
        match tokio::time::timeout(timeout, self.provider.generate(&request)).await {
            Ok(Ok(text)) => {
                debug!(
                    provider = %kind,
                    elapsed_ms = elapsed_ms(started),
                    chars = text.chars().count(),
                    "LLM response received"
                );
                Ok(text)
            }
            Ok(Err(e)) => {
                debug!(provider = %kind, error = %e, "LLM call failed");
                Err(e)
            }
            Err(_) => {
                warn!(provider = %kind, timeout_ms = timeout.as_millis() as u64, "LLM call timed out");
                Err(LlmError::Timeout {
                    provider: kind,
                    timeout,
                })
            }
        }
    }
}

fn elapsed_ms(started: Instant) -> u64 {
    u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
