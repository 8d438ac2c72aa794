//! Core types for unillm: provider tags, call options, and defaults.
//!
//! A provider tag is a closed enum rather than a free-form string, so an
//! unknown backend is rejected when the tag is parsed instead of deep inside
//! a dispatch branch.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::LlmError;

/// Default sampling temperature.
pub const DEFAULT_TEMPERATURE: f64 = 0.1;

/// Default maximum number of output tokens.
pub const DEFAULT_MAX_TOKENS: u32 = 4000;

/// Default bound on a single `generate` call (600 000 ms).
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(600);

// ─────────────────────────────────────────────
// Provider tags
// ─────────────────────────────────────────────

/// One supported text-generation backend.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// OpenAI chat completions, static bearer key.
    OpenAi,
    /// Anthropic messages API, `x-api-key` header.
    Anthropic,
    /// Google Gemini `generateContent`, `?key=` query parameter.
    Gemini,
    /// Enterprise gateway behind Apigee OAuth client credentials.
    Apigee,
    /// Enterprise gateway with a static, environment-provided token.
    Enterprise,
    /// Self-hosted OpenAI-compatible server (LM Studio, vLLM, llama.cpp).
    Local,
    /// Ollama native chat API.
    Ollama,
}

impl ProviderKind {
    /// All tags, in factory probe order.
    pub const ALL: [ProviderKind; 7] = [
        ProviderKind::OpenAi,
        ProviderKind::Anthropic,
        ProviderKind::Gemini,
        ProviderKind::Apigee,
        ProviderKind::Enterprise,
        ProviderKind::Local,
        ProviderKind::Ollama,
    ];

    /// The lowercase tag used in settings and logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::OpenAi => "openai",
            ProviderKind::Anthropic => "anthropic",
            ProviderKind::Gemini => "gemini",
            ProviderKind::Apigee => "apigee",
            ProviderKind::Enterprise => "enterprise",
            ProviderKind::Local => "local",
            ProviderKind::Ollama => "ollama",
        }
    }

    /// Which family of backend this tag belongs to.
    pub fn class(&self) -> ProviderClass {
        match self {
            ProviderKind::OpenAi | ProviderKind::Anthropic | ProviderKind::Gemini => {
                ProviderClass::Hosted
            }
            ProviderKind::Apigee | ProviderKind::Enterprise => ProviderClass::Managed,
            ProviderKind::Local | ProviderKind::Ollama => ProviderClass::SelfHosted,
        }
    }

    /// Whether calls need a token obtained from a token manager.
    pub fn requires_managed_auth(&self) -> bool {
        self.class() == ProviderClass::Managed
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderKind {
    type Err = LlmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tag = s.trim().to_lowercase();
        ProviderKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == tag)
            .ok_or_else(|| LlmError::Configuration {
                provider: None,
                message: format!(
                    "unknown provider '{}' (expected one of: openai, anthropic, gemini, apigee, enterprise, local, ollama)",
                    s.trim()
                ),
            })
    }
}

/// Provider families, in the order the factory prefers them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderClass {
    /// Public API providers authenticated with a static key.
    Hosted,
    /// Enterprise gateways requiring managed bearer tokens.
    Managed,
    /// Servers run by the user (no or optional auth).
    SelfHosted,
}

// ─────────────────────────────────────────────
// Call options
// ─────────────────────────────────────────────

/// Per-call overrides. Anything left `None` falls back to the client's config.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CallOptions {
    pub temperature: Option<f64>,
    pub max_tokens: Option<u32>,
    pub timeout: Option<Duration>,
}

impl CallOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
