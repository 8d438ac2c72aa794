//! Provider configuration schema.
//!
//! A [`ProviderConfig`] is resolved once per client from [`Settings`](super::Settings)
//! and is immutable afterwards; per-call overrides travel in
//! [`CallOptions`](crate::types::CallOptions).

use std::fmt;
use std::time::Duration;

use crate::types::{ProviderKind, DEFAULT_MAX_TOKENS, DEFAULT_TEMPERATURE, DEFAULT_TIMEOUT};

/// Fully resolved configuration for one provider.
#[derive(Clone, PartialEq)]
pub struct ProviderConfig {
    /// The provider this config is bound to.
    pub provider: ProviderKind,
    /// Model identifier sent to the backend.
    pub model: String,
    /// Static credential (hosted API key, optional bearer for local servers).
    pub api_key: Option<String>,
    /// Base endpoint. `None` means "use the adapter default" for self-hosted providers.
    pub base_url: Option<String>,
    /// Default sampling temperature.
    pub temperature: f64,
    /// Default maximum output tokens.
    pub max_tokens: u32,
    /// Default bound on a whole `generate` call.
    pub timeout: Duration,
    /// Managed-auth settings, present only for the enterprise gateways.
    pub managed: Option<ManagedAuth>,
}

impl ProviderConfig {
    /// A config with the shared defaults and nothing else set.
    pub fn new(provider: ProviderKind, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
            api_key: None,
            base_url: None,
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
            timeout: DEFAULT_TIMEOUT,
            managed: None,
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_managed(mut self, managed: ManagedAuth) -> Self {
        self.managed = Some(managed);
        self
    }

    /// OAuth settings, if this config carries them.
    pub fn oauth(&self) -> Option<&OAuthSettings> {
        match &self.managed {
            Some(ManagedAuth::OAuth(s)) => Some(s),
            _ => None,
        }
    }

    /// Static-token settings, if this config carries them.
    pub fn static_token(&self) -> Option<&StaticTokenSettings> {
        match &self.managed {
            Some(ManagedAuth::StaticToken(s)) => Some(s),
            _ => None,
        }
    }

    /// Whether every setting this provider needs is present. Never touches the network.
    pub fn is_available(&self) -> bool {
        super::registry::missing_settings(self).is_empty()
    }
}

impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("provider", &self.provider)
            .field("model", &self.model)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("timeout", &self.timeout)
            .field("managed", &self.managed)
            .finish()
    }
}

/// Credentials for providers that fetch a bearer token instead of using a static key.
#[derive(Clone, Debug, PartialEq)]
pub enum ManagedAuth {
    OAuth(OAuthSettings),
    StaticToken(StaticTokenSettings),
}

/// Client-credentials login plus the gateway routing identifiers sent on each call.
#[derive(Clone, Default, PartialEq)]
pub struct OAuthSettings {
    pub login_url: Option<String>,
    pub consumer_key: Option<String>,
    pub consumer_secret: Option<String>,
    pub use_case_id: Option<String>,
    pub client_id: Option<String>,
    pub gateway_api_key: Option<String>,
}

impl fmt::Debug for OAuthSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let redact = |v: &Option<String>| v.as_ref().map(|_| "<redacted>");
        f.debug_struct("OAuthSettings")
            .field("login_url", &self.login_url)
            .field("consumer_key", &self.consumer_key)
            .field("consumer_secret", &redact(&self.consumer_secret))
            .field("use_case_id", &self.use_case_id)
            .field("client_id", &self.client_id)
            .field("gateway_api_key", &redact(&self.gateway_api_key))
            .finish()
    }
}

/// A static gateway token and optional extra request headers.
#[derive(Clone, Default, PartialEq)]
pub struct StaticTokenSettings {
    pub token: Option<String>,
    /// Raw JSON object text, parsed by the adapter.
    pub extra_headers: Option<String>,
}

impl fmt::Debug for StaticTokenSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StaticTokenSettings")
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("extra_headers", &self.extra_headers)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = ProviderConfig::new(ProviderKind::OpenAi, "gpt-4o");
        assert_eq!(cfg.temperature, 0.1);
        assert_eq!(cfg.max_tokens, 4000);
        assert_eq!(cfg.timeout, Duration::from_millis(600_000));
        assert!(cfg.managed.is_none());
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let cfg = ProviderConfig::new(ProviderKind::Apigee, "gpt-4")
            .with_api_key("sk-very-secret")
            .with_managed(ManagedAuth::OAuth(OAuthSettings {
                consumer_secret: Some("hunter2".into()),
                gateway_api_key: Some("wf-key".into()),
                ..Default::default()
            }));
        let rendered = format!("{cfg:?}");
        assert!(!rendered.contains("sk-very-secret"));
        assert!(!rendered.contains("hunter2"));
        assert!(!rendered.contains("wf-key"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn test_managed_accessors() {
        let cfg = ProviderConfig::new(ProviderKind::Enterprise, "m").with_managed(
            ManagedAuth::StaticToken(StaticTokenSettings {
                token: Some("t".into()),
                extra_headers: None,
            }),
        );
        assert!(cfg.static_token().is_some());
        assert!(cfg.oauth().is_none());
    }
}
