//! Provider registry: static specs for the seven supported backends.
//!
//! Each `ProviderSpec` names the settings a provider reads and the defaults it
//! falls back to. [`resolve_config`] turns a spec plus a [`Settings`] snapshot
//! into a [`ProviderConfig`]; [`missing_settings`] is the single source of
//! truth for `is_available()`.

use std::time::Duration;

use tracing::warn;

use super::loader::Settings;
use super::schema::{ManagedAuth, OAuthSettings, ProviderConfig, StaticTokenSettings};
use crate::types::{
    ProviderClass, ProviderKind, DEFAULT_MAX_TOKENS, DEFAULT_TEMPERATURE, DEFAULT_TIMEOUT,
};

// ─────────────────────────────────────────────
// ProviderSpec: static metadata for one provider
// ─────────────────────────────────────────────

/// Static specification describing one provider.
#[derive(Clone, Debug)]
pub struct ProviderSpec {
    /// Provider tag.
    pub kind: ProviderKind,
    /// Human-readable name for logs and status output.
    pub display_name: &'static str,
    /// Prefix for `<PREFIX>_TEMPERATURE`, `<PREFIX>_MAX_TOKENS`, `<PREFIX>_TIMEOUT`.
    pub env_prefix: &'static str,
    /// Settings holding the static credential, first match wins.
    pub api_key_keys: &'static [&'static str],
    /// Settings holding the base endpoint, first match wins.
    pub base_url_keys: &'static [&'static str],
    /// Endpoint used when no base URL setting is present.
    pub default_base_url: Option<&'static str>,
    /// Settings holding the model id, first match wins.
    pub model_keys: &'static [&'static str],
    /// Model used when no model setting is present.
    pub default_model: &'static str,
}

/// Forces a provider tag instead of probing.
pub const PROVIDER_OVERRIDE: &str = "LLM_PROVIDER";

/// Local servers accept this placeholder to mean "no key".
const NO_KEY_PLACEHOLDER: &str = "not-needed";

pub const APIGEE_LOGIN_URL: &str = "APIGEE_NONPROD_LOGIN_URL";
pub const APIGEE_CONSUMER_KEY: &str = "APIGEE_CONSUMER_KEY";
pub const APIGEE_CONSUMER_SECRET: &str = "APIGEE_CONSUMER_SECRET";
pub const WF_USE_CASE_ID: &str = "WF_USE_CASE_ID";
pub const WF_CLIENT_ID: &str = "WF_CLIENT_ID";
pub const WF_API_KEY: &str = "WF_API_KEY";
pub const ENTERPRISE_TOKEN: &str = "ENTERPRISE_LLM_TOKEN";
pub const ENTERPRISE_HEADERS: &str = "ENTERPRISE_LLM_HEADERS";

/// Complete list of supported providers, in factory probe order.
pub static PROVIDERS: &[ProviderSpec] = &[
    // Hosted APIs
    ProviderSpec {
        kind: ProviderKind::OpenAi,
        display_name: "OpenAI",
        env_prefix: "OPENAI",
        api_key_keys: &["OPENAI_API_KEY"],
        base_url_keys: &["OPENAI_BASE_URL"],
        default_base_url: Some("https://api.openai.com/v1"),
        model_keys: &["OPENAI_MODEL"],
        default_model: "gpt-4o",
    },
    ProviderSpec {
        kind: ProviderKind::Anthropic,
        display_name: "Anthropic",
        env_prefix: "ANTHROPIC",
        api_key_keys: &["ANTHROPIC_API_KEY"],
        base_url_keys: &["ANTHROPIC_BASE_URL"],
        default_base_url: Some("https://api.anthropic.com/v1"),
        model_keys: &["ANTHROPIC_MODEL"],
        default_model: "claude-3-5-sonnet-latest",
    },
    ProviderSpec {
        kind: ProviderKind::Gemini,
        display_name: "Gemini",
        env_prefix: "GEMINI",
        api_key_keys: &["GEMINI_API_KEY"],
        base_url_keys: &["GEMINI_BASE_URL"],
        default_base_url: Some("https://generativelanguage.googleapis.com/v1beta"),
        model_keys: &["GEMINI_MODEL"],
        default_model: "gemini-1.5-flash",
    },
    // Managed enterprise gateways
    ProviderSpec {
        kind: ProviderKind::Apigee,
        display_name: "Apigee Gateway",
        env_prefix: "APIGEE",
        api_key_keys: &[],
        base_url_keys: &["ENTERPRISE_BASE_URL"],
        default_base_url: None,
        model_keys: &["APIGEE_MODEL"],
        default_model: "gpt-4",
    },
    ProviderSpec {
        kind: ProviderKind::Enterprise,
        display_name: "Enterprise Gateway",
        env_prefix: "ENTERPRISE_LLM",
        api_key_keys: &[],
        base_url_keys: &["ENTERPRISE_LLM_URL"],
        default_base_url: None,
        model_keys: &["ENTERPRISE_LLM_MODEL"],
        default_model: "llama-3.2-3b-instruct",
    },
    // Self-hosted
    ProviderSpec {
        kind: ProviderKind::Local,
        display_name: "Local (OpenAI-compatible)",
        env_prefix: "LOCAL_LLM",
        api_key_keys: &["LOCAL_LLM_API_KEY"],
        base_url_keys: &["LOCAL_LLM_URL", "LMSTUDIO_BASE_URL"],
        default_base_url: Some("http://localhost:1234/v1"),
        model_keys: &["LOCAL_LLM_MODEL", "LMSTUDIO_MODEL"],
        default_model: "google/gemma-3n-e4b",
    },
    ProviderSpec {
        kind: ProviderKind::Ollama,
        display_name: "Ollama",
        env_prefix: "OLLAMA",
        api_key_keys: &[],
        base_url_keys: &["OLLAMA_HOST"],
        default_base_url: Some("http://localhost:11434"),
        model_keys: &["OLLAMA_MODEL"],
        default_model: "llama-3.2-3b-instruct",
    },
];

// ─────────────────────────────────────────────
// Lookup and resolution
// ─────────────────────────────────────────────

/// The spec for a provider tag. Every tag has exactly one.
pub fn find_spec(kind: ProviderKind) -> &'static ProviderSpec {
    PROVIDERS
        .iter()
        .find(|spec| spec.kind == kind)
        .unwrap_or(&PROVIDERS[0])
}

/// Build the configuration for `kind` from named settings plus defaults.
///
/// Hosted providers get their default endpoint filled in; self-hosted and
/// managed providers only carry an endpoint that was explicitly set, since
/// its presence is what makes them available.
pub fn resolve_config(kind: ProviderKind, settings: &Settings) -> ProviderConfig {
    let spec = find_spec(kind);

    let model = settings
        .first_of(spec.model_keys)
        .unwrap_or(spec.default_model)
        .to_string();

    let explicit_base = settings.first_of(spec.base_url_keys).map(String::from);
    let base_url = match kind.class() {
        ProviderClass::Hosted => {
            explicit_base.or_else(|| spec.default_base_url.map(String::from))
        }
        ProviderClass::Managed | ProviderClass::SelfHosted => explicit_base,
    };

    let api_key = settings
        .first_of(spec.api_key_keys)
        .filter(|key| *key != NO_KEY_PLACEHOLDER)
        .map(String::from);

    let temperature = settings
        .parse::<f64>(&format!("{}_TEMPERATURE", spec.env_prefix))
        .unwrap_or(DEFAULT_TEMPERATURE);
    let max_tokens = settings
        .parse::<u32>(&format!("{}_MAX_TOKENS", spec.env_prefix))
        .unwrap_or(DEFAULT_MAX_TOKENS);
    let timeout = resolve_timeout(settings, spec);

    let managed = match kind {
        ProviderKind::Apigee => Some(ManagedAuth::OAuth(OAuthSettings {
            login_url: owned(settings, APIGEE_LOGIN_URL),
            consumer_key: owned(settings, APIGEE_CONSUMER_KEY),
            consumer_secret: owned(settings, APIGEE_CONSUMER_SECRET),
            use_case_id: owned(settings, WF_USE_CASE_ID),
            client_id: owned(settings, WF_CLIENT_ID),
            gateway_api_key: owned(settings, WF_API_KEY),
        })),
        ProviderKind::Enterprise => Some(ManagedAuth::StaticToken(StaticTokenSettings {
            token: owned(settings, ENTERPRISE_TOKEN),
            extra_headers: owned(settings, ENTERPRISE_HEADERS),
        })),
        _ => None,
    };

    ProviderConfig {
        provider: kind,
        model,
        api_key,
        base_url,
        temperature,
        max_tokens,
        timeout,
        managed,
    }
}

/// `<PREFIX>_TIMEOUT` in seconds; non-positive or unrepresentable values are rejected.
fn resolve_timeout(settings: &Settings, spec: &ProviderSpec) -> Duration {
    let name = format!("{}_TIMEOUT", spec.env_prefix);
    let Some(secs) = settings.parse::<f64>(&name) else {
        return DEFAULT_TIMEOUT;
    };
    if secs <= 0.0 {
        warn!(setting = %name, value = secs, "timeout must be positive, using default");
        return DEFAULT_TIMEOUT;
    }
    Duration::try_from_secs_f64(secs).unwrap_or_else(|_| {
        warn!(setting = %name, value = secs, "timeout out of range, using default");
        DEFAULT_TIMEOUT
    })
}

fn owned(settings: &Settings, name: &str) -> Option<String> {
    settings.get(name).map(String::from)
}

/// Names of required settings that `config` lacks. Empty means available.
pub fn missing_settings(config: &ProviderConfig) -> Vec<&'static str> {
    let spec = find_spec(config.provider);
    let mut missing = Vec::new();

    match config.provider {
        ProviderKind::OpenAi | ProviderKind::Anthropic | ProviderKind::Gemini => {
            if config.api_key.is_none() {
                missing.extend(spec.api_key_keys.first());
            }
        }
        ProviderKind::Local | ProviderKind::Ollama => {
            if config.base_url.is_none() {
                missing.extend(spec.base_url_keys.first());
            }
        }
        ProviderKind::Enterprise => {
            if config.static_token().and_then(|s| s.token.as_ref()).is_none() {
                missing.push(ENTERPRISE_TOKEN);
            }
            if config.base_url.is_none() {
                missing.extend(spec.base_url_keys.first());
            }
        }
        ProviderKind::Apigee => {
            let oauth = config.oauth().cloned().unwrap_or_default();
            let required = [
                (APIGEE_LOGIN_URL, &oauth.login_url),
                (APIGEE_CONSUMER_KEY, &oauth.consumer_key),
                (APIGEE_CONSUMER_SECRET, &oauth.consumer_secret),
            ];
            missing.extend(required.iter().filter(|(_, v)| v.is_none()).map(|(n, _)| *n));
            if config.base_url.is_none() {
                missing.extend(spec.base_url_keys.first());
            }
            let routing = [
                (WF_USE_CASE_ID, &oauth.use_case_id),
                (WF_CLIENT_ID, &oauth.client_id),
                (WF_API_KEY, &oauth.gateway_api_key),
            ];
            missing.extend(routing.iter().filter(|(_, v)| v.is_none()).map(|(n, _)| *n));
        }
    }

    missing
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn apigee_settings() -> Settings {
        Settings::from_pairs([
            ("APIGEE_NONPROD_LOGIN_URL", "https://login.example/oauth"),
            ("APIGEE_CONSUMER_KEY", "ck"),
            ("APIGEE_CONSUMER_SECRET", "cs"),
            ("ENTERPRISE_BASE_URL", "https://gw.example"),
            ("WF_USE_CASE_ID", "uc-1"),
            ("WF_CLIENT_ID", "client-1"),
            ("WF_API_KEY", "wf-key"),
        ])
    }

    #[test]
    fn test_every_kind_has_a_spec() {
        for kind in ProviderKind::ALL {
            assert_eq!(find_spec(kind).kind, kind);
        }
        assert_eq!(PROVIDERS.len(), ProviderKind::ALL.len());
    }

    #[test]
    fn test_registry_order_matches_probe_order() {
        let kinds: Vec<ProviderKind> = PROVIDERS.iter().map(|s| s.kind).collect();
        assert_eq!(kinds, ProviderKind::ALL.to_vec());
    }

    #[test]
    fn test_hosted_defaults() {
        let cfg = resolve_config(ProviderKind::OpenAi, &Settings::new());
        assert_eq!(cfg.model, "gpt-4o");
        assert_eq!(cfg.base_url.as_deref(), Some("https://api.openai.com/v1"));
        assert_eq!(cfg.temperature, DEFAULT_TEMPERATURE);
        assert_eq!(cfg.max_tokens, DEFAULT_MAX_TOKENS);
        assert_eq!(cfg.timeout, DEFAULT_TIMEOUT);
        assert!(!cfg.is_available());
    }

    #[test]
    fn test_hosted_available_with_key() {
        let settings = Settings::from_pairs([("GEMINI_API_KEY", "g-key")]);
        let cfg = resolve_config(ProviderKind::Gemini, &settings);
        assert_eq!(cfg.api_key.as_deref(), Some("g-key"));
        assert!(cfg.is_available());
    }

    #[test]
    fn test_tuning_overrides() {
        let settings = Settings::from_pairs([
            ("ANTHROPIC_TEMPERATURE", "0.7"),
            ("ANTHROPIC_MAX_TOKENS", "256"),
            ("ANTHROPIC_TIMEOUT", "2.5"),
            ("ANTHROPIC_MODEL", "claude-3-haiku"),
        ]);
        let cfg = resolve_config(ProviderKind::Anthropic, &settings);
        assert_eq!(cfg.temperature, 0.7);
        assert_eq!(cfg.max_tokens, 256);
        assert_eq!(cfg.timeout, Duration::from_millis(2500));
        assert_eq!(cfg.model, "claude-3-haiku");
    }

    #[test]
    fn test_bad_tuning_values_fall_back() {
        let settings = Settings::from_pairs([
            ("OLLAMA_MAX_TOKENS", "lots"),
            ("OLLAMA_TIMEOUT", "-3"),
        ]);
        let cfg = resolve_config(ProviderKind::Ollama, &settings);
        assert_eq!(cfg.max_tokens, DEFAULT_MAX_TOKENS);
        assert_eq!(cfg.timeout, DEFAULT_TIMEOUT);
    }

    #[test]
    fn test_out_of_range_timeout_falls_back() {
        for raw in ["1e30", "inf", "NaN"] {
            let settings = Settings::from_pairs([("OLLAMA_TIMEOUT", raw)]);
            let cfg = resolve_config(ProviderKind::Ollama, &settings);
            assert_eq!(cfg.timeout, DEFAULT_TIMEOUT, "OLLAMA_TIMEOUT={raw}");
        }
    }

    #[test]
    fn test_local_requires_explicit_endpoint() {
        let cfg = resolve_config(ProviderKind::Local, &Settings::new());
        assert!(cfg.base_url.is_none());
        assert_eq!(missing_settings(&cfg), vec!["LOCAL_LLM_URL"]);
        assert!(!cfg.is_available());
    }

    #[test]
    fn test_local_legacy_aliases() {
        let settings = Settings::from_pairs([
            ("LMSTUDIO_BASE_URL", "http://studio:1234/v1"),
            ("LMSTUDIO_MODEL", "qwen2.5-coder:7b"),
        ]);
        let cfg = resolve_config(ProviderKind::Local, &settings);
        assert_eq!(cfg.base_url.as_deref(), Some("http://studio:1234/v1"));
        assert_eq!(cfg.model, "qwen2.5-coder:7b");
        assert!(cfg.is_available());
    }

    #[test]
    fn test_local_placeholder_key_is_no_key() {
        let settings = Settings::from_pairs([
            ("LOCAL_LLM_URL", "http://x"),
            ("LOCAL_LLM_API_KEY", "not-needed"),
        ]);
        let cfg = resolve_config(ProviderKind::Local, &settings);
        assert!(cfg.api_key.is_none());
    }

    #[test]
    fn test_apigee_available_with_full_set() {
        let cfg = resolve_config(ProviderKind::Apigee, &apigee_settings());
        assert!(cfg.is_available(), "missing: {:?}", missing_settings(&cfg));
        assert_eq!(cfg.model, "gpt-4");
        assert_eq!(cfg.base_url.as_deref(), Some("https://gw.example"));
        let oauth = cfg.oauth().unwrap();
        assert_eq!(oauth.use_case_id.as_deref(), Some("uc-1"));
    }

    #[test]
    fn test_apigee_unavailable_when_any_setting_missing() {
        let full = apigee_settings();
        for name in [
            "APIGEE_NONPROD_LOGIN_URL",
            "APIGEE_CONSUMER_KEY",
            "APIGEE_CONSUMER_SECRET",
            "ENTERPRISE_BASE_URL",
            "WF_USE_CASE_ID",
            "WF_CLIENT_ID",
            "WF_API_KEY",
        ] {
            let mut settings = full.clone();
            settings.set(name, "");
            let cfg = resolve_config(ProviderKind::Apigee, &settings);
            assert!(!cfg.is_available(), "{name} absent should make apigee unavailable");
            assert_eq!(missing_settings(&cfg), vec![name]);
        }
    }

    #[test]
    fn test_enterprise_requires_token_and_url() {
        let token_only = Settings::from_pairs([("ENTERPRISE_LLM_TOKEN", "t")]);
        let cfg = resolve_config(ProviderKind::Enterprise, &token_only);
        assert_eq!(missing_settings(&cfg), vec!["ENTERPRISE_LLM_URL"]);

        let both = Settings::from_pairs([
            ("ENTERPRISE_LLM_TOKEN", "t"),
            ("ENTERPRISE_LLM_URL", "https://llm.corp/generate"),
            ("ENTERPRISE_LLM_HEADERS", r#"{"X-Env":"prod"}"#),
        ]);
        let cfg = resolve_config(ProviderKind::Enterprise, &both);
        assert!(cfg.is_available());
        assert_eq!(
            cfg.static_token().unwrap().extra_headers.as_deref(),
            Some(r#"{"X-Env":"prod"}"#)
        );
    }

    #[test]
    fn test_only_gateways_carry_managed_auth() {
        for kind in ProviderKind::ALL {
            let cfg = resolve_config(kind, &Settings::new());
            assert_eq!(cfg.managed.is_some(), kind.requires_managed_auth(), "{kind}");
        }
    }
}
