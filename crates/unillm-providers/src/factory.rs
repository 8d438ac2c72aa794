//! Provider selection and the lazily cached client.
//!
//! [`create_client`] picks a provider from a [`Settings`] snapshot:
//! `LLM_PROVIDER` if set, otherwise the first available provider in probe
//! order. [`LazyClient`] memoizes that choice; [`global`] is the
//! process-wide instance used by the binary.

use std::sync::{Arc, OnceLock, RwLock};

use serde::Serialize;
use tracing::{debug, info, warn};

use unillm_core::config::{load_settings, missing_settings, resolve_config, PROVIDER_OVERRIDE};
use unillm_core::{ProviderKind, Result, Settings};

use crate::client::LlmClient;

/// Build a client for an explicit provider tag.
pub fn client_for(kind: ProviderKind, settings: &Settings) -> Result<LlmClient> {
    LlmClient::new(resolve_config(kind, settings))
}

/// Select and build a client.
///
/// Returns `Ok(None)` when no provider is available. An unknown
/// `LLM_PROVIDER` tag is a configuration error.
pub fn create_client(settings: &Settings) -> Result<Option<LlmClient>> {
    if let Some(tag) = settings.get(PROVIDER_OVERRIDE) {
        let kind: ProviderKind = tag.parse()?;
        let client = client_for(kind, settings)?;
        if !client.is_available() {
            warn!(
                provider = %kind,
                missing = %missing_settings(client.config()).join(", "),
                "LLM_PROVIDER selects a provider that is not fully configured"
            );
        }
        info!(provider = %kind, model = %client.model(), "Using LLM provider from LLM_PROVIDER");
        return Ok(Some(client));
    }

    for kind in ProviderKind::ALL {
        let config = resolve_config(kind, settings);
        if !config.is_available() {
            debug!(provider = %kind, "Skipping unconfigured provider");
            continue;
        }

        match LlmClient::new(config) {
            Ok(client) if client.is_available() => {
                info!(provider = %kind, model = %client.model(), "Selected LLM provider");
                return Ok(Some(client));
            }
            Ok(_) => debug!(provider = %kind, "Client reports itself unavailable"),
            Err(e) => warn!(provider = %kind, error = %e, "Failed to construct provider, trying next"),
        }
    }

    info!("No LLM provider available");
    Ok(None)
}

// ─────────────────────────────────────────────
// LazyClient
// ─────────────────────────────────────────────

/// Introspection result for a [`LazyClient`].
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ClientStatus {
    pub provider: Option<ProviderKind>,
    pub model: Option<String>,
    pub available: bool,
}

impl ClientStatus {
    fn none() -> Self {
        Self {
            provider: None,
            model: None,
            available: false,
        }
    }
}

type SettingsLoader = Box<dyn Fn() -> Settings + Send + Sync>;

/// Builds a client on first use and keeps it until [`LazyClient::reset`].
///
/// A "no provider available" outcome is not kept, so a later call can pick
/// up settings that appear afterwards.
pub struct LazyClient {
    loader: SettingsLoader,
    slot: RwLock<Option<Arc<LlmClient>>>,
}

impl LazyClient {
    pub fn new(loader: impl Fn() -> Settings + Send + Sync + 'static) -> Self {
        Self {
            loader: Box::new(loader),
            slot: RwLock::new(None),
        }
    }

    /// Reads the default settings file and the process environment on each (re)load.
    pub fn from_env() -> Self {
        Self::new(|| load_settings(None))
    }

    /// The retained client, building one if none is retained.
    pub fn get(&self) -> Result<Option<Arc<LlmClient>>> {
        if let Some(client) = self.retained() {
            return Ok(Some(client));
        }

        let mut slot = self.slot.write().unwrap_or_else(|e| e.into_inner());
        if let Some(client) = slot.as_ref() {
            return Ok(Some(Arc::clone(client)));
        }

        let created = create_client(&(self.loader)())?.map(Arc::new);
        if let Some(client) = &created {
            *slot = Some(Arc::clone(client));
        }
        Ok(created)
    }

    /// Drop the retained client; the next `get` re-resolves configuration.
    pub fn reset(&self) {
        let mut slot = self.slot.write().unwrap_or_else(|e| e.into_inner());
        if slot.take().is_some() {
            debug!("LLM client reset");
        }
    }

    /// Active provider, model, and availability.
    pub fn status(&self) -> Result<ClientStatus> {
        Ok(match self.get()? {
            Some(client) => ClientStatus {
                provider: Some(client.provider()),
                model: Some(client.model().to_string()),
                available: client.is_available(),
            },
            None => ClientStatus::none(),
        })
    }

    fn retained(&self) -> Option<Arc<LlmClient>> {
        self.slot
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .as_ref()
            .map(Arc::clone)
    }
}

impl std::fmt::Debug for LazyClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LazyClient")
            .field("retained", &self.retained().map(|c| c.provider()))
            .finish_non_exhaustive()
    }
}

static GLOBAL: OnceLock<LazyClient> = OnceLock::new();

/// The process-wide lazy client, configured from the default settings file and environment.
pub fn global() -> &'static LazyClient {
    GLOBAL.get_or_init(LazyClient::from_env)
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
