//! Configuration system: settings loading, provider schema, and resolution.
//!
//! # Usage
//! ```no_run
//! use unillm_core::config::{load_settings, resolve_config};
//! use unillm_core::ProviderKind;
//!
//! let settings = load_settings(None);
//! let cfg = resolve_config(ProviderKind::Ollama, &settings);
//! println!("Model: {}", cfg.model);
//! ```

pub mod loader;
pub mod registry;
pub mod schema;

// Re-export key types
pub use loader::{get_settings_path, load_settings, Settings};
pub use registry::{
    find_spec, missing_settings, resolve_config, ProviderSpec, PROVIDERS, PROVIDER_OVERRIDE,
};
pub use schema::{ManagedAuth, OAuthSettings, ProviderConfig, StaticTokenSettings};
