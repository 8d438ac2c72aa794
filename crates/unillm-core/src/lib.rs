//! Core building blocks for unillm.
//!
//! - [`types`]: provider tags, per-call options, and shared defaults
//! - [`error`]: the normalized [`LlmError`] every layer returns
//! - [`config`]: settings loading, provider registry, and config resolution
//! - [`utils`]: path and string helpers

pub mod config;
pub mod error;
pub mod types;
pub mod utils;

pub use config::{load_settings, resolve_config, ProviderConfig, Settings};
pub use error::{ErrorKind, LlmError, Result};
pub use types::{CallOptions, ProviderClass, ProviderKind};
