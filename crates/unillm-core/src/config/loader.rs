//! Settings loader: reads `~/.unillm/settings.json` and overlays env vars.
//!
//! # Loading precedence
//! 1. JSON file (flat object of `NAME: value`)
//! 2. Process environment variables (override file values)
//!
//! Everything downstream reads through [`Settings`], never through
//! `std::env` directly, so tests can inject exact settings.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use tracing::{debug, info, warn};

/// Default settings file path.
pub fn get_settings_path() -> PathBuf {
    crate::utils::get_data_path().join("settings.json")
}

/// A snapshot of named settings. Empty values are treated as absent.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Settings {
    values: HashMap<String, String>,
}

impl Settings {
    /// Empty settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the current process environment.
    pub fn from_env() -> Self {
        Self {
            values: std::env::vars().collect(),
        }
    }

    /// Build from explicit name/value pairs.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            values: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Set one value, replacing any previous one.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.insert(name.into(), value.into());
    }

    /// Overlay `other` on top of `self`; `other` wins on conflicts.
    pub fn merge(mut self, other: Settings) -> Self {
        self.values.extend(other.values);
        self
    }

    /// A non-empty value for `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values
            .get(name)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    /// Whether `name` has a non-empty value.
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// First non-empty value among `names`, in order.
    pub fn first_of(&self, names: &[&str]) -> Option<&str> {
        names.iter().find_map(|name| self.get(name))
    }

    /// Parse a value, logging and discarding it if malformed.
    pub fn parse<T: FromStr>(&self, name: &str) -> Option<T> {
        let raw = self.get(name)?;
        match raw.parse::<T>() {
            Ok(v) => Some(v),
            Err(_) => {
                warn!(setting = name, value = raw, "ignoring unparseable setting");
                None
            }
        }
    }
}

/// Load settings from the default (or given) file, then overlay the process environment.
pub fn load_settings(path: Option<&Path>) -> Settings {
    let settings_path = path.map(PathBuf::from).unwrap_or_else(get_settings_path);
    load_file(&settings_path).merge(Settings::from_env())
}

/// Read a flat JSON settings file. Missing or unreadable files give empty settings.
fn load_file(path: &Path) -> Settings {
    if !path.exists() {
        info!("No settings file found at {}, using environment only", path.display());
        return Settings::new();
    }

    debug!("Loading settings from {}", path.display());

    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            warn!("Failed to read settings file {}: {}", path.display(), e);
            return Settings::new();
        }
    };

    let raw: serde_json::Map<String, serde_json::Value> = match serde_json::from_str(&content) {
        Ok(v) => v,
        Err(e) => {
            warn!("Failed to parse settings JSON: {}", e);
            return Settings::new();
        }
    };

    let mut settings = Settings::new();
    for (name, value) in raw {
        match value {
            serde_json::Value::String(s) => settings.set(name, s),
            serde_json::Value::Number(n) => settings.set(name, n.to_string()),
            serde_json::Value::Bool(b) => settings.set(name, b.to_string()),
            // Extra headers may be given inline as an object.
            v @ serde_json::Value::Object(_) => settings.set(name, v.to_string()),
            other => warn!(setting = %name, value = %other, "ignoring non-scalar setting"),
        }
    }
    settings
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
