//! Shared CLI helpers: client selection, image attachment, output formatting.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use base64::Engine;
use colored::Colorize;

use unillm_core::config::{load_settings, PROVIDER_OVERRIDE};
use unillm_core::{CallOptions, Settings};
use unillm_providers::multimodal::IMAGE_SENTINEL;
use unillm_providers::{global, LazyClient, LlmClient};

/// Where the active client comes from.
///
/// Without flags the process-wide lazy client is used; `--settings` or
/// `--provider` get a dedicated one built from the adjusted settings.
pub enum ClientSource {
    Global,
    Custom(LazyClient),
}

impl ClientSource {
    pub fn new(settings_path: Option<PathBuf>, provider: Option<String>) -> Self {
        if settings_path.is_none() && provider.is_none() {
            return ClientSource::Global;
        }
        ClientSource::Custom(LazyClient::new(move || {
            load(settings_path.as_deref(), provider.as_deref())
        }))
    }

    pub fn lazy(&self) -> &LazyClient {
        match self {
            ClientSource::Global => global(),
            ClientSource::Custom(lazy) => lazy,
        }
    }

    /// The selected client, or an error telling the user how to configure one.
    pub fn client(&self) -> Result<Arc<LlmClient>> {
        match self.lazy().get().context("failed to select an LLM provider")? {
            Some(client) => Ok(client),
            None => bail!(
                "no LLM provider available: set OPENAI_API_KEY, ANTHROPIC_API_KEY, GEMINI_API_KEY, \
                 an enterprise gateway, LOCAL_LLM_URL, or OLLAMA_HOST (see `unillm status`)"
            ),
        }
    }
}

/// Settings from file and environment, with an optional forced provider tag.
pub fn load(settings_path: Option<&Path>, provider: Option<&str>) -> Settings {
    let mut settings = load_settings(settings_path);
    if let Some(tag) = provider {
        settings.set(PROVIDER_OVERRIDE, tag);
    }
    settings
}

/// Append an image file to a prompt using the `Base64 Image Data:` convention.
pub fn attach_image(prompt: &str, path: &Path) -> Result<String> {
    let bytes = std::fs::read(path)
        .with_context(|| format!("failed to read image: {}", path.display()))?;
    if bytes.is_empty() {
        bail!("image file is empty: {}", path.display());
    }
    let encoded = base64::engine::general_purpose::STANDARD.encode(bytes);
    Ok(format!("{prompt}\n{IMAGE_SENTINEL} {encoded}"))
}

/// Per-call overrides from command-line flags.
pub fn call_options(
    temperature: Option<f64>,
    max_tokens: Option<u32>,
    timeout_ms: Option<u64>,
) -> CallOptions {
    CallOptions {
        temperature,
        max_tokens,
        timeout: timeout_ms.map(Duration::from_millis),
    }
}

/// Print a model response to stdout.
pub fn print_response(provider: &str, response: &str) {
    println!();
    println!("{}", provider.cyan().bold());
    if response.is_empty() {
        println!("{}", "(empty response)".dimmed());
    } else {
        println!("{response}");
    }
    println!();
}

/// Print the banner shown at chat start.
pub fn print_banner(provider: &str, model: &str) {
    let version = env!("CARGO_PKG_VERSION");
    println!();
    println!("{}  v{}", "unillm chat".cyan().bold(), version.dimmed());
    println!("{}", format!("{provider} · {model}").dimmed());
    println!(
        "{}",
        "Each line is sent on its own. Type \"exit\" to quit.".dimmed()
    );
    println!();
}

/// Print a "thinking" placeholder.
pub fn print_thinking() {
    eprint!("{}", "⠿ thinking...".dimmed());
}

/// Clear the "thinking" placeholder.
pub fn clear_thinking() {
    eprint!("\r{}\r", " ".repeat(40));
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
