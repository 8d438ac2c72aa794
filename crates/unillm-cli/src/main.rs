//! unillm CLI: entry point.
//!
//! # Commands
//!
//! - `unillm generate -p PROMPT [--image FILE]`: one call against the selected provider
//! - `unillm status`: active provider plus every provider's configuration state
//! - `unillm chat`: interactive loop, one stateless call per line

mod helpers;
mod repl;
mod status;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use helpers::ClientSource;

// ─────────────────────────────────────────────
// CLI definition
// ─────────────────────────────────────────────

/// unillm: one prompt interface over hosted, enterprise, and local LLMs
#[derive(Parser)]
#[command(name = "unillm", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Send one prompt and print the generated text
    Generate {
        /// Prompt text
        #[arg(short, long)]
        prompt: String,

        /// Image file to attach to the prompt
        #[arg(long)]
        image: Option<PathBuf>,

        /// Provider tag (overrides LLM_PROVIDER and probing)
        #[arg(long)]
        provider: Option<String>,

        /// Sampling temperature for this call
        #[arg(long)]
        temperature: Option<f64>,

        /// Maximum output tokens for this call
        #[arg(long)]
        max_tokens: Option<u32>,

        /// Timeout for this call, in milliseconds
        #[arg(long)]
        timeout_ms: Option<u64>,

        /// Settings file (default: ~/.unillm/settings.json)
        #[arg(long)]
        settings: Option<PathBuf>,

        /// Enable debug logging
        #[arg(long, default_value_t = false)]
        logs: bool,
    },

    /// Show the active provider and each provider's configuration
    Status {
        /// Settings file (default: ~/.unillm/settings.json)
        #[arg(long)]
        settings: Option<PathBuf>,
    },

    /// Interactive prompt loop (no conversation history is sent)
    Chat {
        /// Provider tag (overrides LLM_PROVIDER and probing)
        #[arg(long)]
        provider: Option<String>,

        /// Settings file (default: ~/.unillm/settings.json)
        #[arg(long)]
        settings: Option<PathBuf>,

        /// Enable debug logging
        #[arg(long, default_value_t = false)]
        logs: bool,
    },
}

// ─────────────────────────────────────────────
// Entrypoint
// ─────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Generate {
            prompt,
            image,
            provider,
            temperature,
            max_tokens,
            timeout_ms,
            settings,
            logs,
        } => {
            init_logging(logs);
            let prompt = match image {
                Some(path) => helpers::attach_image(&prompt, &path)?,
                None => prompt,
            };
            let options = helpers::call_options(temperature, max_tokens, timeout_ms);
            let source = ClientSource::new(settings, provider);
            run_generate(&source, &prompt, &options).await
        }
        Commands::Status { settings } => {
            init_logging(false);
            status::run(settings.as_deref())
        }
        Commands::Chat {
            provider,
            settings,
            logs,
        } => {
            init_logging(logs);
            let source = ClientSource::new(settings, provider);
            let client = source.client()?;
            repl::run(client).await
        }
    }
}

// ─────────────────────────────────────────────
// Generate command
// ─────────────────────────────────────────────

async fn run_generate(
    source: &ClientSource,
    prompt: &str,
    options: &unillm_core::CallOptions,
) -> Result<()> {
    let client = source.client()?;
    info!(provider = %client.provider(), model = %client.model(), "generating");

    let text = client
        .generate(prompt, options)
        .await
        .with_context(|| format!("{} call failed", client.provider()))?;

    println!("{text}");
    Ok(())
}

/// Initialize tracing/logging.
fn init_logging(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new("unillm_core=debug,unillm_providers=debug,unillm=debug,info")
    } else {
        EnvFilter::new("warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}
