//! `unillm status`: active provider plus per-provider configuration state.

use std::path::Path;

use anyhow::Result;
use colored::Colorize;

use unillm_core::config::{get_settings_path, missing_settings, resolve_config, PROVIDERS};
use unillm_core::Settings;

use crate::helpers::{self, ClientSource};

/// Run the status command.
pub fn run(settings_path: Option<&Path>) -> Result<()> {
    let source = ClientSource::new(settings_path.map(Path::to_path_buf), None);
    let settings = helpers::load(settings_path, None);
    let file = settings_path
        .map(Path::to_path_buf)
        .unwrap_or_else(get_settings_path);

    println!();
    println!("{}", "unillm status".cyan().bold());
    println!();

    println!(
        "  {:<18} {} {}",
        "Settings:".bold(),
        file.display(),
        if file.exists() {
            "✓".green().to_string()
        } else {
            "(not found, environment only)".dimmed().to_string()
        }
    );

    let status = source.lazy().status()?;
    match (status.provider, status.model) {
        (Some(provider), Some(model)) => {
            let state = if status.available {
                "✓ available".green().to_string()
            } else {
                "✗ not fully configured".red().to_string()
            };
            println!("  {:<18} {} ({}) {}", "Active:".bold(), provider, model, state);
        }
        _ => println!("  {:<18} {}", "Active:".bold(), "none available".red()),
    }

    println!();
    println!("  {}", "Providers (probe order):".bold());
    for line in provider_lines(&settings) {
        println!("    {line}");
    }
    println!();

    Ok(())
}

/// One line per provider: display name plus either a check mark or what is missing.
fn provider_lines(settings: &Settings) -> Vec<String> {
    PROVIDERS
        .iter()
        .map(|spec| {
            let config = resolve_config(spec.kind, settings);
            let missing = missing_settings(&config);
            let state = if missing.is_empty() {
                format!("{} {}", "✓".green(), config.model)
            } else {
                format!("{}", format!("· missing {}", missing.join(", ")).dimmed())
            };
            format!("{:<12} {:<28} {}", spec.kind.as_str(), spec.display_name, state)
        })
        .collect()
}
