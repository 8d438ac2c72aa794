//! Interactive chat loop.
//!
//! Uses `rustyline` for readline-style editing with persistent history. Each
//! line is an independent `generate` call; nothing from earlier turns is sent.

use std::sync::Arc;

use anyhow::Result;
use rustyline::config::Configurer;
use rustyline::history::DefaultHistory;
use rustyline::{DefaultEditor, Editor};
use tracing::debug;

use unillm_core::CallOptions;
use unillm_providers::LlmClient;

use crate::helpers;

/// Exit commands (case-insensitive match).
const EXIT_COMMANDS: &[&str] = &["exit", "quit", "/exit", "/quit", ":q"];

/// Run the interactive loop.
pub async fn run(client: Arc<LlmClient>) -> Result<()> {
    let provider = client.provider().to_string();
    helpers::print_banner(&provider, client.model());

    let mut editor = create_editor()?;
    let options = CallOptions::new();

    loop {
        let input = match editor.readline("You: ") {
            Ok(line) => line,
            Err(rustyline::error::ReadlineError::Interrupted)
            | Err(rustyline::error::ReadlineError::Eof) => break,
            Err(e) => {
                eprintln!("Input error: {e}");
                break;
            }
        };

        let trimmed = input.trim();
        if trimmed.is_empty() {
            continue;
        }

        if is_exit_command(trimmed) {
            println!("\nGoodbye!");
            break;
        }

        let _ = editor.add_history_entry(&input);

        debug!(provider = %provider, chars = trimmed.len(), "sending line");
        helpers::print_thinking();

        match client.generate(trimmed, &options).await {
            Ok(response) => {
                helpers::clear_thinking();
                helpers::print_response(&provider, &response);
            }
            Err(e) => {
                helpers::clear_thinking();
                eprintln!("\nError: {e}\n");
            }
        }
    }

    save_history(&mut editor);

    Ok(())
}

/// Create a rustyline editor with history.
fn create_editor() -> Result<Editor<(), DefaultHistory>> {
    let mut editor = DefaultEditor::new()?;
    editor.set_max_history_size(1000)?;

    let history_path = history_path();
    if history_path.exists() {
        let _ = editor.load_history(&history_path);
        debug!("loaded chat history from {}", history_path.display());
    }

    Ok(editor)
}

fn save_history(editor: &mut Editor<(), DefaultHistory>) {
    let path = history_path();
    if let Some(parent) = path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }
    if let Err(e) = editor.save_history(&path) {
        debug!("failed to save history: {e}");
    }
}

/// `~/.unillm/history/chat_history`
fn history_path() -> std::path::PathBuf {
    unillm_core::utils::get_data_path()
        .join("history")
        .join("chat_history")
}

fn is_exit_command(input: &str) -> bool {
    let lower = input.to_lowercase();
    EXIT_COMMANDS.contains(&lower.as_str())
}
