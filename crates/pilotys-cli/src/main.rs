mod input;

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use pilotys_ai::{Extractor, LlmConfig, NullProvider};
use pilotys_core::{extract_sections, parse_structured_list, sanitize};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use crate::input::read_input;

#[derive(Parser)]
#[command(name = "pilotys", version, about = "Extract decisions and actions from meeting notes")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the notes as clean plain text.
    Sanitize {
        /// Notes file; stdin when omitted or `-`.
        file: Option<PathBuf>,
    },
    /// Print the detected sections as JSON.
    Sections {
        file: Option<PathBuf>,
        #[arg(long)]
        compact: bool,
    },
    /// Print the structured-list items of the notes as JSON.
    Parse {
        file: Option<PathBuf>,
        #[arg(long)]
        compact: bool,
    },
    /// Analyze the notes with the configured LLM, or heuristically.
    Analyze {
        file: Option<PathBuf>,
        /// Never call an LLM, even when a key is configured.
        #[arg(long)]
        offline: bool,
        #[arg(long)]
        compact: bool,
        #[arg(long, env = "OPENAI_MODEL")]
        openai_model: Option<String>,
        #[arg(long, env = "ANTHROPIC_MODEL")]
        anthropic_model: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Sanitize { file } => {
            let raw = read_input(file.as_deref())?;
            println!("{}", sanitize(&raw));
        }
        Command::Sections { file, compact } => {
            let raw = read_input(file.as_deref())?;
            print_json(&extract_sections(&sanitize(&raw)), compact)?;
        }
        Command::Parse { file, compact } => {
            let raw = read_input(file.as_deref())?;
            let text = sanitize(&raw);
            let lines: Vec<&str> = text.lines().collect();
            print_json(&parse_structured_list(&lines), compact)?;
        }
        Command::Analyze {
            file,
            offline,
            compact,
            openai_model,
            anthropic_model,
        } => {
            let raw = read_input(file.as_deref())?;
            let extractor = if offline {
                Extractor::new(Box::new(NullProvider))
            } else {
                let mut config = LlmConfig::from_env();
                if let Some(model) = openai_model {
                    config.openai_model = model;
                }
                if let Some(model) = anthropic_model {
                    config.anthropic_model = model;
                }
                Extractor::from_config(&config)
            };
            tracing::info!(
                provider = extractor.provider_name(),
                bytes = raw.len(),
                "analyzing meeting notes"
            );
            let result = extractor.analyze_meeting(&raw).await;
            print_json(&result, compact)?;
        }
    }

    Ok(())
}

fn print_json<T: Serialize>(value: &T, compact: bool) -> anyhow::Result<()> {
    let json = if compact {
        serde_json::to_string(value)
    } else {
        serde_json::to_string_pretty(value)
    }
    .context("serializing output")?;
    println!("{json}");
    Ok(())
}
