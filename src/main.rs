use std::io::Read;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

use mind_adapters::commands::{rewrite_schema, split_output};
use mind_adapters::config::Config;

#[derive(Parser, Debug)]
#[command(name = "mind-adapters", about = "Model output and tool schema adapters")]
struct Cli {
    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pretty: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Split raw model output into text and thought fragments
    Split {
        /// Read from this file instead of stdin
        #[arg(long)]
        input: Option<PathBuf>,
    },
    /// Rewrite a JSON Schema node for Gemini function declarations
    Schema {
        /// Read from this file instead of stdin
        #[arg(long)]
        input: Option<PathBuf>,
        /// Model name, overrides schema.model_name from config
        #[arg(long)]
        model: Option<String>,
    },
}

fn read_input(path: Option<&PathBuf>) -> Result<String> {
    match path {
        Some(p) => std::fs::read_to_string(p)
            .with_context(|| format!("failed to read {}", p.display())),
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read stdin")?;
            Ok(buf)
        }
    }
}

fn print_json<T: Serialize>(value: &T, pretty: bool) -> Result<()> {
    let out = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{}", out);
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load()?;

    // Logs go to stderr so stdout stays machine-readable
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match &config.source {
        Some(path) => debug!("loaded config from {}", path.display()),
        None => warn!("Config file not found, using defaults"),
    }
    for key in &config.env_overrides {
        debug!("{} env override applied", key);
    }

    let pretty = cli.pretty || config.output.pretty;

    match cli.command {
        Command::Split { input } => {
            let content = read_input(input.as_ref())?;
            print_json(&split_output(&content), pretty)?;
        }
        Command::Schema { input, model } => {
            let mut settings = config.schema.clone();
            if let Some(model) = model {
                settings.model_name = model;
            }
            let raw = read_input(input.as_ref())?;
            let rewritten = rewrite_schema(&raw, &settings)?;
            print_json(&rewritten, pretty)?;
        }
    }

    Ok(())
}
