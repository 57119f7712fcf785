//! Retouch CLI - edit and describe images with generative AI.
//!
//! Retouch sends an image and an instruction to Google Gemini for an edited
//! image, or sends the image to a vision model on OpenRouter for a written
//! description. API keys are stored locally and never read from the
//! environment.
//!
//! # Usage
//!
//! ```bash
//! # Guided session (no subcommand, on a terminal)
//! retouch
//!
//! # One-shot edit
//! retouch edit photo.jpg --prompt "add a hat" --output hat.png
//!
//! # One-shot description
//! retouch describe photo.jpg
//!
//! # Manage API keys
//! retouch keys set
//! ```

use clap::{Parser, Subcommand};
use std::io::IsTerminal;

mod cli;
mod logging;

/// Retouch - edit and describe images with generative AI.
#[derive(Parser, Debug)]
#[command(name = "retouch")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Edit an image according to an instruction
    Edit(cli::run::EditArgs),

    /// Describe an image in prose
    Describe(cli::run::DescribeArgs),

    /// Manage the provider API keys
    Keys(cli::keys::KeysArgs),

    /// View and manage configuration
    Config(cli::config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logging isn't initialized yet, so use eprintln for config warnings.
    let config = match retouch_core::Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!(
                "Warning: Failed to load config: {e}\n  \
                 Using default configuration. Check your config file with `retouch config path`."
            );
            retouch_core::Config::default()
        }
    };
    logging::init_from_config(&config, cli.verbose, cli.json_logs);

    tracing::debug!("Retouch v{}", retouch_core::VERSION);

    match cli.command {
        Some(Commands::Edit(args)) => cli::run::edit(args, &config).await,
        Some(Commands::Describe(args)) => cli::run::describe(args, &config).await,
        Some(Commands::Keys(args)) => cli::keys::execute(args, &config),
        Some(Commands::Config(args)) => cli::config::execute(args).await,
        None if std::io::stdin().is_terminal() => cli::interactive::run(&config).await,
        None => anyhow::bail!(
            "No command given and stdin is not a terminal. Run `retouch --help` for usage."
        ),
    }
}
