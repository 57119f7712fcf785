//! The `retouch config` command: inspect and bootstrap `config.toml`.

use clap::{Args, Subcommand};
use retouch_core::Config;
use std::path::Path;

/// Arguments for the `config` command.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

/// Subcommands for configuration management.
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Print the effective configuration (file values over defaults)
    Show,

    /// Print the config file and credentials file locations
    Path,

    /// Write a config file with default provider endpoints and models
    Init {
        /// Replace an existing config file
        #[arg(long)]
        force: bool,
    },
}

const INIT_HEADER: &str = "\
# Retouch configuration.
# API keys do not belong here; use `retouch keys set`.

";

/// Execute the config command.
pub async fn execute(args: ConfigArgs) -> anyhow::Result<()> {
    match args.command {
        ConfigCommand::Show => {
            let config = Config::load()?;
            let source = Config::default_path();
            if source.exists() {
                println!("# Loaded from {}", source.display());
            } else {
                println!("# No config file, showing defaults");
            }
            println!("{}", config.to_toml()?);
        }

        ConfigCommand::Path => {
            let config = Config::load().unwrap_or_default();
            println!("config:      {}", Config::default_path().display());
            println!("credentials: {}", config.credentials_path().display());
        }

        ConfigCommand::Init { force } => {
            let path = Config::default_path();
            write_default_config(&path, force).await?;
            tracing::info!("Wrote default config to {}", path.display());
            println!("Configuration initialized at: {}", path.display());
        }
    }

    Ok(())
}

/// Write the default config to `path`, refusing to overwrite unless `force`.
async fn write_default_config(path: &Path, force: bool) -> anyhow::Result<()> {
    if tokio::fs::try_exists(path).await? && !force {
        anyhow::bail!(
            "Config file already exists at: {}\nUse --force to overwrite.",
            path.display()
        );
    }

    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }

    let body = Config::default().to_toml()?;
    tokio::fs::write(path, format!("{INIT_HEADER}{body}")).await?;
    Ok(())
}
