//! The `retouch keys` command: view, set and clear the provider API keys.

use clap::{Args, Subcommand};
use retouch_core::credentials::mask_key;
use retouch_core::{Config, CredentialStore, Credentials, FileStore};

use super::interactive::settings;

/// Arguments for the `keys` command.
#[derive(Args, Debug)]
pub struct KeysArgs {
    #[command(subcommand)]
    pub command: KeysCommand,
}

/// Subcommands for key management.
#[derive(Subcommand, Debug)]
pub enum KeysCommand {
    /// Show which keys are set (masked)
    Show,

    /// Show the credentials file path
    Path,

    /// Set one or both keys; prompts for any key not given as a flag
    Set {
        /// Google Gemini API key (image editing)
        #[arg(long)]
        edit_key: Option<String>,

        /// OpenRouter API key (image description)
        #[arg(long)]
        describe_key: Option<String>,
    },

    /// Remove both keys
    Clear,
}

/// Execute the keys command.
pub fn execute(args: KeysArgs, config: &Config) -> anyhow::Result<()> {
    let store = CredentialStore::new(FileStore::new(config.credentials_path()));

    match args.command {
        KeysCommand::Show => {
            let creds = store.load();
            println!("Google Gemini: {}", mask_key(&creds.edit_key));
            println!("OpenRouter:    {}", mask_key(&creds.describe_key));
        }

        KeysCommand::Path => {
            println!("{}", store.store().path().display());
        }

        KeysCommand::Set {
            edit_key,
            describe_key,
        } => {
            let current = store.load();
            let updated = if edit_key.is_none() && describe_key.is_none() {
                match settings::prompt_keys(&current)? {
                    Some(updated) => updated,
                    None => return Ok(()),
                }
            } else {
                merge_keys(&current, edit_key, describe_key)
            };
            store.save(&updated)?;
            println!("Keys saved to {}", store.store().path().display());
        }

        KeysCommand::Clear => {
            store.save(&Credentials::default())?;
            println!("Keys cleared.");
        }
    }

    Ok(())
}

/// Apply flag values over the stored keys; absent flags keep the old value.
fn merge_keys(
    current: &Credentials,
    edit_key: Option<String>,
    describe_key: Option<String>,
) -> Credentials {
    Credentials {
        edit_key: edit_key
            .map(|k| k.trim().to_string())
            .unwrap_or_else(|| current.edit_key.clone()),
        describe_key: describe_key
            .map(|k| k.trim().to_string())
            .unwrap_or_else(|| current.describe_key.clone()),
    }
}
