//! API key settings: prompt for new keys and persist them.

use console::Style;
use dialoguer::{Password, Select};
use retouch_core::credentials::mask_key;
use retouch_core::{CredentialStore, Credentials, FileStore, Session};

use super::theme::retouch_theme;

/// Ask for both keys. Leaving a prompt empty keeps the current value.
///
/// Returns `None` if the user cancels.
pub fn prompt_keys(current: &Credentials) -> anyhow::Result<Option<Credentials>> {
    let theme = retouch_theme();
    let dim = Style::new().for_stderr().dim();

    eprintln!(
        "  {}",
        dim.apply_to("Keys are stored locally and sent only to their provider.")
    );

    let Some(edit_key) = prompt_one("Google Gemini API key", &current.edit_key, &theme)? else {
        return Ok(None);
    };
    let Some(describe_key) = prompt_one("OpenRouter API key", &current.describe_key, &theme)?
    else {
        return Ok(None);
    };

    Ok(Some(Credentials {
        edit_key,
        describe_key,
    }))
}

fn prompt_one(
    label: &str,
    current: &str,
    theme: &dialoguer::theme::ColorfulTheme,
) -> anyhow::Result<Option<String>> {
    let Some(entered) = super::handle_interrupt(
        Password::with_theme(theme)
            .with_prompt(format!("{label} [{}] (Enter to keep)", mask_key(current)))
            .allow_empty_password(true)
            .interact(),
    )?
    else {
        return Ok(None);
    };
    Ok(Some(keep_if_blank(&entered, current)))
}

fn keep_if_blank(entered: &str, current: &str) -> String {
    let trimmed = entered.trim();
    if trimmed.is_empty() {
        current.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Settings screen: update keys, or clear them.
pub fn edit_settings(
    session: &mut Session,
    store: &CredentialStore<FileStore>,
) -> anyhow::Result<()> {
    let theme = retouch_theme();
    let warn = Style::new().for_stderr().yellow();
    let dim = Style::new().for_stderr().dim();

    let items = &["Update API keys", "Clear both keys", "Back"];
    let choice = Select::with_theme(&theme)
        .with_prompt("API key settings")
        .items(items)
        .default(0)
        .interact_opt()?;

    let updated = match choice {
        Some(0) => match prompt_keys(session.credentials())? {
            Some(updated) => updated,
            None => return Ok(()),
        },
        Some(1) => Credentials::default(),
        _ => return Ok(()),
    };

    match session.save_credentials(updated, store) {
        Ok(()) => eprintln!(
            "  {}",
            dim.apply_to(format!("Keys saved to {}", store.store().path().display()))
        ),
        Err(e) => eprintln!("  {}", warn.apply_to(format!("{e}"))),
    }
    Ok(())
}
