//! Interactive CLI mode: guided session for bare `retouch` invocation.
//!
//! Shows the current image, instruction, results and error banner, then
//! offers the actions that make sense in the current state. All state lives
//! in a `retouch_core::Session`; this module only renders it and forwards
//! user choices.

pub mod settings;
pub mod theme;

use console::Style;
use dialoguer::{Confirm, Input, Select};
use retouch_core::{Config, CredentialStore, FileStore, ImageAsset, Session, SessionState};
use std::path::{Path, PathBuf};

use crate::cli::run::{default_output_path, with_spinner};

/// Convert a dialoguer result into `Ok(Some(value))` on success, `Ok(None)` on
/// interrupt (Ctrl+C / terminal disconnect), and `Err` for other I/O failures.
fn handle_interrupt<T>(result: dialoguer::Result<T>) -> anyhow::Result<Option<T>> {
    match result {
        Ok(v) => Ok(Some(v)),
        Err(dialoguer::Error::IO(e)) if e.kind() == std::io::ErrorKind::Interrupted => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Actions offered in the main menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    ChooseImage,
    SetInstruction,
    Edit,
    Describe,
    EditAndDescribe,
    SaveEdited,
    DismissError,
    Clear,
    Settings,
    Exit,
}

impl Action {
    fn label(self) -> &'static str {
        match self {
            Action::ChooseImage => "Choose image",
            Action::SetInstruction => "Set instruction",
            Action::Edit => "Edit image",
            Action::Describe => "Describe image",
            Action::EditAndDescribe => "Edit and describe together",
            Action::SaveEdited => "Save edited image",
            Action::DismissError => "Dismiss error",
            Action::Clear => "Clear session",
            Action::Settings => "API key settings",
            Action::Exit => "Exit",
        }
    }
}

/// Actions that make sense for the current session.
fn available_actions(session: &Session) -> Vec<Action> {
    let mut actions = Vec::new();
    if session.error().is_some() {
        actions.push(Action::DismissError);
    }
    actions.push(Action::ChooseImage);
    if session.image().is_some() {
        actions.push(Action::SetInstruction);
        actions.push(Action::Edit);
        actions.push(Action::Describe);
        actions.push(Action::EditAndDescribe);
        if session.edited().is_some() {
            actions.push(Action::SaveEdited);
        }
        actions.push(Action::Clear);
    }
    actions.push(Action::Settings);
    actions.push(Action::Exit);
    actions
}

/// Entry point for interactive mode.
pub async fn run(config: &Config) -> anyhow::Result<()> {
    theme::print_banner();

    let theme = theme::retouch_theme();
    let store = CredentialStore::new(FileStore::new(config.credentials_path()));
    let mut session = Session::from_config(config, store.load());

    if !session.credentials().has_edit_key() && !session.credentials().has_describe_key() {
        let dim = Style::new().for_stderr().dim();
        eprintln!(
            "  {}",
            dim.apply_to("No API keys found. Open \"API key settings\" to add them.")
        );
    }

    loop {
        render(&session);

        let actions = available_actions(&session);
        let labels: Vec<&str> = actions.iter().map(|a| a.label()).collect();
        let selection = Select::with_theme(&theme)
            .with_prompt("What would you like to do?")
            .items(&labels)
            .default(0)
            .interact_opt()?;

        let Some(action) = selection.and_then(|i| actions.get(i).copied()) else {
            break; // Esc or Ctrl+C
        };

        match action {
            Action::ChooseImage => choose_image(&mut session, config).await?,
            Action::SetInstruction => set_instruction(&mut session)?,
            Action::Edit => {
                if let Some(flight) = session.begin_edit() {
                    let result = with_spinner("Editing image...", flight.run()).await;
                    session.finish_edit(result);
                }
            }
            Action::Describe => {
                if let Some(flight) = session.begin_describe() {
                    let result = with_spinner("Describing image...", flight.run()).await;
                    session.finish_describe(result);
                }
            }
            Action::EditAndDescribe => edit_and_describe(&mut session).await,
            Action::SaveEdited => save_edited(&session).await?,
            Action::DismissError => session.dismiss_error(),
            Action::Clear => session.clear(),
            Action::Settings => settings::edit_settings(&mut session, &store)?,
            Action::Exit => break,
        }

        if session.take_settings_request() {
            let open = Confirm::with_theme(&theme)
                .with_prompt("Open API key settings now?")
                .default(true)
                .interact_opt()?;
            if open == Some(true) {
                settings::edit_settings(&mut session, &store)?;
            }
        }
    }

    Ok(())
}

/// Print the session summary and error banner to stderr.
fn render(session: &Session) {
    let label = Style::new().for_stderr().bold();
    let dim = Style::new().for_stderr().dim();
    let red = Style::new().for_stderr().red();
    let green = Style::new().for_stderr().green();

    let status = match session.state() {
        SessionState::NoImage => "waiting for an image",
        SessionState::Idle => "ready",
        SessionState::Busy { editing: true, describing: true } => "editing and describing",
        SessionState::Busy { editing: true, .. } => "editing",
        SessionState::Busy { .. } => "describing",
        SessionState::Error(_) => "error",
    };

    eprintln!();
    eprintln!("    {:<14} {}", label.apply_to("Status:"), dim.apply_to(status));
    match session.image() {
        Some(image) => eprintln!(
            "    {:<14} {} {}",
            label.apply_to("Image:"),
            image.name(),
            dim.apply_to(format!(
                "({}, {:.1} KB)",
                image.mime_type(),
                image.bytes().len() as f64 / 1024.0
            ))
        ),
        None => eprintln!("    {:<14} {}", label.apply_to("Image:"), dim.apply_to("none")),
    }
    if session.image().is_some() {
        let instruction = if session.instruction().trim().is_empty() {
            dim.apply_to("(not set)".to_string())
        } else {
            Style::new().apply_to(session.instruction().to_string())
        };
        eprintln!("    {:<14} {}", label.apply_to("Instruction:"), instruction);
    }
    if let Some(edited) = session.edited() {
        eprintln!(
            "    {:<14} {} {}",
            label.apply_to("Edited:"),
            green.apply_to("ready"),
            dim.apply_to(format!("({})", edited.mime_type))
        );
        if let Some(note) = &edited.note {
            eprintln!("    {:<14} {}", "", dim.apply_to(note));
        }
    }
    if let Some(description) = session.description() {
        eprintln!("    {}", label.apply_to("Description:"));
        for line in description.lines() {
            eprintln!("      {line}");
        }
    }
    if let Some(message) = session.error() {
        eprintln!();
        eprintln!("  {} {}", red.apply_to("✗ Error:"), red.apply_to(message));
    }
    eprintln!();
}

async fn choose_image(session: &mut Session, config: &Config) -> anyhow::Result<()> {
    let theme = theme::retouch_theme();
    let warn = Style::new().for_stderr().yellow();

    loop {
        let Some(raw_path) = handle_interrupt(
            Input::<String>::with_theme(&theme)
                .with_prompt("Path to image (PNG, JPEG or GIF)")
                .interact_text(),
        )?
        else {
            return Ok(());
        };

        let path = PathBuf::from(shellexpand::tilde(raw_path.trim()).into_owned());
        match ImageAsset::load(&path, config.max_file_size_bytes()).await {
            Ok(image) => {
                session.acquire_image(image);
                return Ok(());
            }
            Err(e) => eprintln!("  {}", warn.apply_to(e.to_string())),
        }
    }
}

fn set_instruction(session: &mut Session) -> anyhow::Result<()> {
    let theme = theme::retouch_theme();
    let Some(instruction) = handle_interrupt(
        Input::<String>::with_theme(&theme)
            .with_prompt("Instruction (e.g. \"add a hat\")")
            .with_initial_text(session.instruction())
            .allow_empty(true)
            .interact_text(),
    )?
    else {
        return Ok(());
    };
    session.set_instruction(instruction);
    Ok(())
}

/// Start both flights, then await them together.
///
/// A refused edit stops here so its guard message stays on screen.
async fn edit_and_describe(session: &mut Session) {
    let Some(edit) = session.begin_edit() else {
        return;
    };
    let describe = session.begin_describe();

    let (edit_result, describe_result) = with_spinner("Editing and describing...", async {
        tokio::join!(
            edit.run(),
            async {
                match describe {
                    Some(flight) => Some(flight.run().await),
                    None => None,
                }
            },
        )
    })
    .await;

    session.finish_edit(edit_result);
    if let Some(result) = describe_result {
        session.finish_describe(result);
    }
}

async fn save_edited(session: &Session) -> anyhow::Result<()> {
    let Some(edited) = session.edited() else {
        return Ok(());
    };
    let theme = theme::retouch_theme();
    let dim = Style::new().for_stderr().dim();

    let default = session
        .image()
        .map(|image| default_output_path(Path::new(image.name()), edited.file_extension()))
        .unwrap_or_else(|| PathBuf::from(format!("edited.{}", edited.file_extension())));

    let Some(raw_path) = handle_interrupt(
        Input::<String>::with_theme(&theme)
            .with_prompt("Save to")
            .default(default.display().to_string())
            .interact_text(),
    )?
    else {
        return Ok(());
    };

    let path = PathBuf::from(shellexpand::tilde(raw_path.trim()).into_owned());
    edited.save(&path).await?;
    eprintln!("  {}", dim.apply_to(format!("Saved to {}", path.display())));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use retouch_core::Credentials;

    fn session() -> Session {
        Session::from_config(&Config::default(), Credentials::default())
    }

    #[test]
    fn empty_session_offers_image_settings_exit() {
        assert_eq!(
            available_actions(&session()),
            vec![Action::ChooseImage, Action::Settings, Action::Exit]
        );
    }

    #[test]
    fn image_unlocks_edit_actions() {
        let mut session = session();
        session.acquire_image(
            ImageAsset::from_bytes(vec![0xFF, 0xD8, 0xFF, 0xE0, 0, 0, 0, 0], "cat.jpg").unwrap(),
        );
        let actions = available_actions(&session);
        assert!(actions.contains(&Action::Edit));
        assert!(actions.contains(&Action::Describe));
        assert!(!actions.contains(&Action::SaveEdited));
    }

    #[test]
    fn error_offers_dismiss_first() {
        let mut session = session();
        // No image, so the edit request is refused with an error.
        assert!(session.begin_edit().is_none());
        let actions = available_actions(&session);
        assert_eq!(actions[0], Action::DismissError);
    }
}
