//! One-shot `retouch edit` and `retouch describe` commands.
//!
//! Both go through the same `Session` as the interactive mode, so guards and
//! error messages are identical.

use clap::{Args, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use retouch_core::{Config, CredentialStore, FileStore, ImageAsset, Session};
use std::future::Future;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// How results are printed to stdout.
#[derive(Clone, Copy, Debug, Default, ValueEnum)]
pub enum OutputFormat {
    /// Plain text
    #[default]
    Text,
    /// A single JSON object
    Json,
}

/// Arguments for the `edit` command.
#[derive(Args, Debug)]
pub struct EditArgs {
    /// Image to edit (PNG, JPEG or GIF)
    pub input: PathBuf,

    /// What to change, in plain language
    #[arg(short, long)]
    pub prompt: String,

    /// Where to write the edited image (defaults to `<input>-edited.<ext>`)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

/// Arguments for the `describe` command.
#[derive(Args, Debug)]
pub struct DescribeArgs {
    /// Image to describe (PNG, JPEG or GIF)
    pub input: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

/// Run `future` with a spinner on stderr.
pub(crate) async fn with_spinner<F: Future>(message: &str, future: F) -> F::Output {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("{spinner:.green} {msg} [{elapsed}]")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    let output = future.await;
    pb.finish_and_clear();
    output
}

/// Default location for an edited image: next to the input.
pub(crate) fn default_output_path(input: &Path, extension: &str) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_string());
    input.with_file_name(format!("{stem}-edited.{extension}"))
}

/// Build a session with stored keys and the image at `input` acquired.
async fn open_session(input: &Path, config: &Config) -> anyhow::Result<Session> {
    let store = CredentialStore::new(FileStore::new(config.credentials_path()));
    let mut session = Session::from_config(config, store.load());
    let image = ImageAsset::load(input, config.max_file_size_bytes()).await?;
    session.acquire_image(image);
    Ok(session)
}

/// Turn a refused or failed request into a CLI error.
fn session_failure(session: &mut Session) -> anyhow::Error {
    let message = session.error().unwrap_or("Request failed.").to_string();
    if session.take_settings_request() {
        anyhow::anyhow!("{message}\n  Run `retouch keys set` to add it.")
    } else {
        anyhow::anyhow!(message)
    }
}

/// Execute the edit command.
pub async fn edit(args: EditArgs, config: &Config) -> anyhow::Result<()> {
    let mut session = open_session(&args.input, config).await?;
    session.set_instruction(args.prompt);

    let Some(flight) = session.begin_edit() else {
        return Err(session_failure(&mut session));
    };
    let result = with_spinner("Editing image...", flight.run()).await;
    session.finish_edit(result);

    let Some(edited) = session.edited() else {
        return Err(session_failure(&mut session));
    };

    let output = args
        .output
        .unwrap_or_else(|| default_output_path(&args.input, edited.file_extension()));
    edited.save(&output).await?;

    match args.format {
        OutputFormat::Text => {
            println!("{}", output.display());
            if let Some(note) = &edited.note {
                println!("{note}");
            }
        }
        OutputFormat::Json => {
            let mut record = serde_json::to_value(edited)?;
            record["output"] = serde_json::Value::String(output.display().to_string());
            println!("{}", serde_json::to_string(&record)?);
        }
    }
    Ok(())
}

/// Execute the describe command.
pub async fn describe(args: DescribeArgs, config: &Config) -> anyhow::Result<()> {
    let mut session = open_session(&args.input, config).await?;

    let Some(flight) = session.begin_describe() else {
        return Err(session_failure(&mut session));
    };
    let result = with_spinner("Describing image...", flight.run()).await;
    session.finish_describe(result);

    let Some(description) = session.description() else {
        return Err(session_failure(&mut session));
    };

    match args.format {
        OutputFormat::Text => println!("{description}"),
        OutputFormat::Json => {
            let name = session.image().map(|i| i.name()).unwrap_or_default();
            let record = serde_json::json!({ "image": name, "description": description });
            println!("{}", serde_json::to_string(&record)?);
        }
    }
    Ok(())
}
