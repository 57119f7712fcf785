//! Prompt theme and banner for interactive mode.

use console::{style, Style};
use dialoguer::theme::ColorfulTheme;

/// Cyan accents; errors in red so the error banner and prompt errors match.
pub fn retouch_theme() -> ColorfulTheme {
    let accent = Style::new().for_stderr().cyan();
    ColorfulTheme {
        prompt_prefix: style("◆".to_string()).for_stderr().cyan(),
        prompt_style: Style::new().for_stderr().bold(),
        prompt_suffix: style(":".to_string()).for_stderr().dim(),
        active_item_prefix: style("→".to_string()).for_stderr().cyan(),
        active_item_style: accent.clone(),
        inactive_item_prefix: style(" ".to_string()).for_stderr(),
        success_prefix: style("◇".to_string()).for_stderr().cyan(),
        success_suffix: style(":".to_string()).for_stderr().dim(),
        error_prefix: style("✗".to_string()).for_stderr().red(),
        error_style: Style::new().for_stderr().red(),
        values_style: accent,
        ..ColorfulTheme::default()
    }
}

/// Title line with version, then a rule as wide as the title.
pub fn print_banner() {
    let title = format!(
        "retouch {}  ·  edit and describe images with AI",
        retouch_core::VERSION
    );
    let rule = "─".repeat(title.chars().count());
    let cyan = Style::new().for_stderr().cyan();

    eprintln!();
    eprintln!("  {}", cyan.apply_to(&title).bold());
    eprintln!("  {}", cyan.apply_to(rule).dim());
}
