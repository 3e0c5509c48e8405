//! Dialoguer theme and banner for guided mode.

use console::{style, Style};
use dialoguer::theme::ColorfulTheme;

/// Returns the `ColorfulTheme` used by every guided prompt.
///
/// - Prompt prefix: cyan `?`
/// - Active item indicator: cyan `▸`
/// - Success prefix: green `✓`
/// - Error prefix: red `✗`
pub fn piccaptionr_theme() -> ColorfulTheme {
    ColorfulTheme {
        prompt_prefix: style("?".to_string()).for_stderr().cyan(),
        prompt_style: Style::new().for_stderr().bold(),
        prompt_suffix: style("›".to_string()).for_stderr().bright().black(),
        active_item_prefix: style("▸".to_string()).for_stderr().cyan(),
        active_item_style: Style::new().for_stderr().cyan(),
        success_prefix: style("✓".to_string()).for_stderr().green(),
        success_suffix: style("·".to_string()).for_stderr().bright().black(),
        error_prefix: style("✗".to_string()).for_stderr().red(),
        error_style: Style::new().for_stderr().red(),
        values_style: Style::new().for_stderr().green(),
        ..ColorfulTheme::default()
    }
}

/// Prints the PicCaptionr banner to stderr.
pub fn print_banner() {
    let version_line = format!("PicCaptionr v{}", piccaptionr_core::VERSION);
    let tagline = "Photo captions from a vision LLM";

    let inner_width = banner_width(&[&version_line, tagline]);

    let top = format!("  ╔{:═<width$}╗", "", width = inner_width);
    let mid1 = format!("  ║{:^width$}║", version_line, width = inner_width);
    let mid2 = format!("  ║{:^width$}║", tagline, width = inner_width);
    let bot = format!("  ╚{:═<width$}╝", "", width = inner_width);

    let magenta = Style::new().for_stderr().magenta();

    eprintln!();
    eprintln!("{}", magenta.apply_to(&top));
    eprintln!("{}", magenta.apply_to(&mid1));
    eprintln!("{}", magenta.apply_to(&mid2));
    eprintln!("{}", magenta.apply_to(&bot));
    eprintln!();
}

/// Widest line plus two columns of padding on each side.
fn banner_width(lines: &[&str]) -> usize {
    lines.iter().map(|l| l.chars().count()).max().unwrap_or(0) + 4
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn banner_fits_longest_line() {
        assert_eq!(banner_width(&["abc", "abcdef"]), 10);
        assert_eq!(banner_width(&[]), 4);
    }
}
