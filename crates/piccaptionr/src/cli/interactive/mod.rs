//! Interactive CLI mode: guided experience for bare `piccaptionr` invocation.
//!
//! When `piccaptionr` is invoked with no subcommand on a TTY, this module
//! provides a menu-driven interface that ends in the same run as the
//! `caption` command.

pub mod caption;
pub mod setup;
pub mod theme;

use console::Style;
use dialoguer::Select;
use piccaptionr_core::{Config, ProviderSettings};

/// Convert a dialoguer result into `Ok(Some(value))` on success, `Ok(None)` on
/// interrupt (Ctrl+C / terminal disconnect), and `Err` for other I/O failures.
///
/// Use this to wrap `interact_text()` / `interact()` calls that lack an `_opt`
/// variant, so interrupts exit the current flow cleanly instead of panicking.
fn handle_interrupt<T>(result: dialoguer::Result<T>) -> anyhow::Result<Option<T>> {
    match result {
        Ok(v) => Ok(Some(v)),
        Err(dialoguer::Error::IO(e)) if e.kind() == std::io::ErrorKind::Interrupted => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Main menu options presented to the user.
const MENU_ITEMS: &[&str] = &["Caption a picture folder", "Show configuration", "Exit"];

/// Entry point for interactive mode.
pub async fn run(config: &Config) -> anyhow::Result<()> {
    theme::print_banner();

    let theme = theme::piccaptionr_theme();

    loop {
        let selection = Select::with_theme(&theme)
            .with_prompt("What would you like to do?")
            .items(MENU_ITEMS)
            .default(0)
            .interact_opt()?;

        match selection {
            Some(0) => caption::guided_caption(config).await?,
            Some(1) => show_config(config),
            _ => break, // Exit, Esc or Ctrl+C
        }
    }

    Ok(())
}

/// Summary of the effective configuration, without secrets.
fn show_config(config: &Config) {
    let dim = Style::new().for_stderr().dim();
    let cyan = Style::new().for_stderr().cyan();
    let label = Style::new().for_stderr().bold();

    eprintln!();
    eprintln!("  {}", cyan.apply_to("Current configuration:"));
    eprintln!();

    let config_path = Config::default_path();
    let path_note = if config_path.exists() {
        "(exists)"
    } else {
        "(using defaults)"
    };

    eprintln!(
        "    {:<20} {} {}",
        label.apply_to("Config file:"),
        config_path.display(),
        dim.apply_to(path_note)
    );
    eprintln!(
        "    {:<20} {}",
        label.apply_to("Provider:"),
        provider_summary(config)
    );
    eprintln!(
        "    {:<20} {} (offered: {})",
        label.apply_to("Language:"),
        config.general.language,
        config.general.languages.join(", ")
    );
    eprintln!(
        "    {:<20} {}x{} px",
        label.apply_to("Upload size:"),
        config.image.width,
        config.image.height
    );
    eprintln!(
        "    {:<20} {}-<timestamp>.txt",
        label.apply_to("Output file:"),
        config.general.output_prefix
    );
    eprintln!(
        "    {:<20} {}",
        label.apply_to("Log level:"),
        config.logging.level
    );
    eprintln!();
}

/// "OpenAI (gpt-4o-mini), key found" style one-liner.
fn provider_summary(config: &Config) -> String {
    let Some(provider) = piccaptionr_core::Provider::parse(&config.llm.provider) else {
        return format!("unknown ({})", config.llm.provider);
    };
    let settings = ProviderSettings::from_config(provider, &config.llm);
    let key = match &settings {
        ProviderSettings::OpenAi { api_key, .. } | ProviderSettings::AzureOpenAi { api_key, .. } => {
            if api_key.is_empty() {
                "no key"
            } else {
                "key found"
            }
        }
    };
    format!(
        "{} ({}), {}",
        provider.label(),
        settings.model_or_deployment(),
        key
    )
}
