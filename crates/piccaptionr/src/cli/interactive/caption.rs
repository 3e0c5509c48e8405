//! Guided captioning flow.
//!
//! Walks the user through: AI host → credentials → model → picture folder →
//! output folder → language → additional information → confirmation. Builds a
//! `RunConfiguration` and delegates to `cli::caption::run_pipeline()`.

use console::Style;
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Confirm, Input, Select};
use piccaptionr_core::config::expand_path;
use piccaptionr_core::progress::messages;
use piccaptionr_core::{Config, FileStorage, RunConfiguration, Storage};
use std::path::{Path, PathBuf};

use super::handle_interrupt;
use super::setup::select_provider;
use super::theme::piccaptionr_theme;

/// Walk the user through a full run.
pub async fn guided_caption(config: &Config) -> anyhow::Result<()> {
    let theme = piccaptionr_theme();
    let dim = Style::new().for_stderr().dim();

    // ── Steps 1-3: Host, credentials, model ────────────────────────────────

    let Some(provider) = select_provider(config, &theme)? else {
        return Ok(());
    };

    // ── Step 4: Picture folder ─────────────────────────────────────────────
    // Re-prompts on both "folder not found" and "no images found".

    let (source, count) = loop {
        let Some(raw) = handle_interrupt(
            Input::<String>::with_theme(&theme)
                .with_prompt("Please select the folder containing your pictures")
                .interact_text(),
        )?
        else {
            return Ok(());
        };

        let path = expand_path(&raw);
        match count_images(&path) {
            Ok(0) => warn(messages::NO_PICTURES_FOUND),
            Ok(n) => break (path, n),
            Err(message) => warn(&message),
        }
    };
    eprintln!("  {}", dim.apply_to(format!("Found {count} image(s)")));

    // ── Step 5: Output folder ──────────────────────────────────────────────

    let Some(output) = prompt_output_folder(&source, &theme)? else {
        return Ok(());
    };
    eprintln!("  {}", dim.apply_to(messages::OUTPUT_FOLDER_SELECTED));

    // ── Step 6: Language ───────────────────────────────────────────────────

    let languages = &config.general.languages;
    let default_language = languages
        .iter()
        .position(|l| l.eq_ignore_ascii_case(&config.general.language))
        .unwrap_or(0);
    let Some(language_choice) = Select::with_theme(&theme)
        .with_prompt("Which language should the captions be in?")
        .items(languages)
        .default(default_language)
        .interact_opt()?
    else {
        return Ok(());
    };

    // ── Step 7: Additional information ─────────────────────────────────────

    let Some(context) = handle_interrupt(
        Input::<String>::with_theme(&theme)
            .with_prompt("Additional information for the captions (optional)")
            .allow_empty(true)
            .interact_text(),
    )?
    else {
        return Ok(());
    };

    let mut run = RunConfiguration::from_config(config, provider.provider(), source, output);
    run.provider = provider;
    run.target_language = languages[language_choice].clone();
    run.additional_context = Some(context.trim().to_string()).filter(|c| !c.is_empty());

    // ── Step 8: Confirmation ───────────────────────────────────────────────

    eprintln!();
    let bold = Style::new().for_stderr().bold();
    eprintln!(
        "  {}",
        bold.apply_to(format!("Ready to caption {count} image(s)"))
    );
    eprintln!(
        "  {}",
        dim.apply_to(format!(
            "Host: {} ({}) | Language: {} | Output: {}",
            run.provider.provider().label(),
            run.provider.model_or_deployment(),
            run.target_language,
            run.output_folder.display()
        ))
    );
    eprintln!();

    let confirm = Confirm::with_theme(&theme)
        .with_prompt("Start captioning?")
        .default(true)
        .interact_opt()?;
    if !matches!(confirm, Some(true)) {
        return Ok(());
    }

    if let Err(e) = crate::cli::caption::run_pipeline(&run).await {
        let err = Style::new().for_stderr().red();
        eprintln!("  {} {e:#}", err.apply_to("✗"));
    }

    // ── Post-run menu ──────────────────────────────────────────────────────

    eprintln!();
    let post_items = &["Caption another folder", "Back to main menu"];
    let post_choice = Select::with_theme(&theme)
        .with_prompt("What next?")
        .items(post_items)
        .default(0)
        .interact_opt()?;

    if matches!(post_choice, Some(0)) {
        Box::pin(guided_caption(config)).await?;
    }

    Ok(())
}

/// Number of images under `path`, or a message explaining why it can't be used.
fn count_images(path: &Path) -> Result<usize, String> {
    if !path.is_dir() {
        return Err(format!("{} {}", messages::FOLDER_MISSING, path.display()));
    }
    FileStorage
        .list_images(path)
        .map(|files| files.len())
        .map_err(|e| e.to_string())
}

/// Output folder, defaulting to the picture folder. Created later if missing.
fn prompt_output_folder(
    source: &Path,
    theme: &ColorfulTheme,
) -> anyhow::Result<Option<PathBuf>> {
    let Some(raw) = handle_interrupt(
        Input::<String>::with_theme(theme)
            .with_prompt("Please select the output folder")
            .default(source.display().to_string())
            .interact_text(),
    )?
    else {
        return Ok(None);
    };
    Ok(Some(expand_path(&raw)))
}

fn warn(message: &str) {
    let warn = Style::new().for_stderr().yellow();
    eprintln!("  {}", warn.apply_to(message));
}
