//! Provider setup: host, credentials, and model or deployment.
//!
//! Answers live for this session only; nothing is written back to the
//! config file.

use console::Style;
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Input, Password, Select};
use piccaptionr_core::config::{is_http_url, KNOWN_OPENAI_MODELS};
use piccaptionr_core::{Config, Provider, ProviderSettings};

use super::handle_interrupt;

/// Host choices in menu order.
const HOSTS: &[Provider] = &[Provider::OpenAi, Provider::AzureOpenAi];

/// Guide the user through host, credentials and model selection.
///
/// Config values (including `${ENV}` references that resolve) are offered as
/// defaults. Returns `None` if the user cancels.
pub fn select_provider(
    config: &Config,
    theme: &ColorfulTheme,
) -> anyhow::Result<Option<ProviderSettings>> {
    let labels: Vec<&str> = HOSTS.iter().map(Provider::label).collect();
    let default_host = Provider::parse(&config.llm.provider)
        .and_then(|p| HOSTS.iter().position(|h| *h == p))
        .unwrap_or(0);

    let Some(choice) = Select::with_theme(theme)
        .with_prompt("Which AI host do you want to use?")
        .items(&labels)
        .default(default_host)
        .interact_opt()?
    else {
        return Ok(None);
    };

    let defaults = ProviderSettings::from_config(HOSTS[choice], &config.llm);
    let settings = match defaults {
        ProviderSettings::OpenAi {
            api_key, endpoint, ..
        } => {
            let Some(api_key) = prompt_key("OpenAI API key", "OPENAI_API_KEY", &api_key, theme)?
            else {
                return Ok(None);
            };
            let Some(model) = select_openai_model(&config.llm.openai.model, theme)? else {
                return Ok(None);
            };
            ProviderSettings::OpenAi {
                api_key,
                model,
                endpoint,
            }
        }
        ProviderSettings::AzureOpenAi {
            endpoint,
            api_key,
            deployment,
            api_version,
        } => {
            let Some(endpoint) = prompt_endpoint(&endpoint, theme)? else {
                return Ok(None);
            };
            let Some(api_key) = prompt_key(
                "Azure OpenAI API key",
                "AZURE_OPENAI_API_KEY",
                &api_key,
                theme,
            )?
            else {
                return Ok(None);
            };
            let Some(deployment) = prompt_non_empty("Deployment name", &deployment, theme)? else {
                return Ok(None);
            };
            ProviderSettings::AzureOpenAi {
                endpoint,
                api_key,
                deployment,
                api_version,
            }
        }
    };

    Ok(Some(settings))
}

/// Use a key already resolved from env/config, or ask for one.
fn prompt_key(
    label: &str,
    env_var: &str,
    existing: &str,
    theme: &ColorfulTheme,
) -> anyhow::Result<Option<String>> {
    let dim = Style::new().for_stderr().dim();
    let warn = Style::new().for_stderr().yellow();

    if !existing.trim().is_empty() {
        eprintln!(
            "  {}",
            dim.apply_to(format!("Using existing API key from {env_var} / config"))
        );
        return Ok(Some(existing.to_string()));
    }

    eprintln!("  {}", warn.apply_to(format!("{env_var} not set.")));
    let key = handle_interrupt(
        Password::with_theme(theme)
            .with_prompt(format!("Enter your {label} (Esc to cancel)"))
            .allow_empty_password(true)
            .interact(),
    )?;
    Ok(key
        .map(|k| k.trim().to_string())
        .filter(|k| !k.is_empty()))
}

fn prompt_endpoint(default: &str, theme: &ColorfulTheme) -> anyhow::Result<Option<String>> {
    let mut input = Input::<String>::with_theme(theme)
        .with_prompt("Azure OpenAI endpoint (https://<resource>.openai.azure.com)")
        .validate_with(|value: &String| -> Result<(), &str> {
            if is_http_url(value) {
                Ok(())
            } else {
                Err("Please enter a valid http(s) URL")
            }
        });
    if !default.is_empty() {
        input = input.default(default.to_string());
    }
    Ok(handle_interrupt(input.interact_text())?.map(|s| s.trim().to_string()))
}

fn prompt_non_empty(
    prompt: &str,
    default: &str,
    theme: &ColorfulTheme,
) -> anyhow::Result<Option<String>> {
    let mut input = Input::<String>::with_theme(theme).with_prompt(prompt);
    if !default.is_empty() {
        input = input.default(default.to_string());
    }
    let value = handle_interrupt(input.interact_text())?;
    Ok(value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty()))
}

/// Known models plus a custom entry; the configured model is preselected.
fn select_openai_model(
    configured: &str,
    theme: &ColorfulTheme,
) -> anyhow::Result<Option<String>> {
    let (items, default) = model_menu(configured);

    let Some(choice) = Select::with_theme(theme)
        .with_prompt("OpenAI model")
        .items(&items)
        .default(default)
        .interact_opt()?
    else {
        return Ok(None);
    };

    match KNOWN_OPENAI_MODELS.get(choice) {
        Some(model) => Ok(Some(model.to_string())),
        None => prompt_non_empty("Model name", "", theme),
    }
}

fn model_menu(configured: &str) -> (Vec<String>, usize) {
    let mut items: Vec<String> = KNOWN_OPENAI_MODELS.iter().map(|m| m.to_string()).collect();
    items.push("Custom model name...".to_string());
    let default = KNOWN_OPENAI_MODELS
        .iter()
        .position(|m| *m == configured)
        .unwrap_or(0);
    (items, default)
}
