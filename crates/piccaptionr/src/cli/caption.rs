//! The `piccaptionr caption` command.

use clap::{Args, ValueEnum};
use console::Style;
use piccaptionr_core::config::expand_path;
use piccaptionr_core::{
    AbortReason, Config, Pipeline, Provider, ProviderSettings, RunConfiguration, RunOutcome,
    RunSummary,
};
use std::path::PathBuf;

use super::progress::ConsoleProgress;

/// Vision endpoint to use.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ProviderArg {
    /// OpenAI API
    Openai,
    /// Azure OpenAI resource
    AzureOpenai,
}

impl From<ProviderArg> for Provider {
    fn from(arg: ProviderArg) -> Self {
        match arg {
            ProviderArg::Openai => Provider::OpenAi,
            ProviderArg::AzureOpenai => Provider::AzureOpenAi,
        }
    }
}

/// Arguments for the `caption` command.
#[derive(Args, Debug)]
pub struct CaptionArgs {
    /// Folder containing the pictures (searched recursively)
    #[arg(required = true)]
    pub source: PathBuf,

    /// Folder for the result file (defaults to the source folder)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Vision provider (defaults to `llm.provider` from the config file)
    #[arg(short, long, value_enum)]
    pub provider: Option<ProviderArg>,

    /// OpenAI model name
    #[arg(short, long)]
    pub model: Option<String>,

    /// API key (defaults to OPENAI_API_KEY / AZURE_OPENAI_API_KEY via the config file)
    #[arg(long)]
    pub api_key: Option<String>,

    /// API endpoint (OpenAI base URL or Azure resource URL)
    #[arg(long)]
    pub endpoint: Option<String>,

    /// Azure OpenAI deployment name
    #[arg(long)]
    pub deployment: Option<String>,

    /// Caption language
    #[arg(short, long)]
    pub language: Option<String>,

    /// Extra information added to every prompt (trip, event, people)
    #[arg(short, long)]
    pub context: Option<String>,

    /// Upload width in pixels
    #[arg(long)]
    pub width: Option<u32>,

    /// Upload height in pixels
    #[arg(long)]
    pub height: Option<u32>,
}

/// Execute the caption command.
pub async fn execute(args: CaptionArgs, config: &Config) -> anyhow::Result<()> {
    let run = build_run_config(&args, config)?;
    run_pipeline(&run).await
}

/// Merge CLI flags over config defaults.
pub fn build_run_config(args: &CaptionArgs, config: &Config) -> anyhow::Result<RunConfiguration> {
    let provider = match args.provider {
        Some(arg) => Provider::from(arg),
        None => Provider::parse(&config.llm.provider).ok_or_else(|| {
            anyhow::anyhow!(
                "Unknown provider in config: {:?}\n\n  Hint: use \"openai\" or \"azure-openai\".",
                config.llm.provider
            )
        })?,
    };

    let source = expand_path(&args.source.to_string_lossy());
    let output = args
        .output
        .as_ref()
        .map(|p| expand_path(&p.to_string_lossy()))
        .unwrap_or_else(|| source.clone());

    let mut run = RunConfiguration::from_config(config, provider, source, output);
    apply_provider_overrides(&mut run.provider, args);

    if let Some(language) = &args.language {
        run.target_language = language.trim().to_string();
    }
    run.additional_context = args
        .context
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string);
    if let Some(width) = args.width {
        run.image_width = width;
    }
    if let Some(height) = args.height {
        run.image_height = height;
    }

    Ok(run)
}

fn apply_provider_overrides(settings: &mut ProviderSettings, args: &CaptionArgs) {
    let set = |field: &mut String, value: &Option<String>| {
        if let Some(v) = value {
            *field = v.trim().to_string();
        }
    };

    match settings {
        ProviderSettings::OpenAi {
            api_key,
            model,
            endpoint,
        } => {
            set(api_key, &args.api_key);
            set(model, &args.model);
            set(endpoint, &args.endpoint);
            if args.deployment.is_some() {
                tracing::warn!("--deployment is only used with --provider azure-openai");
            }
        }
        ProviderSettings::AzureOpenAi {
            endpoint,
            api_key,
            deployment,
            ..
        } => {
            set(endpoint, &args.endpoint);
            set(api_key, &args.api_key);
            set(deployment, &args.deployment);
            if args.model.is_some() {
                tracing::warn!("--model is ignored for Azure OpenAI; use --deployment");
            }
        }
    }
}

/// Run the pipeline with a console progress display and report the outcome.
pub async fn run_pipeline(run: &RunConfiguration) -> anyhow::Result<()> {
    tracing::debug!("Run configuration: {:?}", run);

    let progress = ConsoleProgress::new();
    let outcome = Pipeline::with_defaults().run(run, &progress).await;
    progress.finish();

    match outcome? {
        RunOutcome::Completed(summary) => {
            print_summary(&summary);
            if let Some(path) = &summary.output_file {
                // stdout carries only the result path, for scripting
                println!("{}", path.display());
            }
            Ok(())
        }
        RunOutcome::Aborted(reason) => Err(abort_error(reason, run)),
    }
}

fn abort_error(reason: AbortReason, run: &RunConfiguration) -> anyhow::Error {
    match reason {
        AbortReason::IncompleteConfiguration => anyhow::anyhow!(
            "Configuration is incomplete.\n\n  Hint: pass --api-key (or set the key's environment \
             variable) and, for Azure OpenAI, --endpoint and --deployment."
        ),
        AbortReason::SourceFolderMissing => anyhow::anyhow!(
            "Picture folder does not exist: {:?}\n\n  Hint: Check the folder path and try again.",
            run.source_folder
        ),
        AbortReason::NoImagesFound => anyhow::anyhow!(
            "No .jpg, .jpeg, .png, .gif or .bmp files found in {:?}",
            run.source_folder
        ),
    }
}

/// Print a formatted summary after the run.
fn print_summary(summary: &RunSummary) {
    let green = Style::new().for_stderr().green();
    let red = Style::new().for_stderr().red();

    eprintln!();
    eprintln!("  ====================================");
    eprintln!("               Summary");
    eprintln!("  ====================================");
    eprintln!(
        "    Captioned:    {}",
        green.apply_to(format!("{:>8}", summary.succeeded))
    );
    if summary.failed > 0 {
        eprintln!(
            "    Failed:       {}",
            red.apply_to(format!("{:>8}", summary.failed))
        );
    }
    match &summary.output_file {
        Some(path) => eprintln!("    Output:       {}", path.display()),
        None => eprintln!("    Output:       (nothing written)"),
    }
    eprintln!("  ====================================");
    eprintln!();
}
