//! PicCaptionr CLI - caption a folder of photos with a vision LLM.
//!
//! Every image under the source folder is sent, together with its EXIF capture
//! date and GPS position, to an OpenAI or Azure OpenAI chat model. The captions
//! are written to one timestamped JSON file per run.
//!
//! # Usage
//!
//! ```bash
//! # Guided mode (on a terminal)
//! piccaptionr
//!
//! # Caption a folder with OpenAI
//! piccaptionr caption ./holiday --language German
//!
//! # Use an Azure OpenAI deployment, write results elsewhere
//! piccaptionr caption ./holiday --provider azure-openai \
//!     --endpoint https://contoso.openai.azure.com --deployment gpt-4o --output ./captions
//!
//! # View configuration
//! piccaptionr config show
//! ```

use std::io::IsTerminal;

use clap::{CommandFactory, Parser, Subcommand};

mod cli;
mod logging;

/// PicCaptionr - Instagram-style captions for your photos, written by a vision LLM.
#[derive(Parser, Debug)]
#[command(name = "piccaptionr")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Caption every image in a folder
    Caption(cli::caption::CaptionArgs),

    /// View configuration
    Config(cli::config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logging isn't initialized yet, so use eprintln for config warnings.
    let config = match piccaptionr_core::Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!(
                "Warning: Failed to load config: {e}\n  \
                 Using default configuration. Check your config file with `piccaptionr config path`."
            );
            piccaptionr_core::Config::default()
        }
    };
    logging::init_from_config(&config, cli.verbose, cli.json_logs);

    tracing::debug!("PicCaptionr v{}", piccaptionr_core::VERSION);

    match cli.command {
        Some(Commands::Caption(args)) => cli::caption::execute(args, &config).await,
        Some(Commands::Config(args)) => cli::config::execute(args).await,
        None => {
            if std::io::stdin().is_terminal() && std::io::stderr().is_terminal() {
                cli::interactive::run(&config).await
            } else {
                Cli::command().print_help()?;
                Ok(())
            }
        }
    }
}
