//! The `piccaptionr config` command.
//!
//! The config file is read-only from PicCaptionr's side; edit it by hand.

use clap::{Args, Subcommand};
use piccaptionr_core::Config;

/// Arguments for the `config` command.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

/// Subcommands for configuration inspection.
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Display the effective configuration (file values over defaults)
    Show,

    /// Show config file path
    Path,
}

/// Execute the config command.
pub async fn execute(args: ConfigArgs) -> anyhow::Result<()> {
    match args.command {
        ConfigCommand::Show => {
            let path = Config::default_path();
            if !path.exists() {
                eprintln!("# No config file at {}, showing defaults", path.display());
            }
            let config = Config::load()?;
            let toml = config.to_toml()?;
            println!("{}", toml);
        }

        ConfigCommand::Path => {
            let path = Config::default_path();
            println!("{}", path.display());
        }
    }

    Ok(())
}
