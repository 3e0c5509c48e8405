//! Logging initialization and configuration.
//!
//! Uses the `tracing` ecosystem for structured logging with support for
//! both human-readable and JSON output formats.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the logging subsystem.
///
/// # Arguments
///
/// * `level` - Default level for PicCaptionr's own crates ("info", "debug", ...).
/// * `json_format` - If true, outputs structured JSON logs; otherwise pretty-printed.
///
/// # Notes
///
/// - Log output goes to stderr (stdout carries only the output file path)
/// - The RUST_LOG environment variable overrides `level`
pub fn init(level: &str, json_format: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(level)));

    if json_format {
        // JSON format for machine parsing
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        // Pretty format for humans
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr)
                    .with_ansi(true),
            )
            .init();
    }
}

/// Initialize logging with settings from the `[logging]` config section.
///
/// CLI flags only ever raise verbosity or switch to JSON; they never turn
/// either off.
pub fn init_from_config(
    config: &piccaptionr_core::Config,
    verbose_override: bool,
    json_logs_override: bool,
) {
    let level = if verbose_override {
        "debug"
    } else {
        config.logging.level.as_str()
    };
    let json_format = json_logs_override || config.logging.format.eq_ignore_ascii_case("json");
    init(level, json_format);
}

/// Apply `level` to our crates; dependencies (reqwest, hyper) stay at warn.
fn default_directives(level: &str) -> String {
    let level = match level.trim().to_lowercase().as_str() {
        l @ ("trace" | "debug" | "info" | "warn" | "error") => l.to_string(),
        _ => "info".to_string(),
    };
    format!("warn,piccaptionr={level},piccaptionr_core={level}")
}
