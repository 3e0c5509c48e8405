//! Terminal progress sink: a spinner showing the current step, with every
//! notification kept above it as a log line.

use std::time::Duration;

use console::{style, Style};
use indicatif::{ProgressBar, ProgressStyle};
use piccaptionr_core::progress::messages;
use piccaptionr_core::ProgressSink;

/// [`ProgressSink`] that draws on stderr.
pub struct ConsoleProgress {
    spinner: ProgressBar,
}

impl ConsoleProgress {
    pub fn new() -> Self {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} [{elapsed_precise}] {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        spinner.set_message("starting...");
        spinner.enable_steady_tick(Duration::from_millis(120));
        Self { spinner }
    }

    /// Remove the spinner; log lines stay.
    pub fn finish(&self) {
        self.spinner.finish_and_clear();
    }

    fn line(&self, text: String) {
        // println is a no-op on a hidden bar (stderr not a terminal)
        if self.spinner.is_hidden() {
            eprintln!("{text}");
        } else {
            self.spinner.println(text);
        }
    }
}

impl Default for ConsoleProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressSink for ConsoleProgress {
    fn notify(&self, message: &str) {
        if message == messages::SEPARATOR {
            let dim = Style::new().for_stderr().dim();
            self.line(format!("  {}", dim.apply_to("─".repeat(40))));
            return;
        }

        let arrow = style("→").for_stderr().blue().bold();
        self.line(format!("{arrow} {message}"));
        self.spinner.set_message(message.to_string());
    }
}
