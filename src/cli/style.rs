//! Terminal styling helpers
//!
//! Output goes through `anstream`, which strips escapes when stdout is not
//! a terminal.

use indicatif::ProgressStyle;
use owo_colors::OwoColorize;
use std::fmt::Display;

/// Check mark for finished steps
pub const CHECK: &str = "✓";

/// Cross for failed steps
pub const CROSS: &str = "✗";

/// Semantic colors for CLI output
pub trait Stylize {
    /// De-emphasized detail text
    fn muted(&self) -> String;
    /// Names the user should notice (branches, remotes)
    fn emphasis(&self) -> String;
    /// Secondary highlight
    fn accent(&self) -> String;
    /// Completed work
    fn success(&self) -> String;
    /// Non-fatal problems
    fn warn(&self) -> String;
    /// Failures
    fn failure(&self) -> String;
}

impl<T: Display> Stylize for T {
    fn muted(&self) -> String {
        self.dimmed().to_string()
    }

    fn emphasis(&self) -> String {
        self.bold().to_string()
    }

    fn accent(&self) -> String {
        self.cyan().to_string()
    }

    fn success(&self) -> String {
        self.green().to_string()
    }

    fn warn(&self) -> String {
        self.yellow().to_string()
    }

    fn failure(&self) -> String {
        self.red().to_string()
    }
}

/// Green check mark
pub fn check() -> String {
    CHECK.success()
}

/// Red cross
pub fn cross() -> String {
    CROSS.failure()
}

/// Spinner used for git operations that may take a while
pub fn spinner_style() -> ProgressStyle {
    ProgressStyle::with_template("{spinner:.cyan} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ ")
}
