//! CLI command implementations

pub mod cleanup;
pub mod context;
pub mod push;
pub mod redact;
pub mod status;
pub mod style;

use indicatif::ProgressBar;
use mergeflow::cleanup::{CleanupProgress, CleanupStep, StepOutcome};
use std::sync::Mutex;
use std::time::Duration;
use style::{Stylize, check, cross, spinner_style};

/// Spinner-per-step progress for `mergeflow cleanup`
pub struct CliProgress {
    main_branch: String,
    feature_branch: String,
    remote: String,
    spinner: Mutex<Option<ProgressBar>>,
}

impl CliProgress {
    /// Progress display for cleaning up `feature_branch` onto `main_branch`
    pub fn new(main_branch: &str, feature_branch: &str, remote: &str) -> Self {
        Self {
            main_branch: main_branch.to_string(),
            feature_branch: feature_branch.to_string(),
            remote: remote.to_string(),
            spinner: Mutex::new(None),
        }
    }

    fn describe(&self, step: CleanupStep) -> String {
        match step {
            CleanupStep::SwitchBranch => format!("Switch to {}", self.main_branch.emphasis()),
            CleanupStep::PullLatest => format!("Pull {}", self.main_branch.emphasis()),
            CleanupStep::FetchAndPrune => format!("Fetch and prune {}", self.remote.emphasis()),
            CleanupStep::DeleteBranch => format!("Delete {}", self.feature_branch.accent()),
        }
    }
}

impl CleanupProgress for CliProgress {
    fn on_step_started(&self, step: CleanupStep) {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(spinner_style());
        spinner.set_message(format!("{}...", self.describe(step)));
        spinner.enable_steady_tick(Duration::from_millis(80));

        if let Ok(mut slot) = self.spinner.lock() {
            *slot = Some(spinner);
        }
    }

    fn on_step_finished(&self, outcome: &StepOutcome) {
        let Some(spinner) = self.spinner.lock().ok().and_then(|mut slot| slot.take()) else {
            return;
        };

        let description = self.describe(outcome.step);
        let message = match &outcome.error {
            None => format!("{} {description}", check()),
            Some(err) if outcome.step.is_critical() => {
                format!("{} {description}: {}", cross(), err.to_string().failure())
            }
            Some(err) => format!("{} {description}: {}", "!".warn(), err.to_string().warn()),
        };
        spinner.finish_with_message(message);
    }
}
