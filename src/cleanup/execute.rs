//! Cleanup execution - effectful operations
//!
//! Runs the steps from [`CleanupStep::ALL`] against a [`CleanupTarget`] and
//! records every outcome. Errors never escape: a critical failure ends the
//! run early, a best-effort failure is noted and the run continues.

use super::plan::CleanupStep;
use crate::error::Result;
use crate::git::Deadline;
use crate::secret::{SanitizedError, sanitize_error};
use async_trait::async_trait;
use tracing::{debug, error, warn};

/// The git operations cleanup needs
#[async_trait]
pub trait CleanupTarget: Send + Sync {
    /// Check out `name`
    async fn switch_branch(&self, deadline: &Deadline, name: &str) -> Result<()>;

    /// Update the current branch from its upstream
    async fn pull(&self, deadline: &Deadline) -> Result<()>;

    /// Fetch and prune remote-tracking branches
    async fn fetch_and_prune(&self, deadline: &Deadline) -> Result<()>;

    /// Delete local branch `name`
    async fn delete_branch(&self, deadline: &Deadline, name: &str) -> Result<()>;
}

/// Progress notifications for a cleanup run
pub trait CleanupProgress: Send + Sync {
    /// A step is about to run
    fn on_step_started(&self, _step: CleanupStep) {}

    /// A step finished, successfully or not
    fn on_step_finished(&self, _outcome: &StepOutcome) {}
}

/// Progress callback that ignores everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl CleanupProgress for NoProgress {}

/// What happened to one step
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepOutcome {
    /// The step
    pub step: CleanupStep,
    /// Whether the step ran at all
    pub attempted: bool,
    /// Whether the step succeeded
    pub completed: bool,
    /// Sanitized failure, if it failed
    pub error: Option<SanitizedError>,
}

impl StepOutcome {
    const fn not_attempted(step: CleanupStep) -> Self {
        Self {
            step,
            attempted: false,
            completed: false,
            error: None,
        }
    }
}

/// Outcome of a cleanup run, one entry per step in execution order
///
/// Steps after a failed critical step stay `attempted == false`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanupReport {
    main_branch: String,
    feature_branch: String,
    outcomes: Vec<StepOutcome>,
}

impl CleanupReport {
    fn new(main_branch: &str, feature_branch: &str) -> Self {
        Self {
            main_branch: main_branch.to_string(),
            feature_branch: feature_branch.to_string(),
            outcomes: CleanupStep::ALL
                .iter()
                .map(|step| StepOutcome::not_attempted(*step))
                .collect(),
        }
    }

    fn record(&mut self, step: CleanupStep, result: Result<()>) -> &StepOutcome {
        let outcome = &mut self.outcomes[step.index()];
        outcome.attempted = true;
        outcome.completed = result.is_ok();
        outcome.error = sanitize_error(result.err().as_ref());
        outcome
    }

    /// Branch cleanup switched to
    pub fn main_branch(&self) -> &str {
        &self.main_branch
    }

    /// Branch cleanup deleted
    pub fn feature_branch(&self) -> &str {
        &self.feature_branch
    }

    /// Every step's outcome, in execution order
    pub fn steps(&self) -> &[StepOutcome] {
        &self.outcomes
    }

    /// Outcome of one step
    pub fn outcome(&self, step: CleanupStep) -> &StepOutcome {
        &self.outcomes[step.index()]
    }

    /// Both critical steps completed
    pub fn success(&self) -> bool {
        self.outcomes
            .iter()
            .filter(|o| o.step.is_critical())
            .all(|o| o.completed)
    }

    /// At least one step completed
    pub fn partial_success(&self) -> bool {
        self.outcomes.iter().any(|o| o.completed)
    }

    /// Earliest failure in step order
    pub fn first_error(&self) -> Option<(CleanupStep, &SanitizedError)> {
        self.outcomes
            .iter()
            .find_map(|o| o.error.as_ref().map(|e| (o.step, e)))
    }

    /// Succeeded, but a best-effort step failed
    pub fn has_warnings(&self) -> bool {
        self.success() && self.first_error().is_some()
    }
}

/// Runs the post-merge cleanup sequence
pub struct CleanupOrchestrator<'a> {
    progress: &'a dyn CleanupProgress,
}

impl Default for CleanupOrchestrator<'_> {
    fn default() -> Self {
        Self {
            progress: &NoProgress,
        }
    }
}

impl<'a> CleanupOrchestrator<'a> {
    /// Orchestrator reporting progress to `progress`
    pub fn with_progress(progress: &'a dyn CleanupProgress) -> Self {
        Self { progress }
    }

    /// Switch to `main_branch`, pull, fetch with prune, delete `feature_branch`
    ///
    /// `deadline` bounds every step on top of its own deadline class.
    pub async fn run(
        &self,
        target: &dyn CleanupTarget,
        main_branch: &str,
        feature_branch: &str,
        deadline: Deadline,
    ) -> CleanupReport {
        let mut report = CleanupReport::new(main_branch, feature_branch);

        for step in CleanupStep::ALL {
            self.progress.on_step_started(step);
            let result = match step {
                CleanupStep::SwitchBranch => target.switch_branch(&deadline, main_branch).await,
                CleanupStep::PullLatest => target.pull(&deadline).await,
                CleanupStep::FetchAndPrune => target.fetch_and_prune(&deadline).await,
                CleanupStep::DeleteBranch => target.delete_branch(&deadline, feature_branch).await,
            };

            let outcome = report.record(step, result);
            self.progress.on_step_finished(outcome);

            match &outcome.error {
                None => debug!(%step, "cleanup step completed"),
                Some(err) if step.is_critical() => {
                    error!(%step, error = %err, "cleanup stopped");
                    break;
                }
                Some(err) => warn!(%step, error = %err, "cleanup step failed, continuing"),
            }
        }

        report
    }
}
