//! Cleanup command - return to main after a merge and drop the merged branch

use crate::cli::CliProgress;
use crate::cli::context::CommandContext;
use crate::cli::style::Stylize;
use anstream::println;
use mergeflow::cleanup::{CleanupOrchestrator, CleanupReport};
use mergeflow::git::Deadline;
use std::path::Path;
use std::time::Duration;

/// Options for the cleanup command
#[derive(Debug, Clone, Default)]
pub struct CleanupOptions {
    /// Branch to return to (default: the remote's default branch)
    pub main_branch: Option<String>,
    /// Branch to delete (default: the current branch)
    pub feature_branch: Option<String>,
    /// Overall budget in seconds across all steps
    pub timeout_secs: Option<u64>,
}

/// Run post-merge cleanup; returns whether both critical steps completed
pub async fn run_cleanup(
    path: &Path,
    remote: Option<&str>,
    options: CleanupOptions,
) -> anyhow::Result<bool> {
    let ctx = CommandContext::new(path, remote)?;

    let feature_branch = match options.feature_branch {
        Some(branch) => branch,
        None => ctx.repo.current_branch()?,
    };
    let main_branch = match options.main_branch {
        Some(branch) => branch,
        None => ctx.repo.main_branch()?,
    };
    if feature_branch == main_branch {
        anyhow::bail!("{feature_branch} is the main branch, refusing to delete it");
    }

    let deadline = options
        .timeout_secs
        .map_or_else(Deadline::unbounded, |secs| {
            Deadline::after(Duration::from_secs(secs))
        });

    println!(
        "Cleaning up {} onto {}",
        feature_branch.accent(),
        main_branch.emphasis()
    );

    let progress = CliProgress::new(&main_branch, &feature_branch, ctx.remote_name());
    let report = CleanupOrchestrator::with_progress(&progress)
        .run(&ctx.repo, &main_branch, &feature_branch, deadline)
        .await;

    print_summary(&report);
    Ok(report.success())
}

fn print_summary(report: &CleanupReport) {
    let skipped: Vec<String> = report
        .steps()
        .iter()
        .filter(|o| !o.attempted)
        .map(|o| o.step.to_string())
        .collect();

    if report.has_warnings() {
        println!(
            "{}",
            format!("Back on {}, with warnings", report.main_branch()).warn()
        );
    } else if report.success() {
        println!(
            "{}",
            format!("Back on {}", report.main_branch()).success()
        );
    } else {
        if let Some((step, err)) = report.first_error() {
            println!("{}", format!("Cleanup failed at {step}: {err}").failure());
        }
        if !skipped.is_empty() {
            println!("{}", format!("Not attempted: {}", skipped.join(", ")).muted());
        }
        println!(
            "{}",
            "Finish manually with git switch / git pull / git branch -D.".muted()
        );
    }
}
