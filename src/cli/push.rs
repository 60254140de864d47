//! Push command - push a branch with the resolved credential

use crate::cli::context::CommandContext;
use crate::cli::style::{Stylize, check, spinner_style};
use anstream::println;
use indicatif::ProgressBar;
use std::path::Path;
use std::time::Duration;

/// Push `branch` (default: the current branch) to the selected remote
pub async fn run_push(path: &Path, remote: Option<&str>, branch: Option<&str>) -> anyhow::Result<()> {
    let ctx = CommandContext::new(path, remote)?;
    let branch = match branch {
        Some(branch) => branch.to_string(),
        None => ctx.repo.current_branch()?,
    };

    println!("{}", format!("Using {}", ctx.repo.auth()).muted());

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(spinner_style());
    spinner.set_message(format!(
        "Pushing {} to {}...",
        branch.accent(),
        ctx.remote_name().emphasis()
    ));
    spinner.enable_steady_tick(Duration::from_millis(80));

    if let Err(e) = ctx.repo.push(&branch).await {
        spinner.finish_and_clear();
        return Err(e.into());
    }

    spinner.finish_with_message(format!(
        "{} Pushed {} to {}",
        check(),
        branch.accent(),
        ctx.remote_name().emphasis()
    ));
    Ok(())
}
