//! Status command - show what mergeflow sees in the repository

use crate::cli::context::CommandContext;
use crate::cli::style::Stylize;
use anstream::println;
use mergeflow::secret::redact_url_credentials;
use mergeflow::types::Platform;
use serde::Serialize;
use std::path::Path;

/// Repository summary, printable or serializable
#[derive(Debug, Serialize)]
struct StatusReport {
    root: String,
    branch: Option<String>,
    main_branch: Option<String>,
    remote: String,
    remote_url: Option<String>,
    platform: Option<Platform>,
    auth: String,
    latest_commit: Option<String>,
    ahead_of_main: Option<usize>,
}

impl StatusReport {
    fn gather(ctx: &CommandContext) -> Self {
        let repo = &ctx.repo;
        let main_branch = repo.main_branch().ok();
        let ahead_of_main = main_branch
            .as_deref()
            .and_then(|main| repo.commits_since_branch(main).ok())
            .map(|commits| commits.len());

        Self {
            root: repo.root().display().to_string(),
            branch: repo.current_branch().ok(),
            main_branch,
            remote: ctx.remote_name().to_string(),
            remote_url: repo
                .remote_url(ctx.remote_name())
                .ok()
                .map(|url| redact_url_credentials(&url)),
            platform: repo.platform().ok(),
            auth: repo.auth().to_string(),
            latest_commit: repo
                .latest_commit_message()
                .ok()
                .and_then(|msg| msg.lines().next().map(str::to_string)),
            ahead_of_main,
        }
    }
}

/// Print repository status
pub fn run_status(path: &Path, remote: Option<&str>, json: bool) -> anyhow::Result<()> {
    let ctx = CommandContext::new(path, remote)?;
    let report = StatusReport::gather(&ctx);

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    let unknown = || "unknown".muted();
    println!("{} {}", "Repository:".muted(), report.root);
    println!(
        "{} {}",
        "Branch:".muted(),
        report
            .branch
            .as_deref()
            .map_or_else(|| "(detached HEAD)".warn(), |branch| branch.accent())
    );
    println!(
        "{} {}",
        "Main branch:".muted(),
        report
            .main_branch
            .as_deref()
            .map_or_else(unknown, |branch| branch.emphasis())
    );
    println!(
        "{} {} {}",
        "Remote:".muted(),
        report.remote.emphasis(),
        report.remote_url.as_deref().unwrap_or("(not configured)")
    );
    println!(
        "{} {}",
        "Platform:".muted(),
        report
            .platform
            .map_or_else(unknown, |platform| platform.to_string())
    );
    println!("{} {}", "Auth:".muted(), report.auth);
    if let Some(subject) = &report.latest_commit {
        println!("{} {subject}", "Latest commit:".muted());
    }
    if let Some(ahead) = report.ahead_of_main {
        println!("{} {ahead}", "Commits ahead of main:".muted());
    }

    Ok(())
}
