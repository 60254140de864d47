//! mergeflow - authenticated git operations for merge-request workflows

mod cli;

use anstream::eprintln;
use clap::{ArgAction, Parser, Subcommand};
use cli::cleanup::{CleanupOptions, run_cleanup};
use cli::push::run_push;
use cli::redact::run_redact;
use cli::status::run_status;
use cli::style::Stylize;
use mergeflow::secret::sanitize_text;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "mergeflow",
    version,
    about = "Authenticated git operations for GitHub/GitLab merge workflows"
)]
struct Cli {
    /// Path inside the repository
    #[arg(long, global = true, default_value = ".")]
    path: PathBuf,

    /// Remote to use (default: $MERGEFLOW_REMOTE, then origin)
    #[arg(long, global = true)]
    remote: Option<String>,

    /// More log output (-v debug, -vv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show branch, remote, platform and credential in use
    Status {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Push a branch using the resolved credential
    Push {
        /// Branch to push (default: current branch)
        branch: Option<String>,
    },
    /// After a merge: switch to main, pull, prune, delete the feature branch
    Cleanup {
        /// Branch to return to (default: the remote's default branch)
        #[arg(long)]
        main: Option<String>,
        /// Branch to delete (default: current branch)
        #[arg(long)]
        branch: Option<String>,
        /// Overall time budget in seconds
        #[arg(long)]
        timeout: Option<u64>,
    },
    /// Redact secrets from stdin
    Redact,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let remote = cli.remote.as_deref();
    let result = match cli.command {
        Commands::Status { json } => run_status(&cli.path, remote, json).map(|()| true),
        Commands::Push { branch } => run_push(&cli.path, remote, branch.as_deref())
            .await
            .map(|()| true),
        Commands::Cleanup {
            main,
            branch,
            timeout,
        } => {
            let options = CleanupOptions {
                main_branch: main,
                feature_branch: branch,
                timeout_secs: timeout,
            };
            run_cleanup(&cli.path, remote, options).await
        }
        Commands::Redact => run_redact().map(|()| true),
    };

    match result {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("{} {}", "error:".failure(), sanitize_text(&format!("{e:#}")));
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: u8) {
    let default_directive = match verbose {
        0 => "warn",
        1 => "mergeflow=debug",
        _ => "mergeflow=trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
