//! Bounded execution of git subcommands
//!
//! Each call spawns one child, waits for it under a deadline, and kills it
//! if the deadline passes. Failure output is sanitized before it is put into
//! an error, since git echoes remote URLs that can carry credentials.

use crate::error::{Error, Result, TimeoutError};
use crate::secret::{SecretGuard, sanitize_text};
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::{Duration, Instant};
use tokio::process::Command;
use tracing::debug;

/// Caller-side time budget, like a context deadline
///
/// Operations run with the smaller of their own deadline class and what is
/// left of this budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deadline {
    expires_at: Option<Instant>,
}

impl Deadline {
    /// No caller budget; only deadline classes apply
    pub const fn unbounded() -> Self {
        Self { expires_at: None }
    }

    /// Budget expiring `budget` from now
    pub fn after(budget: Duration) -> Self {
        Self {
            expires_at: Some(Instant::now() + budget),
        }
    }

    /// Time left, or `None` if unbounded
    pub fn remaining(&self) -> Option<Duration> {
        self.expires_at
            .map(|at| at.saturating_duration_since(Instant::now()))
    }

    /// Effective deadline for an operation of the given class
    pub fn bound(&self, class: Duration) -> Duration {
        self.remaining().map_or(class, |left| left.min(class))
    }
}

impl Default for Deadline {
    fn default() -> Self {
        Self::unbounded()
    }
}

/// Runs a program (git by default) pinned to one working directory
#[derive(Debug, Clone)]
pub struct BoundedExecutor {
    program: OsString,
    working_dir: PathBuf,
}

impl BoundedExecutor {
    /// Executor running `git` in `working_dir`
    pub fn new(working_dir: impl Into<PathBuf>) -> Self {
        Self::with_program("git", working_dir)
    }

    /// Executor running an arbitrary program in `working_dir`
    pub fn with_program(program: impl AsRef<OsStr>, working_dir: impl Into<PathBuf>) -> Self {
        Self {
            program: program.as_ref().to_os_string(),
            working_dir: working_dir.into(),
        }
    }

    /// Directory every command runs in
    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }

    /// Run `args` under `deadline`, returning combined stdout and stderr
    pub async fn run(&self, operation: &str, args: &[&str], deadline: Duration) -> Result<String> {
        self.run_with_env(operation, args, &[], deadline).await
    }

    /// Like [`run`](Self::run), with extra child environment
    ///
    /// Returns [`Error::Timeout`] if the deadline passes (the child is
    /// killed), [`Error::Execution`] with sanitized output on a non-zero
    /// exit, and the raw combined output on success.
    pub async fn run_with_env(
        &self,
        operation: &str,
        args: &[&str],
        env: &[(&str, SecretGuard)],
        deadline: Duration,
    ) -> Result<String> {
        debug!(
            operation,
            args = %sanitize_text(&args.join(" ")),
            env = ?env,
            dir = %self.working_dir.display(),
            ?deadline,
            "running command"
        );

        let mut cmd = Command::new(&self.program);
        cmd.args(args)
            .current_dir(&self.working_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        for (key, value) in env {
            cmd.env(key, value.expose_secret());
        }

        let child = cmd.spawn().map_err(|source| Error::Spawn {
            operation: operation.to_string(),
            source,
        })?;

        // Dropping the wait future on timeout drops the child, which kills it
        let output = match tokio::time::timeout(deadline, child.wait_with_output()).await {
            Ok(result) => result.map_err(|source| Error::Spawn {
                operation: operation.to_string(),
                source,
            })?,
            Err(elapsed) => {
                debug!(operation, ?deadline, "command timed out");
                return Err(TimeoutError {
                    operation: operation.to_string(),
                    deadline,
                    source: elapsed,
                }
                .into());
            }
        };

        let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
        combined.push_str(&String::from_utf8_lossy(&output.stderr));

        if !output.status.success() {
            let sanitized = sanitize_text(combined.trim());
            debug!(operation, status = ?output.status.code(), output = %sanitized, "command failed");
            return Err(Error::Execution {
                operation: operation.to_string(),
                output: sanitized,
            });
        }

        Ok(combined)
    }
}
