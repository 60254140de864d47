//! Error types for mergeflow
//!
//! Variants are grouped the way callers need to react to them:
//! resolution and structural errors abort a run, timeouts and execution
//! failures are reported per git operation.

use crate::secret::SanitizedError;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;

/// A bounded git operation ran past its deadline
///
/// Kept distinct from [`Error::Execution`] so callers can tell
/// "the remote looked unresponsive" apart from "git rejected the operation".
#[derive(Debug, Error)]
#[error("{operation} timed out after {}", format_deadline(.deadline))]
pub struct TimeoutError {
    /// Name of the operation that was cancelled
    pub operation: String,
    /// Deadline the operation was given
    pub deadline: Duration,
    /// Underlying cancellation cause
    #[source]
    pub source: tokio::time::error::Elapsed,
}

fn format_deadline(deadline: &Duration) -> String {
    if deadline.subsec_millis() == 0 {
        format!("{}s", deadline.as_secs())
    } else {
        format!("{}ms", deadline.as_millis())
    }
}

/// Errors that can occur in mergeflow
#[derive(Debug, Error)]
pub enum Error {
    /// Remote requires SSH but no identity could be loaded
    #[error("no SSH identity available ({0})")]
    NoSshIdentity(String),

    /// A git operation exceeded its deadline
    #[error(transparent)]
    Timeout(#[from] TimeoutError),

    /// A git operation ran to completion but reported failure
    ///
    /// `output` has already been through the sanitizer.
    #[error("{operation} failed: {output}")]
    Execution {
        /// Operation name
        operation: String,
        /// Sanitized combined stdout/stderr
        output: String,
    },

    /// The git binary could not be started
    #[error("{operation} could not be started: {source}")]
    Spawn {
        /// Operation name
        operation: String,
        /// Spawn failure
        #[source]
        source: std::io::Error,
    },

    /// No repository marker found walking up from the given path
    #[error("not a git repository (or any parent up to the filesystem root): {}", .0.display())]
    NotARepository(PathBuf),

    /// HEAD is detached
    #[error("HEAD is not pointing to a branch")]
    DetachedHead,

    /// Remote does not exist
    #[error("remote '{0}' not found")]
    RemoteNotFound(String),

    /// Remote exists but has no URL configured
    #[error("remote '{0}' has no URLs configured")]
    RemoteHasNoUrl(String),

    /// Neither the remote default-branch pointer nor main/master exist
    #[error("could not determine the main branch (no remote HEAD, no 'main' or 'master' branch)")]
    MainBranchNotFound,

    /// Branch or revision does not exist
    #[error("branch '{0}' not found")]
    BranchNotFound(String),

    /// Remote host is neither GitHub nor GitLab
    #[error("could not detect platform for remote: {0}")]
    UnsupportedPlatform(String),

    /// Object/ref reader failure (message sanitized)
    #[error("git error: {0}")]
    Git(String),

    /// Invalid settings
    #[error("configuration error: {0}")]
    Config(String),

    /// An error that has been passed through the sanitizer
    #[error(transparent)]
    Sanitized(#[from] SanitizedError),
}

impl Error {
    /// Whether this is a deadline expiry
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout(_))
    }

    /// Whether git ran and reported failure
    pub const fn is_execution(&self) -> bool {
        matches!(self, Self::Execution { .. } | Self::Spawn { .. })
    }

    /// Whether this is a local invariant violation (unsupported repository shape)
    pub const fn is_structural(&self) -> bool {
        matches!(
            self,
            Self::NotARepository(_)
                | Self::DetachedHead
                | Self::RemoteNotFound(_)
                | Self::RemoteHasNoUrl(_)
                | Self::MainBranchNotFound
                | Self::BranchNotFound(_)
                | Self::UnsupportedPlatform(_)
                | Self::Git(_)
        )
    }
}
