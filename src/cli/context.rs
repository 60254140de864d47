//! Shared command context for CLI commands
//!
//! Loads settings from the environment, applies command-line overrides, and
//! opens the repository handle every command works against.

use mergeflow::config::GitSettings;
use mergeflow::error::Result;
use mergeflow::git::RepositoryHandle;
use mergeflow::system::SystemEnvironment;
use std::path::Path;

/// Repository plus the settings it was opened with
pub struct CommandContext {
    /// Handle to the enclosing repository
    pub repo: RepositoryHandle,
}

impl CommandContext {
    /// Open the repository enclosing `path`
    ///
    /// `remote` overrides `MERGEFLOW_REMOTE` and the `origin` default.
    pub fn new(path: &Path, remote: Option<&str>) -> Result<Self> {
        let mut settings = GitSettings::from_env(&SystemEnvironment)?;
        if let Some(remote) = remote {
            settings.remote = remote.to_string();
        }

        let repo = RepositoryHandle::open(path, settings)?;
        Ok(Self { repo })
    }

    /// Name of the remote commands push to and fetch from
    pub fn remote_name(&self) -> &str {
        &self.repo.settings().remote
    }
}
