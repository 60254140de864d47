//! Settings for the git operations layer
//!
//! The outer workflow owns the real configuration file; this is the slice of
//! it the git layer needs, with environment overrides for CI use.

use crate::error::{Error, Result};
use crate::system::Environment;
use std::time::Duration;

/// Remote used when none is configured
pub const DEFAULT_REMOTE: &str = "origin";

/// Deadline for local operations (switch, branch delete)
pub const DEFAULT_LOCAL_TIMEOUT: Duration = Duration::from_secs(10);

/// Deadline for network operations (push, pull, fetch)
pub const DEFAULT_NETWORK_TIMEOUT: Duration = Duration::from_secs(120);

/// Environment variable holding a GitLab token
pub const GITLAB_TOKEN_ENV: &str = "GITLAB_TOKEN";

/// Environment variable holding a GitHub token
pub const GITHUB_TOKEN_ENV: &str = "GITHUB_TOKEN";

/// Extra GitLab host (self-hosted instance)
pub const GITLAB_HOST_ENV: &str = "GITLAB_HOST";

/// Extra GitHub host (GitHub Enterprise)
pub const GITHUB_HOST_ENV: &str = "GH_HOST";

const REMOTE_ENV: &str = "MERGEFLOW_REMOTE";
const LOCAL_TIMEOUT_ENV: &str = "MERGEFLOW_LOCAL_TIMEOUT_SECS";
const NETWORK_TIMEOUT_ENV: &str = "MERGEFLOW_NETWORK_TIMEOUT_SECS";

/// Hosts recognized as each platform
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformHosts {
    /// GitLab domains
    pub gitlab: Vec<String>,
    /// GitHub domains
    pub github: Vec<String>,
}

impl Default for PlatformHosts {
    fn default() -> Self {
        Self {
            gitlab: vec!["gitlab.com".to_string()],
            github: vec!["github.com".to_string()],
        }
    }
}

/// Settings for [`RepositoryHandle`](crate::git::RepositoryHandle)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitSettings {
    /// Remote to push to and fetch from
    pub remote: String,
    /// Deadline class for local operations
    pub local_timeout: Duration,
    /// Deadline class for network operations
    pub network_timeout: Duration,
    /// Platform host lists
    pub hosts: PlatformHosts,
}

impl Default for GitSettings {
    fn default() -> Self {
        Self {
            remote: DEFAULT_REMOTE.to_string(),
            local_timeout: DEFAULT_LOCAL_TIMEOUT,
            network_timeout: DEFAULT_NETWORK_TIMEOUT,
            hosts: PlatformHosts::default(),
        }
    }
}

impl GitSettings {
    /// Defaults overlaid with environment overrides
    ///
    /// Reads `MERGEFLOW_REMOTE`, `MERGEFLOW_LOCAL_TIMEOUT_SECS`,
    /// `MERGEFLOW_NETWORK_TIMEOUT_SECS`, `GITLAB_HOST` and `GH_HOST`.
    pub fn from_env(env: &dyn Environment) -> Result<Self> {
        let mut settings = Self::default();

        if let Some(remote) = env.non_empty_var(REMOTE_ENV) {
            settings.remote = remote;
        }
        if let Some(secs) = parse_timeout(env, LOCAL_TIMEOUT_ENV)? {
            settings.local_timeout = secs;
        }
        if let Some(secs) = parse_timeout(env, NETWORK_TIMEOUT_ENV)? {
            settings.network_timeout = secs;
        }
        if let Some(host) = env.non_empty_var(GITLAB_HOST_ENV) {
            settings.hosts.gitlab.push(normalize_host(&host));
        }
        if let Some(host) = env.non_empty_var(GITHUB_HOST_ENV) {
            settings.hosts.github.push(normalize_host(&host));
        }

        Ok(settings)
    }
}

fn parse_timeout(env: &dyn Environment, name: &str) -> Result<Option<Duration>> {
    let Some(raw) = env.non_empty_var(name) else {
        return Ok(None);
    };
    let secs: u64 = raw
        .trim()
        .parse()
        .map_err(|e| Error::Config(format!("{name}={raw}: {e}")))?;
    if secs == 0 {
        return Err(Error::Config(format!("{name} must be greater than zero")));
    }
    Ok(Some(Duration::from_secs(secs)))
}

/// `https://git.example.com/` -> `git.example.com`
fn normalize_host(raw: &str) -> String {
    let trimmed = raw.trim();
    let without_scheme = trimmed
        .split_once("://")
        .map_or(trimmed, |(_, rest)| rest);
    without_scheme
        .trim_end_matches('/')
        .to_lowercase()
}
