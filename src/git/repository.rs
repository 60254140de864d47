//! Repository handle: read-only introspection via gix, writes via git CLI

use super::discovery::find_repository_root;
use super::executor::{BoundedExecutor, Deadline};
use crate::auth::{AuthDecision, CredentialResolver};
use crate::cleanup::CleanupTarget;
use crate::config::GitSettings;
use crate::diagnostics::Diagnostics;
use crate::error::{Error, Result};
use crate::platform::platform_for_remote;
use crate::secret::{redact_url_credentials, sanitize_text};
use crate::system::{Environment, FileSystem, SystemEnvironment, SystemFileSystem};
use crate::types::{GitRemote, Platform};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::debug;

const BRANCH_PREFIX: &str = "refs/heads/";
const FALLBACK_MAIN_BRANCHES: &[&str] = &["main", "master"];

/// One working tree, its resolved credential, and the git operations the
/// merge workflow needs
///
/// Credentials are resolved once in [`open`](Self::open) and never change.
/// Read-only accessors may be called from several threads; mutating
/// operations must not overlap since they share the working tree.
pub struct RepositoryHandle {
    root: PathBuf,
    repo: gix::ThreadSafeRepository,
    settings: GitSettings,
    auth: AuthDecision,
    executor: BoundedExecutor,
    diagnostics: Diagnostics,
}

impl RepositoryHandle {
    /// Open the repository enclosing `path` using the real environment
    pub fn open(path: &Path, settings: GitSettings) -> Result<Self> {
        Self::open_with(
            path,
            settings,
            &SystemEnvironment,
            &SystemFileSystem,
            Diagnostics::default(),
        )
    }

    /// Open with injected environment, filesystem and diagnostic sink
    ///
    /// A repository without the configured remote is still usable for
    /// read-only operations and gets [`AuthDecision::None`].
    pub fn open_with(
        path: &Path,
        settings: GitSettings,
        env: &dyn Environment,
        fs: &dyn FileSystem,
        diagnostics: Diagnostics,
    ) -> Result<Self> {
        let root = find_repository_root(path)?;
        let repo = gix::open(&root).map_err(git_error)?;

        let auth = match remote_url_of(&repo, &settings.remote) {
            Ok(url) => CredentialResolver::new(env, fs, &settings.hosts, &diagnostics).resolve(&url)?,
            Err(e @ (Error::RemoteNotFound(_) | Error::RemoteHasNoUrl(_))) => {
                diagnostics.warn(&format!("{e}, continuing without credentials"));
                AuthDecision::None
            }
            Err(e) => return Err(e),
        };
        debug!(root = %root.display(), auth = %auth, "opened repository");

        Ok(Self {
            executor: BoundedExecutor::new(&root),
            root,
            repo: repo.into_sync(),
            settings,
            auth,
            diagnostics,
        })
    }

    /// Run write operations through `executor` instead of `git` in the root
    #[must_use]
    pub fn with_executor(mut self, executor: BoundedExecutor) -> Self {
        self.executor = executor;
        self
    }

    /// Absolute path of the working tree root
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Credential chosen for the configured remote
    pub const fn auth(&self) -> &AuthDecision {
        &self.auth
    }

    /// Settings the handle was opened with
    pub const fn settings(&self) -> &GitSettings {
        &self.settings
    }

    /// Sink for diagnostics about this repository
    pub const fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    /// Name of the branch HEAD points to
    pub fn current_branch(&self) -> Result<String> {
        let repo = self.repo.to_thread_local();
        let head = repo.head_name().map_err(git_error)?.ok_or(Error::DetachedHead)?;
        head.as_bstr()
            .to_string()
            .strip_prefix(BRANCH_PREFIX)
            .map(str::to_string)
            .ok_or(Error::DetachedHead)
    }

    /// The remote's default branch
    ///
    /// Follows `refs/remotes/<remote>/HEAD`; without it, falls back to a
    /// local or remote-tracking `main`, then `master`.
    pub fn main_branch(&self) -> Result<String> {
        let repo = self.repo.to_thread_local();
        let remote = &self.settings.remote;

        let remote_head = format!("refs/remotes/{remote}/HEAD");
        if let Some(reference) = repo
            .try_find_reference(remote_head.as_str())
            .map_err(git_error)?
        {
            if let gix::refs::TargetRef::Symbolic(target) = reference.target() {
                let target = target.as_bstr().to_string();
                if let Some(branch) = target.strip_prefix(&format!("refs/remotes/{remote}/")) {
                    return Ok(branch.to_string());
                }
            }
        }

        for candidate in FALLBACK_MAIN_BRANCHES {
            let local = format!("{BRANCH_PREFIX}{candidate}");
            let tracking = format!("refs/remotes/{remote}/{candidate}");
            for name in [local, tracking] {
                if repo
                    .try_find_reference(name.as_str())
                    .map_err(git_error)?
                    .is_some()
                {
                    self.diagnostics
                        .debug(&format!("no {remote_head}, using {candidate}"));
                    return Ok((*candidate).to_string());
                }
            }
        }

        Err(Error::MainBranchNotFound)
    }

    /// URL of the named remote (push URL preferred)
    pub fn remote_url(&self, name: &str) -> Result<String> {
        remote_url_of(&self.repo.to_thread_local(), name)
    }

    /// All remotes with a URL, sorted by name
    pub fn remotes(&self) -> Vec<GitRemote> {
        let repo = self.repo.to_thread_local();
        repo.remote_names()
            .iter()
            .filter_map(|name| {
                let name = name.to_string();
                remote_url_of(&repo, &name)
                    .ok()
                    .map(|url| GitRemote { name, url })
            })
            .collect()
    }

    /// Platform serving the configured remote
    pub fn platform(&self) -> Result<Platform> {
        let url = self.remote_url(&self.settings.remote)?;
        platform_for_remote(&url, &self.settings.hosts)
    }

    /// Full message of the commit HEAD points to
    pub fn latest_commit_message(&self) -> Result<String> {
        let repo = self.repo.to_thread_local();
        let commit = repo.head_commit().map_err(git_error)?;
        let message = commit.message_raw().map_err(git_error)?;
        Ok(message.to_string().trim_end().to_string())
    }

    /// Messages of commits reachable from HEAD but not from `base`, newest first
    pub fn commits_since_branch(&self, base: &str) -> Result<Vec<String>> {
        let repo = self.repo.to_thread_local();
        let head = repo.head_id().map_err(git_error)?.detach();
        let base_id = repo
            .rev_parse_single(base)
            .map_err(|_| Error::BranchNotFound(base.to_string()))?
            .detach();

        let walk = repo
            .rev_walk([head])
            .with_hidden([base_id])
            .all()
            .map_err(git_error)?;

        let mut messages = Vec::new();
        for info in walk {
            let info = info.map_err(git_error)?;
            let commit = repo.find_commit(info.id).map_err(git_error)?;
            messages.push(commit.message_raw_sloppy().to_string().trim_end().to_string());
        }
        Ok(messages)
    }

    /// Push `branch` to the configured remote with the resolved credential
    ///
    /// A remote that is already up to date counts as success.
    pub async fn push(&self, branch: &str) -> Result<()> {
        let refspec = format!("{BRANCH_PREFIX}{branch}:{BRANCH_PREFIX}{branch}");
        let args = ["push", self.settings.remote.as_str(), refspec.as_str()];
        let result = self
            .executor
            .run_with_env(
                "push",
                &args,
                &self.auth.git_env(),
                self.settings.network_timeout,
            )
            .await;

        match result {
            Ok(_) => Ok(()),
            Err(Error::Execution { output, .. }) if is_up_to_date(&output) => {
                self.diagnostics
                    .debug(&format!("{branch} already up to date on {}", self.settings.remote));
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    /// Check out an existing local branch
    pub async fn switch_branch(&self, deadline: &Deadline, name: &str) -> Result<()> {
        self.executor
            .run(
                "switch branch",
                &["switch", name],
                deadline.bound(self.settings.local_timeout),
            )
            .await
            .map(drop)
    }

    /// Fast-forward the current branch from its upstream
    pub async fn pull(&self, deadline: &Deadline) -> Result<()> {
        self.executor
            .run_with_env(
                "pull",
                &["pull", "--ff-only"],
                &self.auth.git_env(),
                deadline.bound(self.settings.network_timeout),
            )
            .await
            .map(drop)
    }

    /// Fetch the configured remote and drop stale remote-tracking branches
    pub async fn fetch_and_prune(&self, deadline: &Deadline) -> Result<()> {
        let args = ["fetch", "--prune", self.settings.remote.as_str()];
        self.executor
            .run_with_env(
                "fetch and prune",
                &args,
                &self.auth.git_env(),
                deadline.bound(self.settings.network_timeout),
            )
            .await
            .map(drop)
    }

    /// Force-delete a local branch
    ///
    /// Forced because squash merges leave the branch unmerged as far as git
    /// can tell.
    pub async fn delete_branch(&self, deadline: &Deadline, name: &str) -> Result<()> {
        self.executor
            .run(
                "delete branch",
                &["branch", "-D", name],
                deadline.bound(self.settings.local_timeout),
            )
            .await
            .map(drop)
    }
}

impl std::fmt::Debug for RepositoryHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RepositoryHandle")
            .field("root", &self.root)
            .field("remote", &self.settings.remote)
            .field("auth", &self.auth)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl CleanupTarget for RepositoryHandle {
    async fn switch_branch(&self, deadline: &Deadline, name: &str) -> Result<()> {
        Self::switch_branch(self, deadline, name).await
    }

    async fn pull(&self, deadline: &Deadline) -> Result<()> {
        Self::pull(self, deadline).await
    }

    async fn fetch_and_prune(&self, deadline: &Deadline) -> Result<()> {
        Self::fetch_and_prune(self, deadline).await
    }

    async fn delete_branch(&self, deadline: &Deadline, name: &str) -> Result<()> {
        Self::delete_branch(self, deadline, name).await
    }
}

fn remote_url_of(repo: &gix::Repository, name: &str) -> Result<String> {
    let remote = repo
        .find_remote(name)
        .map_err(|_| Error::RemoteNotFound(name.to_string()))?;
    let url = remote
        .url(gix::remote::Direction::Push)
        .or_else(|| remote.url(gix::remote::Direction::Fetch))
        .ok_or_else(|| Error::RemoteHasNoUrl(name.to_string()))?;
    Ok(url.to_bstring().to_string())
}

fn is_up_to_date(output: &str) -> bool {
    let output = output.to_lowercase();
    output.contains("up-to-date") || output.contains("up to date")
}

/// Object-reader errors can quote config values, so sanitize them too
fn git_error(err: impl std::fmt::Display) -> Error {
    Error::Git(sanitize_text(&redact_url_credentials(&err.to_string())))
}
