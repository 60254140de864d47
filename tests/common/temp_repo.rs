//! Throwaway git repositories driven through the git CLI

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

/// Working repository on branch `main` with one commit, plus optional
/// bare remotes
pub struct TempGitRepo {
    dir: TempDir,
    remotes: Vec<TempDir>,
}

impl TempGitRepo {
    pub fn new() -> Self {
        let dir = TempDir::new().expect("create temp dir");
        let repo = Self {
            dir,
            remotes: Vec::new(),
        };
        repo.git(&["init", "-b", "main"]);
        repo.git(&["config", "user.name", "Test User"]);
        repo.git(&["config", "user.email", "test@example.com"]);
        repo.git(&["config", "commit.gpgsign", "false"]);
        repo.commit("README.md", "Initial commit");
        repo
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Run git in the working tree, panicking on failure
    pub fn git(&self, args: &[&str]) -> String {
        run_git(self.path(), args)
    }

    /// Write `file` and commit it with `message`
    pub fn commit(&self, file: &str, message: &str) {
        std::fs::write(self.path().join(file), format!("{message}\n")).expect("write file");
        self.git(&["add", file]);
        self.git(&["commit", "-q", "-m", message]);
    }

    pub fn checkout_new(&self, branch: &str) {
        self.git(&["switch", "-q", "-c", branch]);
    }

    pub fn current_branch(&self) -> String {
        self.git(&["rev-parse", "--abbrev-ref", "HEAD"]).trim().to_string()
    }

    pub fn has_branch(&self, branch: &str) -> bool {
        Command::new("git")
            .args(["rev-parse", "--verify", "--quiet", &format!("refs/heads/{branch}")])
            .current_dir(self.path())
            .status()
            .expect("run git")
            .success()
    }

    /// Create a bare repository, add it as `name`, push `main` to it and set
    /// its default-branch pointer
    pub fn add_bare_remote(&mut self, name: &str) -> PathBuf {
        let remote = TempDir::new().expect("create remote dir");
        run_git(remote.path(), &["init", "-q", "--bare", "-b", "main"]);
        let url = remote.path().to_string_lossy().into_owned();

        self.git(&["remote", "add", name, &url]);
        self.git(&["push", "-q", "-u", name, "main"]);
        self.git(&["remote", "set-head", name, "main"]);

        let path = remote.path().to_path_buf();
        self.remotes.push(remote);
        path
    }

    /// Add a remote pointing at an arbitrary URL (never contacted)
    pub fn add_remote_url(&self, name: &str, url: &str) {
        self.git(&["remote", "add", name, url]);
    }

    /// Push a commit to `remote_path`'s `branch` from a separate clone
    pub fn push_from_other_clone(&self, remote_path: &Path, branch: &str, file: &str, message: &str) {
        let other = TempDir::new().expect("create clone dir");
        let url = remote_path.to_string_lossy().into_owned();
        run_git(other.path(), &["clone", "-q", "-b", branch, &url, "."]);
        run_git(other.path(), &["config", "user.name", "Other User"]);
        run_git(other.path(), &["config", "user.email", "other@example.com"]);
        run_git(other.path(), &["config", "commit.gpgsign", "false"]);
        std::fs::write(other.path().join(file), format!("{message}\n")).expect("write file");
        run_git(other.path(), &["add", file]);
        run_git(other.path(), &["commit", "-q", "-m", message]);
        run_git(other.path(), &["push", "-q", "origin", branch]);
    }
}

fn run_git(dir: &Path, args: &[&str]) -> String {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .env("GIT_TERMINAL_PROMPT", "0")
        .output()
        .expect("run git");
    assert!(
        output.status.success(),
        "git {args:?} failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).into_owned()
}
