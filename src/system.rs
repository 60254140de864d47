//! Process environment and filesystem access
//!
//! Credential resolution and settings loading only see the outside world
//! through these traits, so tests can hand them fakes.

use std::path::{Path, PathBuf};

/// Read-only view of environment variables
pub trait Environment: Send + Sync {
    /// Value of `name`, if set and valid unicode
    fn var(&self, name: &str) -> Option<String>;

    /// Value of `name`, treating an empty value as unset
    fn non_empty_var(&self, name: &str) -> Option<String> {
        self.var(name).filter(|v| !v.is_empty())
    }
}

/// Read-only view of the filesystem
pub trait FileSystem: Send + Sync {
    /// The user's home directory
    fn home_dir(&self) -> Option<PathBuf>;

    /// Whether `path` exists
    fn exists(&self, path: &Path) -> bool;

    /// Read a file as UTF-8
    fn read_to_string(&self, path: &Path) -> std::io::Result<String>;
}

/// The real process environment
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemEnvironment;

impl Environment for SystemEnvironment {
    fn var(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

/// The real filesystem
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemFileSystem;

impl FileSystem for SystemFileSystem {
    fn home_dir(&self) -> Option<PathBuf> {
        dirs::home_dir()
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn read_to_string(&self, path: &Path) -> std::io::Result<String> {
        std::fs::read_to_string(path)
    }
}
