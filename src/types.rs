//! Core types for mergeflow

use serde::{Deserialize, Serialize};

/// A git remote
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GitRemote {
    /// Remote name (e.g., "origin")
    pub name: String,
    /// Remote URL
    pub url: String,
}

/// Detected platform type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Platform {
    /// GitHub or GitHub Enterprise
    GitHub,
    /// GitLab or self-hosted GitLab
    GitLab,
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::GitHub => write!(f, "GitHub"),
            Self::GitLab => write!(f, "GitLab"),
        }
    }
}

/// Transport a remote URL uses
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteScheme {
    /// `https://host/path`
    Https,
    /// `user@host:path` or `ssh://user@host/path`
    Ssh,
    /// Anything else (`http`, `file`, local paths)
    Other(String),
}

impl RemoteScheme {
    /// Short label for diagnostics
    pub fn label(&self) -> &str {
        match self {
            Self::Https => "https",
            Self::Ssh => "ssh",
            Self::Other(value) => value.as_str(),
        }
    }
}

/// A remote URL split into the parts credential resolution needs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteUrl {
    /// Transport
    pub scheme: RemoteScheme,
    /// Host name, lowercased (None for local paths)
    pub host: Option<String>,
}
