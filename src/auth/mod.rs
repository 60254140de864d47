//! Authentication for git transports
//!
//! [`CredentialResolver`] looks at a remote URL plus environment and
//! filesystem state and picks exactly one [`AuthDecision`]. The decision is
//! then turned into child-process environment for the git CLI, so secrets
//! never appear in argv or in the remote URL.

mod known_hosts;
mod resolver;

pub use known_hosts::HostKeyVerifier;
pub use resolver::{CredentialResolver, GITHUB_PRINCIPAL, GITLAB_PRINCIPAL, SSH_KEY_CANDIDATES};

use crate::secret::{SecretGuard, mask_path};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use std::fmt;
use std::path::{Path, PathBuf};

/// Where an SSH identity comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SshSource {
    /// Keys held by a running ssh-agent
    Agent,
    /// An unencrypted private key file
    KeyFile(PathBuf),
}

impl fmt::Display for SshSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Agent => write!(f, "ssh-agent"),
            Self::KeyFile(path) => write!(f, "key file {}", mask_path(&path.to_string_lossy())),
        }
    }
}

/// How git should authenticate against the remote
///
/// Computed once per [`RepositoryHandle`](crate::git::RepositoryHandle) and
/// immutable afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthDecision {
    /// No credentials; the remote rejects the push if it needs any
    None,
    /// Username/token pair sent as HTTP basic auth
    BasicCredential {
        /// Username the platform expects for token auth
        principal: String,
        /// The token
        secret: SecretGuard,
    },
    /// SSH identity
    SshIdentity {
        /// Agent or key file
        source: SshSource,
        /// Host keys to verify against, when a `known_hosts` file parsed
        host_key_verifier: Option<HostKeyVerifier>,
    },
}

impl AuthDecision {
    /// Whether any credential was selected
    pub const fn is_authenticated(&self) -> bool {
        !matches!(self, Self::None)
    }

    /// Environment for a git child process carrying this decision
    ///
    /// Values are guarded because the basic-auth header embeds the token.
    pub fn git_env(&self) -> Vec<(&'static str, SecretGuard)> {
        let mut env = vec![("GIT_TERMINAL_PROMPT", SecretGuard::wrap("0"))];
        match self {
            Self::None => {}
            Self::BasicCredential { principal, secret } => {
                let encoded = STANDARD.encode(format!("{principal}:{}", secret.expose_secret()));
                env.push(("GIT_CONFIG_COUNT", SecretGuard::wrap("1")));
                env.push(("GIT_CONFIG_KEY_0", SecretGuard::wrap("http.extraHeader")));
                env.push((
                    "GIT_CONFIG_VALUE_0",
                    SecretGuard::wrap(format!("Authorization: Basic {encoded}")),
                ));
            }
            Self::SshIdentity {
                source,
                host_key_verifier,
            } => {
                env.push((
                    "GIT_SSH_COMMAND",
                    SecretGuard::wrap(ssh_command(source, host_key_verifier.as_ref())),
                ));
            }
        }
        env
    }
}

impl fmt::Display for AuthDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "none"),
            Self::BasicCredential { principal, secret } => {
                write!(f, "token as {principal} ({secret})")
            }
            Self::SshIdentity {
                source,
                host_key_verifier,
            } => {
                write!(f, "{source}")?;
                match host_key_verifier {
                    Some(v) => write!(f, " (host keys: {} entries)", v.entries()),
                    None => write!(f, " (host keys not verified)"),
                }
            }
        }
    }
}

fn ssh_command(source: &SshSource, verifier: Option<&HostKeyVerifier>) -> String {
    let mut cmd = String::from("ssh -o BatchMode=yes");
    if let SshSource::KeyFile(path) = source {
        cmd.push_str(&format!(" -i {} -o IdentitiesOnly=yes", shell_quote(path)));
    }
    match verifier {
        Some(v) => cmd.push_str(&format!(
            " -o UserKnownHostsFile={} -o StrictHostKeyChecking=yes",
            shell_quote(v.path())
        )),
        None => cmd.push_str(" -o StrictHostKeyChecking=accept-new"),
    }
    cmd
}

/// Single-quote a path for the shell git runs `GIT_SSH_COMMAND` through
fn shell_quote(path: &Path) -> String {
    let raw = path.to_string_lossy();
    format!("'{}'", raw.replace('\'', r"'\''"))
}
