//! Credential cascade for a remote URL

use super::{AuthDecision, HostKeyVerifier, SshSource};
use crate::config::{GITHUB_TOKEN_ENV, GITLAB_TOKEN_ENV, PlatformHosts};
use crate::diagnostics::Diagnostics;
use crate::error::{Error, Result};
use crate::platform::{detect_platform, parse_remote_url};
use crate::secret::{SecretGuard, mask_path};
use crate::system::{Environment, FileSystem};
use crate::types::{Platform, RemoteScheme};
use std::fmt;
use std::path::{Path, PathBuf};
use zeroize::Zeroizing;

/// Username GitLab expects alongside a token
pub const GITLAB_PRINCIPAL: &str = "oauth2";

/// Username GitHub expects alongside a token
pub const GITHUB_PRINCIPAL: &str = "x-access-token";

/// Key files tried after the agent, in order
pub const SSH_KEY_CANDIDATES: &[&str] = &["id_ed25519", "id_ecdsa", "id_rsa"];

const SSH_AUTH_SOCK_ENV: &str = "SSH_AUTH_SOCK";
const SSH_DIR: &str = ".ssh";
const KNOWN_HOSTS: &str = "known_hosts";

/// One SSH strategy in the fallback chain
#[derive(Debug, Clone, PartialEq, Eq)]
enum SshCandidate {
    Agent,
    KeyFile(PathBuf),
}

impl fmt::Display for SshCandidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Agent => write!(f, "ssh-agent"),
            Self::KeyFile(path) => write!(f, "{}", mask_path(&path.to_string_lossy())),
        }
    }
}

/// Picks an [`AuthDecision`] for a remote URL
///
/// Pure over (URL, environment, filesystem): all outside state comes in
/// through the injected traits.
pub struct CredentialResolver<'a> {
    env: &'a dyn Environment,
    fs: &'a dyn FileSystem,
    hosts: &'a PlatformHosts,
    diagnostics: &'a Diagnostics,
}

impl<'a> CredentialResolver<'a> {
    /// Create a resolver over the given collaborators
    pub fn new(
        env: &'a dyn Environment,
        fs: &'a dyn FileSystem,
        hosts: &'a PlatformHosts,
        diagnostics: &'a Diagnostics,
    ) -> Self {
        Self {
            env,
            fs,
            hosts,
            diagnostics,
        }
    }

    /// Resolve the credential for `remote_url`
    ///
    /// HTTPS remotes use a platform token from the environment when one is
    /// set and go unauthenticated otherwise. SSH remotes try the agent, then
    /// each conventional key file, and fail with [`Error::NoSshIdentity`]
    /// when nothing loads. Other schemes need no credential.
    pub fn resolve(&self, remote_url: &str) -> Result<AuthDecision> {
        let remote = parse_remote_url(remote_url);
        self.diagnostics.info(&format!(
            "resolving {} credentials for {}",
            remote.scheme.label(),
            remote.host.as_deref().unwrap_or("local remote")
        ));
        match remote.scheme {
            RemoteScheme::Https => Ok(self.resolve_https(remote.host.as_deref())),
            RemoteScheme::Ssh => self.resolve_ssh(),
            RemoteScheme::Other(scheme) => {
                self.diagnostics
                    .debug(&format!("no credentials for {scheme} remote"));
                Ok(AuthDecision::None)
            }
        }
    }

    fn resolve_https(&self, host: Option<&str>) -> AuthDecision {
        let platform = host.and_then(|h| detect_platform(h, self.hosts));
        let (env_name, principal) = match platform {
            Some(Platform::GitLab) => (GITLAB_TOKEN_ENV, GITLAB_PRINCIPAL),
            Some(Platform::GitHub) => (GITHUB_TOKEN_ENV, GITHUB_PRINCIPAL),
            None => {
                self.diagnostics.debug(&format!(
                    "host {} is not a known platform, pushing without credentials",
                    host.unwrap_or("<none>")
                ));
                return AuthDecision::None;
            }
        };

        match self.env.non_empty_var(env_name) {
            Some(token) => {
                let secret = SecretGuard::wrap(token);
                self.diagnostics
                    .debug(&format!("using {env_name} as {principal} ({secret})"));
                AuthDecision::BasicCredential {
                    principal: principal.to_string(),
                    secret,
                }
            }
            None => {
                self.diagnostics
                    .debug(&format!("{env_name} not set, pushing without credentials"));
                AuthDecision::None
            }
        }
    }

    fn resolve_ssh(&self) -> Result<AuthDecision> {
        let ssh_dir = self.fs.home_dir().map(|home| home.join(SSH_DIR));
        let mut attempts = Vec::new();

        let source = ssh_candidates(ssh_dir.as_deref())
            .into_iter()
            .find_map(|candidate| match self.try_candidate(&candidate) {
                Ok(source) => Some(source),
                Err(reason) => {
                    self.diagnostics
                        .debug(&format!("skipping {candidate}: {reason}"));
                    attempts.push(format!("{candidate}: {reason}"));
                    None
                }
            });

        let Some(source) = source else {
            return Err(Error::NoSshIdentity(attempts.join("; ")));
        };
        self.diagnostics.debug(&format!("using {source}"));

        let host_key_verifier = ssh_dir.as_deref().and_then(|dir| self.load_host_keys(dir));
        Ok(AuthDecision::SshIdentity {
            source,
            host_key_verifier,
        })
    }

    fn try_candidate(&self, candidate: &SshCandidate) -> std::result::Result<SshSource, String> {
        match candidate {
            SshCandidate::Agent => {
                let socket = self
                    .env
                    .non_empty_var(SSH_AUTH_SOCK_ENV)
                    .ok_or_else(|| format!("{SSH_AUTH_SOCK_ENV} not set"))?;
                if !self.fs.exists(Path::new(&socket)) {
                    return Err("agent socket not found".to_string());
                }
                Ok(SshSource::Agent)
            }
            SshCandidate::KeyFile(path) => {
                if !self.fs.exists(path) {
                    return Err("not found".to_string());
                }
                let pem = Zeroizing::new(
                    self.fs
                        .read_to_string(path)
                        .map_err(|e| format!("unreadable: {e}"))?,
                );
                russh_keys::decode_secret_key(&pem, None)
                    .map_err(|_| "could not be loaded without a passphrase".to_string())?;
                Ok(SshSource::KeyFile(path.clone()))
            }
        }
    }

    /// Best effort: a missing or malformed file means no verification
    fn load_host_keys(&self, ssh_dir: &Path) -> Option<HostKeyVerifier> {
        let path = ssh_dir.join(KNOWN_HOSTS);
        if !self.fs.exists(&path) {
            self.diagnostics
                .debug("no known_hosts file, host keys will not be verified");
            return None;
        }
        let parsed = self
            .fs
            .read_to_string(&path)
            .map_err(|e| e.to_string())
            .and_then(|contents| HostKeyVerifier::parse(path.clone(), &contents));
        match parsed {
            Ok(verifier) => Some(verifier),
            Err(reason) => {
                self.diagnostics.warn(&format!(
                    "ignoring {}: {reason}",
                    mask_path(&path.to_string_lossy())
                ));
                None
            }
        }
    }
}

fn ssh_candidates(ssh_dir: Option<&Path>) -> Vec<SshCandidate> {
    let mut candidates = vec![SshCandidate::Agent];
    if let Some(dir) = ssh_dir {
        candidates.extend(
            SSH_KEY_CANDIDATES
                .iter()
                .map(|name| SshCandidate::KeyFile(dir.join(name))),
        );
    }
    candidates
}
