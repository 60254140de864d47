//! Remote URL parsing and platform detection

use crate::config::PlatformHosts;
use crate::error::{Error, Result};
use crate::secret::redact_url_credentials;
use crate::types::{Platform, RemoteScheme, RemoteUrl};
use url::Url;

/// Split a remote URL into scheme and host
///
/// Understands `https://`, `ssh://` and scp-style `user@host:path`. Anything
/// else is reported as [`RemoteScheme::Other`].
pub fn parse_remote_url(raw: &str) -> RemoteUrl {
    let raw = raw.trim();

    if let Some(scp) = parse_scp_like(raw) {
        return scp;
    }

    let Ok(url) = Url::parse(raw) else {
        return RemoteUrl {
            scheme: RemoteScheme::Other("unknown".to_string()),
            host: None,
        };
    };

    let scheme = match url.scheme() {
        "https" => RemoteScheme::Https,
        "ssh" | "git+ssh" | "ssh+git" => RemoteScheme::Ssh,
        other => RemoteScheme::Other(other.to_lowercase()),
    };
    RemoteUrl {
        scheme,
        host: url.host_str().map(str::to_lowercase),
    }
}

/// `user@host:path`, with no `://` and the colon before any slash
fn parse_scp_like(raw: &str) -> Option<RemoteUrl> {
    if raw.contains("://") {
        return None;
    }
    let (user_host, _) = raw.split_once(':')?;
    let (user, host) = user_host.split_once('@')?;
    if user.is_empty() || host.is_empty() || host.contains('/') {
        return None;
    }
    Some(RemoteUrl {
        scheme: RemoteScheme::Ssh,
        host: Some(host.to_lowercase()),
    })
}

/// Which platform serves `host`, if any
///
/// A host matches a configured domain exactly or as a subdomain.
pub fn detect_platform(host: &str, hosts: &PlatformHosts) -> Option<Platform> {
    let host = host.to_lowercase();
    let matches = |domains: &[String]| {
        domains.iter().any(|domain| {
            let domain = domain.to_lowercase();
            host == domain || host.ends_with(&format!(".{domain}"))
        })
    };

    if matches(&hosts.gitlab) {
        Some(Platform::GitLab)
    } else if matches(&hosts.github) {
        Some(Platform::GitHub)
    } else {
        None
    }
}

/// Detect the platform for a remote URL, failing for unknown hosts
pub fn platform_for_remote(raw: &str, hosts: &PlatformHosts) -> Result<Platform> {
    parse_remote_url(raw)
        .host
        .and_then(|host| detect_platform(&host, hosts))
        .ok_or_else(|| Error::UnsupportedPlatform(redact_url_credentials(raw)))
}
