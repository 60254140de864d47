//! Redaction of credential-shaped text
//!
//! Patterns compile once per process behind a `LazyLock`; every function here
//! is pure afterwards and safe to call from any thread.

use super::guard::REDACTED_MARKER;
use regex::Regex;
use serde_json::Value;
use std::collections::HashMap;
use std::hash::BuildHasher;
use std::path::{Component, Path};
use std::sync::LazyLock;
use thiserror::Error;

/// Replacement for GitLab personal access tokens
pub const GITLAB_TOKEN_MARKER: &str = "[REDACTED_GITLAB_TOKEN]";

/// Replacement for GitHub tokens
pub const GITHUB_TOKEN_MARKER: &str = "[REDACTED_GITHUB_TOKEN]";

const GITLAB_PREFIXES: &[&str] = &["glpat-"];
const GITHUB_PREFIXES: &[&str] = &["ghp_", "gho_", "github_pat_"];

/// Key fragments that mark a keyed value as secret
const SENSITIVE_KEY_FRAGMENTS: &[&str] = &[
    "token",
    "password",
    "secret",
    "api_key",
    "apikey",
    "auth",
    "credential",
    "authorization",
];

const SSH_DIR: &str = ".ssh";

static GITLAB_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"glpat-[A-Za-z0-9_\-]{6,}").expect("valid regex"));

static GITHUB_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:ghp_|gho_|github_pat_)[A-Za-z0-9_]{20,}").expect("valid regex")
});

static AUTH_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(authorization:\s*(?:bearer|basic)\s+)\S+").expect("valid regex")
});

static GENERIC_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[A-Za-z0-9+/=]{40,200}").expect("valid regex"));

/// An error whose message has been through [`sanitize_text`]
///
/// The type itself is the marker: use [`is_sanitized`] to detect it anywhere
/// in a source chain.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct SanitizedError {
    message: String,
}

impl SanitizedError {
    /// Sanitize an arbitrary message into an error
    pub fn new(message: &str) -> Self {
        Self {
            message: sanitize_text(message),
        }
    }

    /// The sanitized message
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Redact tokens and authorization headers from free text
///
/// Applied in order: GitLab tokens, GitHub tokens, `Authorization:` headers,
/// then long opaque base64-looking runs. The last step is skipped when the
/// text mentions any platform token prefix or when a header was redacted, at
/// the cost of missing a generic secret that shares a string with a platform
/// token. Markers break base64 runs, so a second pass changes nothing.
pub fn sanitize_text(input: &str) -> String {
    let has_platform_prefix = GITLAB_PREFIXES
        .iter()
        .chain(GITHUB_PREFIXES)
        .any(|prefix| input.contains(prefix));

    let text = GITLAB_TOKEN.replace_all(input, GITLAB_TOKEN_MARKER);
    let text = GITHUB_TOKEN.replace_all(&text, GITHUB_TOKEN_MARKER);
    let header_matched = AUTH_HEADER.is_match(&text);
    let text = AUTH_HEADER.replace_all(&text, format!("${{1}}{REDACTED_MARKER}"));

    if has_platform_prefix || header_matched {
        return text.into_owned();
    }
    GENERIC_TOKEN
        .replace_all(&text, REDACTED_MARKER)
        .into_owned()
}

/// Sanitize an optional error into a [`SanitizedError`]
///
/// `None` stays `None`.
pub fn sanitize_error<E>(err: Option<&E>) -> Option<SanitizedError>
where
    E: std::error::Error + ?Sized,
{
    err.map(|e| SanitizedError::new(&e.to_string()))
}

/// Whether `err` or anything in its source chain is a [`SanitizedError`]
pub fn is_sanitized(err: &(dyn std::error::Error + 'static)) -> bool {
    let mut current = Some(err);
    while let Some(e) = current {
        if e.is::<SanitizedError>() {
            return true;
        }
        current = e.source();
    }
    false
}

/// Redact a map of structured log fields
///
/// Keys that look secret (case-insensitive substring match) get
/// [`REDACTED_MARKER`] whatever their value type; other string values go
/// through [`sanitize_text`]; everything else passes through.
pub fn sanitize_keyed_values<S>(
    values: Option<&HashMap<String, Value, S>>,
) -> Option<HashMap<String, Value, S>>
where
    S: BuildHasher + Clone,
{
    let values = values?;
    let mut out = HashMap::with_capacity_and_hasher(values.len(), values.hasher().clone());
    for (key, value) in values {
        let sanitized = if is_sensitive_key(key) {
            Value::String(REDACTED_MARKER.to_string())
        } else if let Value::String(s) = value {
            Value::String(sanitize_text(s))
        } else {
            value.clone()
        };
        out.insert(key.clone(), sanitized);
    }
    Some(out)
}

fn is_sensitive_key(key: &str) -> bool {
    let key = key.to_lowercase();
    SENSITIVE_KEY_FRAGMENTS
        .iter()
        .any(|fragment| key.contains(fragment))
}

/// Shorten a key path for display
///
/// Paths inside an `.ssh` directory become `~/.ssh/<file>`; anything else
/// is reduced to its file name.
pub fn mask_path(path: &str) -> String {
    if path.is_empty() {
        return String::new();
    }
    let path = Path::new(path);
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let in_ssh_dir = path
        .components()
        .any(|c| matches!(c, Component::Normal(name) if name == SSH_DIR));
    if in_ssh_dir {
        format!("~/{SSH_DIR}/{file_name}")
    } else {
        file_name
    }
}

/// Strip userinfo from a URL so it can be displayed
///
/// Non-URL strings (such as scp-style `git@host:path`) are returned unchanged.
pub fn redact_url_credentials(raw: &str) -> String {
    let Ok(mut parsed) = url::Url::parse(raw) else {
        return raw.to_string();
    };
    let username_may_be_token = parsed.scheme().starts_with("http") && !parsed.username().is_empty();
    if parsed.password().is_none() && !username_may_be_token {
        return raw.to_string();
    }
    if parsed.set_password(None).is_err() || parsed.set_username("").is_err() {
        return sanitize_text(raw);
    }
    parsed.to_string()
}
