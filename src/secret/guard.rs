//! Credential wrapper that never formats its contents

use secrecy::{ExposeSecret, SecretString};
use std::fmt;

/// Rendering of an empty secret
pub const EMPTY_MARKER: &str = "[EMPTY]";

/// Rendering of a secret too short to show any of it
pub const REDACTED_MARKER: &str = "[REDACTED]";

/// Secrets shorter than this render fully redacted
const MIN_PARTIAL_LEN: usize = 8;

/// Number of trailing characters shown for longer secrets
const VISIBLE_SUFFIX_LEN: usize = 4;

/// A raw credential that can't leak through `Display` or `Debug`
///
/// Both formatting traits go through [`render`]. The value lives in a
/// [`SecretString`], zeroized on drop. The only way to the raw value is
/// [`SecretGuard::expose_secret`], whose result must never be logged or put
/// into an error.
///
/// Equality compares the wrapped values; it exists for tests.
pub struct SecretGuard {
    value: SecretString,
}

impl SecretGuard {
    /// Wrap a raw credential
    pub fn wrap(raw: impl Into<String>) -> Self {
        Self {
            value: SecretString::new(raw.into()),
        }
    }

    /// Raw credential, for handing to a child process environment only
    pub fn expose_secret(&self) -> &str {
        self.value.expose_secret()
    }
}

impl Clone for SecretGuard {
    fn clone(&self) -> Self {
        Self::wrap(self.expose_secret())
    }
}

impl PartialEq for SecretGuard {
    fn eq(&self, other: &Self) -> bool {
        self.expose_secret() == other.expose_secret()
    }
}

impl Eq for SecretGuard {}

impl fmt::Display for SecretGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&render(self))
    }
}

impl fmt::Debug for SecretGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SecretGuard").field(&render(self)).finish()
    }
}

/// Safe textual form of a secret
///
/// Empty values render as [`EMPTY_MARKER`], values under 8 characters as
/// [`REDACTED_MARKER`], and anything longer as the marker followed by the
/// last 4 characters, so a stale token can be told apart from a wrong one.
pub fn render(guard: &SecretGuard) -> String {
    let raw = guard.expose_secret();
    let char_count = raw.chars().count();
    if char_count == 0 {
        return EMPTY_MARKER.to_string();
    }
    if char_count < MIN_PARTIAL_LEN {
        return REDACTED_MARKER.to_string();
    }
    let suffix: String = raw.chars().skip(char_count - VISIBLE_SUFFIX_LEN).collect();
    format!("{REDACTED_MARKER}...{suffix}")
}
