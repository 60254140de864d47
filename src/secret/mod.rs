//! Secret-safe string handling
//!
//! [`SecretGuard`] keeps raw credentials out of formatted output, and the
//! sanitizer functions scrub credential-shaped text from log lines, error
//! messages and git output. Any logging call site can use them directly.

mod guard;
mod sanitize;

pub use guard::{EMPTY_MARKER, REDACTED_MARKER, SecretGuard, render};
pub use sanitize::{
    GITHUB_TOKEN_MARKER, GITLAB_TOKEN_MARKER, SanitizedError, is_sanitized, mask_path,
    redact_url_credentials, sanitize_error, sanitize_keyed_values, sanitize_text,
};
