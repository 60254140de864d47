//! Host-key verification material from `known_hosts`

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use std::path::{Path, PathBuf};

const MARKERS: &[&str] = &["@cert-authority", "@revoked"];

/// A parsed `known_hosts` file, handed to ssh as its host-key store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostKeyVerifier {
    path: PathBuf,
    entries: usize,
}

impl HostKeyVerifier {
    /// Parse `contents` (read from `path`)
    ///
    /// Fails on the first malformed line, reporting its 1-based number.
    pub fn parse(path: PathBuf, contents: &str) -> Result<Self, String> {
        let mut entries = 0;
        for (idx, line) in contents.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            parse_entry(line).map_err(|reason| format!("line {}: {reason}", idx + 1))?;
            entries += 1;
        }
        Ok(Self { path, entries })
    }

    /// Location of the host-keys file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of host entries
    pub const fn entries(&self) -> usize {
        self.entries
    }
}

fn parse_entry(line: &str) -> Result<(), String> {
    let mut fields = line.split_whitespace();
    let mut hosts = fields.next().ok_or("empty entry")?;
    if hosts.starts_with('@') {
        if !MARKERS.contains(&hosts) {
            return Err(format!("unknown marker {hosts}"));
        }
        hosts = fields.next().ok_or("missing host pattern")?;
    }
    if hosts.is_empty() {
        return Err("missing host pattern".to_string());
    }
    fields.next().ok_or("missing key type")?;
    let blob = fields.next().ok_or("missing key data")?;
    STANDARD
        .decode(blob)
        .map_err(|e| format!("invalid key data: {e}"))?;
    Ok(())
}
