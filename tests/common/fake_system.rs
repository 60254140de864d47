//! In-memory environment, filesystem and diagnostic sink
//!
//! These are test utilities - not all may be used by every test binary.

#![allow(dead_code)]

use mergeflow::diagnostics::{DiagnosticSink, Diagnostics};
use mergeflow::system::{Environment, FileSystem};
use std::collections::{HashMap, HashSet};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing::Level;

/// Read a file from `tests/fixtures`
pub fn fixture(name: &str) -> String {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name);
    std::fs::read_to_string(&path).unwrap_or_else(|e| panic!("fixture {}: {e}", path.display()))
}

/// Environment backed by a map
#[derive(Debug, Default)]
pub struct FakeEnvironment {
    vars: HashMap<String, String>,
}

impl FakeEnvironment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: &str, value: &str) -> Self {
        self.vars.insert(name.to_string(), value.to_string());
        self
    }
}

impl Environment for FakeEnvironment {
    fn var(&self, name: &str) -> Option<String> {
        self.vars.get(name).cloned()
    }
}

/// Filesystem with a fixed home directory, files and bare paths
#[derive(Debug, Default)]
pub struct FakeFileSystem {
    home: Option<PathBuf>,
    files: HashMap<PathBuf, String>,
    other_paths: HashSet<PathBuf>,
}

impl FakeFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Filesystem whose home is `/home/dev`
    pub fn with_home() -> Self {
        Self {
            home: Some(PathBuf::from("/home/dev")),
            ..Self::default()
        }
    }

    pub fn ssh_dir(&self) -> PathBuf {
        self.home
            .clone()
            .expect("fake filesystem has no home")
            .join(".ssh")
    }

    /// Add a file under `~/.ssh`
    pub fn with_ssh_file(self, name: &str, contents: &str) -> Self {
        let path = self.ssh_dir().join(name);
        self.with_file(path, contents)
    }

    pub fn with_file(mut self, path: impl Into<PathBuf>, contents: &str) -> Self {
        self.files.insert(path.into(), contents.to_string());
        self
    }

    /// A path that exists but is not a readable file (e.g. an agent socket)
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.other_paths.insert(path.into());
        self
    }
}

impl FileSystem for FakeFileSystem {
    fn home_dir(&self) -> Option<PathBuf> {
        self.home.clone()
    }

    fn exists(&self, path: &Path) -> bool {
        self.files.contains_key(path) || self.other_paths.contains(path)
    }

    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, path.display().to_string()))
    }
}

/// Diagnostic sink that remembers every message
#[derive(Debug, Default)]
pub struct RecordingSink {
    messages: Mutex<Vec<(Level, String)>>,
}

impl RecordingSink {
    /// A sink plus a [`Diagnostics`] writing into it
    pub fn pair() -> (Arc<Self>, Diagnostics) {
        let sink = Arc::new(Self::default());
        let diagnostics = Diagnostics::new(sink.clone());
        (sink, diagnostics)
    }

    pub fn messages(&self) -> Vec<(Level, String)> {
        self.messages.lock().unwrap().clone()
    }

    pub fn all_text(&self) -> String {
        self.messages()
            .into_iter()
            .map(|(_, m)| m)
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn has_warning_containing(&self, needle: &str) -> bool {
        self.messages()
            .iter()
            .any(|(level, m)| *level == Level::WARN && m.contains(needle))
    }
}

impl DiagnosticSink for RecordingSink {
    fn emit(&self, level: Level, message: &str) {
        self.messages
            .lock()
            .unwrap()
            .push((level, message.to_string()));
    }
}
