//! Diagnostic message sink
//!
//! Everything the git layer wants to tell the user goes through
//! [`Diagnostics`], which sanitizes the message before any sink sees it.

use crate::secret::sanitize_text;
use std::sync::Arc;
use tracing::Level;

/// Destination for diagnostic messages
///
/// Implementations receive text that has already been sanitized.
pub trait DiagnosticSink: Send + Sync {
    /// Record one message
    fn emit(&self, level: Level, message: &str);
}

/// Forwards diagnostics to `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn emit(&self, level: Level, message: &str) {
        match level {
            Level::ERROR => tracing::error!("{message}"),
            Level::WARN => tracing::warn!("{message}"),
            Level::INFO => tracing::info!("{message}"),
            Level::DEBUG => tracing::debug!("{message}"),
            _ => tracing::trace!("{message}"),
        }
    }
}

/// Sanitizing front for a [`DiagnosticSink`]
#[derive(Clone)]
pub struct Diagnostics {
    sink: Arc<dyn DiagnosticSink>,
}

impl Diagnostics {
    /// Wrap a sink
    pub fn new(sink: Arc<dyn DiagnosticSink>) -> Self {
        Self { sink }
    }

    /// Emit at `level` after sanitizing
    pub fn emit(&self, level: Level, message: &str) {
        self.sink.emit(level, &sanitize_text(message));
    }

    /// Emit at debug level
    pub fn debug(&self, message: &str) {
        self.emit(Level::DEBUG, message);
    }

    /// Emit at info level
    pub fn info(&self, message: &str) {
        self.emit(Level::INFO, message);
    }

    /// Emit at warn level
    pub fn warn(&self, message: &str) {
        self.emit(Level::WARN, message);
    }
}

impl Default for Diagnostics {
    fn default() -> Self {
        Self::new(Arc::new(TracingSink))
    }
}

impl std::fmt::Debug for Diagnostics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Diagnostics").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recorder(Mutex<Vec<(Level, String)>>);

    impl DiagnosticSink for Recorder {
        fn emit(&self, level: Level, message: &str) {
            self.0.lock().unwrap().push((level, message.to_string()));
        }
    }

    #[test]
    fn test_messages_sanitized_before_sink() {
        let recorder = Arc::new(Recorder::default());
        let diagnostics = Diagnostics::new(recorder.clone());

        diagnostics.warn("push failed for ghp_abcdefghijklmnopqrstuvwxyz");

        let messages = recorder.0.lock().unwrap();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].0, Level::WARN);
        assert_eq!(messages[0].1, "push failed for [REDACTED_GITHUB_TOKEN]");
    }
}
