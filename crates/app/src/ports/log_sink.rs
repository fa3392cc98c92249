//! Log sink port — a single-method destination for formatted log lines.

use std::sync::{Arc, Mutex, PoisonError};

use smarthub_domain::error::{HubError, SinkError};

/// Accepts formatted, human-readable log lines.
pub trait LogSink {
    /// Write one line.
    ///
    /// # Errors
    ///
    /// Returns [`HubError::Sink`] when the line could not be recorded.
    fn write(&self, message: &str) -> Result<(), HubError>;

    /// Write one line, swallowing any failure after tracing it.
    fn emit(&self, message: &str) {
        if let Err(err) = self.write(message) {
            tracing::warn!(error = %err, line = message, "log sink rejected message");
        }
    }
}

/// Sink shared between every component that logs.
pub type SharedSink = Arc<dyn LogSink + Send + Sync>;

impl<T: LogSink + ?Sized> LogSink for Arc<T> {
    fn write(&self, message: &str) -> Result<(), HubError> {
        (**self).write(message)
    }
}

/// Forwards every line to `tracing` at info level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl LogSink for TracingSink {
    fn write(&self, message: &str) -> Result<(), HubError> {
        tracing::info!(target: "smarthub::log", "{message}");
        Ok(())
    }
}

/// Keeps every line in memory, in write order.
#[derive(Debug, Default)]
pub struct MemorySink {
    lines: Mutex<Vec<String>>,
}

impl MemorySink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of every line written so far.
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Drop every recorded line.
    pub fn clear(&self) {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl LogSink for MemorySink {
    fn write(&self, message: &str) -> Result<(), HubError> {
        let mut lines = self.lines.lock().map_err(|_| SinkError {
            reason: "memory sink lock poisoned".to_string(),
        })?;
        lines.push(message.to_string());
        Ok(())
    }
}
