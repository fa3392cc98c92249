//! Interception chain — ordered hooks around named operations.
//!
//! [`InterceptionChain::enter`] runs every `before` hook and returns a guard;
//! dropping the guard runs every `after` hook. Holding the guard for the
//! duration of the operation means `after` runs on every exit path,
//! including early `?` returns.

use std::sync::{Mutex, PoisonError};

use indexmap::IndexMap;

use smarthub_domain::error::{HookFailureError, HubError};

use crate::ports::{Hook, LogSink, SharedSink};

type BoxedHook = Box<dyn Hook + Send + Sync>;

/// Hooks run around every intercepted operation, in registration order.
#[derive(Default)]
pub struct InterceptionChain {
    hooks: Vec<BoxedHook>,
}

impl InterceptionChain {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a hook to the chain.
    #[must_use]
    pub fn with_hook(mut self, hook: impl Hook + Send + Sync + 'static) -> Self {
        self.push(hook);
        self
    }

    /// Append a hook to the chain.
    pub fn push(&mut self, hook: impl Hook + Send + Sync + 'static) {
        self.hooks.push(Box::new(hook));
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }

    /// Run every `before` hook. Never fails.
    pub fn before(&self, operation: &str) {
        for hook in &self.hooks {
            if let Err(err) = hook.before(operation) {
                report_failure(hook.name(), operation, &err);
            }
        }
    }

    /// Run every `after` hook. Never fails.
    pub fn after(&self, operation: &str) {
        for hook in &self.hooks {
            if let Err(err) = hook.after(operation) {
                report_failure(hook.name(), operation, &err);
            }
        }
    }

    /// Run the `before` hooks and return a guard that runs the `after`
    /// hooks when dropped.
    #[must_use = "the after hooks run as soon as the guard is dropped"]
    pub fn enter<'a>(&'a self, operation: &'a str) -> Intercepted<'a> {
        self.before(operation);
        Intercepted {
            chain: self,
            operation,
        }
    }

    /// Run `f` between the `before` and `after` hooks of `operation`.
    pub fn intercept<T>(&self, operation: &str, f: impl FnOnce() -> T) -> T {
        let _guard = self.enter(operation);
        f()
    }
}

/// Guard returned by [`InterceptionChain::enter`].
pub struct Intercepted<'a> {
    chain: &'a InterceptionChain,
    operation: &'a str,
}

impl Intercepted<'_> {
    /// Name of the operation being intercepted.
    #[must_use]
    pub fn operation(&self) -> &str {
        self.operation
    }
}

impl Drop for Intercepted<'_> {
    fn drop(&mut self) {
        self.chain.after(self.operation);
    }
}

fn report_failure(hook: &'static str, operation: &str, err: &HubError) {
    let failure = HookFailureError {
        hook,
        operation: operation.to_string(),
        reason: err.to_string(),
    };
    tracing::warn!(error = %failure, "interception hook failed");
}

// ── Built-in hooks ─────────────────────────────────────────────────

/// Writes `Pre-processing: <op>` and `Post-processing: <op>` lines.
pub struct LoggingHook {
    sink: SharedSink,
}

impl LoggingHook {
    #[must_use]
    pub fn new(sink: SharedSink) -> Self {
        Self { sink }
    }
}

impl Hook for LoggingHook {
    fn name(&self) -> &'static str {
        "logging"
    }

    fn before(&self, operation: &str) -> Result<(), HubError> {
        self.sink.write(&format!("Pre-processing: {operation}"))
    }

    fn after(&self, operation: &str) -> Result<(), HubError> {
        self.sink.write(&format!("Post-processing: {operation}"))
    }
}

/// Started/finished counts for one operation name.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct OperationCounts {
    pub started: u64,
    pub finished: u64,
}

/// Counts how often each operation started and finished.
///
/// Share it through an `Arc` to read the counters back.
#[derive(Debug, Default)]
pub struct MetricsHook {
    counts: Mutex<IndexMap<String, OperationCounts>>,
}

impl MetricsHook {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Counters for `operation`, zero if it never ran.
    #[must_use]
    pub fn counts(&self, operation: &str) -> OperationCounts {
        self.counts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(operation)
            .copied()
            .unwrap_or_default()
    }

    /// Counters of every operation seen, in first-seen order.
    #[must_use]
    pub fn snapshot(&self) -> Vec<(String, OperationCounts)> {
        self.counts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(name, counts)| (name.clone(), *counts))
            .collect()
    }

    fn record(
        &self,
        operation: &str,
        bump: impl FnOnce(&mut OperationCounts),
    ) -> Result<(), HubError> {
        let mut counts = self.counts.lock().map_err(|_| HookFailureError {
            hook: "metrics",
            operation: operation.to_string(),
            reason: "counter lock poisoned".to_string(),
        })?;
        bump(counts.entry(operation.to_string()).or_default());
        Ok(())
    }
}

impl Hook for MetricsHook {
    fn name(&self) -> &'static str {
        "metrics"
    }

    fn before(&self, operation: &str) -> Result<(), HubError> {
        self.record(operation, |c| c.started += 1)
    }

    fn after(&self, operation: &str) -> Result<(), HubError> {
        self.record(operation, |c| c.finished += 1)
    }
}
