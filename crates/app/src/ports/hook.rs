//! Hook port — side effects run around a named operation.

use smarthub_domain::error::HubError;

/// Best-effort callback run before and after a named operation.
///
/// Errors returned here never reach the caller of the wrapped operation;
/// the interception chain logs them and carries on.
pub trait Hook {
    /// Short name used when reporting a failure of this hook.
    fn name(&self) -> &'static str;

    /// Called before the operation starts.
    ///
    /// # Errors
    ///
    /// Any error is reported as a hook failure and swallowed.
    fn before(&self, operation: &str) -> Result<(), HubError>;

    /// Called after the operation finished, whatever its outcome.
    ///
    /// # Errors
    ///
    /// Any error is reported as a hook failure and swallowed.
    fn after(&self, operation: &str) -> Result<(), HubError>;
}

impl<T: Hook + ?Sized> Hook for std::sync::Arc<T> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn before(&self, operation: &str) -> Result<(), HubError> {
        (**self).before(operation)
    }

    fn after(&self, operation: &str) -> Result<(), HubError> {
        (**self).after(operation)
    }
}
