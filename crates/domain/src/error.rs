//! Common error types used across the workspace.
//!
//! Each failure kind is a small struct carrying the data needed to describe
//! it, and [`HubError`] aggregates them through `#[from]` conversions.

use crate::id::{DeviceId, RuleId, UserId};

/// Top-level error for every smarthub operation.
#[derive(Debug, thiserror::Error)]
pub enum HubError {
    #[error("validation error")]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    NotFound(#[from] NotFoundError),

    #[error(transparent)]
    DuplicateKey(#[from] DuplicateKeyError),

    #[error(transparent)]
    DanglingReference(#[from] DanglingReferenceError),

    #[error(transparent)]
    HookFailure(#[from] HookFailureError),

    #[error(transparent)]
    Delivery(#[from] DeliveryError),

    #[error(transparent)]
    Sink(#[from] SinkError),
}

/// A domain invariant was violated while building a value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("identifier is required")]
    MissingId,

    #[error("rule condition is required")]
    MissingCondition,

    #[error("rule action is required")]
    MissingAction,

    #[error("name must not be empty")]
    EmptyName,

    #[error("device type must not be empty")]
    EmptyDeviceType,

    #[error("notification message must not be empty")]
    EmptyMessage,

    #[error("unknown role {0:?}, expected HomeOwner or Admin")]
    UnknownRole(String),

    #[error("unknown device status {0:?}, expected ON or OFF")]
    UnknownStatus(String),
}

/// Lookup by identifier found nothing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{entity} {id} not found")]
pub struct NotFoundError {
    pub entity: &'static str,
    pub id: String,
}

/// Insertion collided with an existing identifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{entity} {id} already exists")]
pub struct DuplicateKeyError {
    pub entity: &'static str,
    pub id: String,
}

/// A rule references a device that is no longer registered.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("rule {rule_id} references missing device {device_id}")]
pub struct DanglingReferenceError {
    pub rule_id: RuleId,
    pub device_id: DeviceId,
}

/// An interception hook failed internally.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("hook {hook} failed around {operation}: {reason}")]
pub struct HookFailureError {
    pub hook: &'static str,
    pub operation: String,
    pub reason: String,
}

/// A notification could not be delivered to one subscriber.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("delivery to user {user_id} failed: {reason}")]
pub struct DeliveryError {
    pub user_id: UserId,
    pub reason: String,
}

/// The log sink rejected a message.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("log sink failed: {reason}")]
pub struct SinkError {
    pub reason: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_describe_not_found_with_entity_and_id() {
        let err: HubError = NotFoundError {
            entity: "Device",
            id: "7".to_string(),
        }
        .into();
        assert_eq!(err.to_string(), "Device 7 not found");
    }

    #[test]
    fn should_describe_dangling_reference() {
        let err = DanglingReferenceError {
            rule_id: RuleId::new(201),
            device_id: DeviceId::new(2),
        };
        assert_eq!(err.to_string(), "rule 201 references missing device 2");
    }

    #[test]
    fn should_convert_validation_error_via_from() {
        let err: HubError = ValidationError::EmptyName.into();
        assert!(matches!(err, HubError::Validation(ValidationError::EmptyName)));
    }
}
