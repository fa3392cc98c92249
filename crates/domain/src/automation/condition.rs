//! Condition — the guard that decides whether a rule fires.

use serde::{Deserialize, Serialize};

use crate::device::{Device, DeviceStatus};
use crate::id::DeviceId;

/// A predicate over the current state of one device.
///
/// Conditions hold only the device identifier; the engine resolves it
/// against the registry each time the rule is evaluated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Condition {
    /// Requires the device to be in the given status.
    StatusIs {
        device_id: DeviceId,
        status: DeviceStatus,
    },
}

impl Condition {
    /// The device this condition reads.
    #[must_use]
    pub fn device_id(&self) -> DeviceId {
        match self {
            Self::StatusIs { device_id, .. } => *device_id,
        }
    }

    /// Evaluate against the resolved device.
    #[must_use]
    pub fn is_satisfied_by(&self, device: &Device) -> bool {
        match self {
            Self::StatusIs { status, .. } => device.status == *status,
        }
    }
}

impl std::fmt::Display for Condition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::StatusIs { device_id, status } => write!(f, "status_is({device_id}, {status})"),
        }
    }
}
