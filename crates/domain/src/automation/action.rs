//! Action — the effect performed when a rule fires.

use serde::{Deserialize, Serialize};

use crate::device::DeviceStatus;
use crate::id::DeviceId;

/// An operation executed when the rule's condition holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Action {
    /// Switch a device to the given status.
    SetStatus {
        device_id: DeviceId,
        status: DeviceStatus,
    },
    /// Flip a device to the opposite status.
    Toggle { device_id: DeviceId },
    /// Emit a message without touching any device.
    Notify { message: String },
}

impl Action {
    /// The device this action mutates, if any.
    #[must_use]
    pub fn device_id(&self) -> Option<DeviceId> {
        match self {
            Self::SetStatus { device_id, .. } | Self::Toggle { device_id } => Some(*device_id),
            Self::Notify { .. } => None,
        }
    }

    /// The status the target device ends up in, given its current status.
    #[must_use]
    pub fn resulting_status(&self, current: DeviceStatus) -> Option<DeviceStatus> {
        match self {
            Self::SetStatus { status, .. } => Some(*status),
            Self::Toggle { .. } => Some(current.toggled()),
            Self::Notify { .. } => None,
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SetStatus { device_id, status } => write!(f, "set_status({device_id}, {status})"),
            Self::Toggle { device_id } => write!(f, "toggle({device_id})"),
            Self::Notify { message } => write!(f, "notify({message:?})"),
        }
    }
}
