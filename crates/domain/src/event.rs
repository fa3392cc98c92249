//! Event — an immutable record of something that happened.
//!
//! Events are produced when devices or users change, when rules are added
//! or removed, and when a rule fires. They are broadcast to subscribed users.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::id::EventId;

/// UTC timestamp attached to every event.
pub type Timestamp = DateTime<Utc>;

/// Kind of event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    DeviceAdded,
    DeviceUpdated,
    DeviceRemoved,
    UserRegistered,
    UserRemoved,
    RuleAdded,
    RuleRemoved,
    RuleFired,
}

impl std::fmt::Display for EventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::DeviceAdded => "device_added",
            Self::DeviceUpdated => "device_updated",
            Self::DeviceRemoved => "device_removed",
            Self::UserRegistered => "user_registered",
            Self::UserRemoved => "user_removed",
            Self::RuleAdded => "rule_added",
            Self::RuleRemoved => "rule_removed",
            Self::RuleFired => "rule_fired",
        };
        f.write_str(name)
    }
}

/// A single event record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    pub event_type: EventType,
    /// Human-readable line, the same text that goes to the log sink.
    pub message: String,
    #[serde(default)]
    pub data: serde_json::Value,
    pub timestamp: Timestamp,
}

impl Event {
    /// Create an event stamped with the current time.
    #[must_use]
    pub fn new(event_type: EventType, message: impl Into<String>, data: serde_json::Value) -> Self {
        Self {
            id: EventId::new(),
            event_type,
            message: message.into(),
            data,
            timestamp: Utc::now(),
        }
    }
}

impl std::fmt::Display for Event {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.event_type, self.message)
    }
}
