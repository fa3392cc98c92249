//! Device status — the on/off switch position of a device.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Switch position of a device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DeviceStatus {
    On,
    #[default]
    Off,
}

impl DeviceStatus {
    /// The opposite position.
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Self::On => Self::Off,
            Self::Off => Self::On,
        }
    }

    #[must_use]
    pub fn is_on(self) -> bool {
        matches!(self, Self::On)
    }
}

impl std::fmt::Display for DeviceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::On => f.write_str("ON"),
            Self::Off => f.write_str("OFF"),
        }
    }
}

impl FromStr for DeviceStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ON" => Ok(Self::On),
            "OFF" => Ok(Self::Off),
            _ => Err(ValidationError::UnknownStatus(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_default_to_off() {
        assert_eq!(DeviceStatus::default(), DeviceStatus::Off);
    }

    #[test]
    fn should_toggle_between_on_and_off() {
        assert_eq!(DeviceStatus::On.toggled(), DeviceStatus::Off);
        assert_eq!(DeviceStatus::Off.toggled(), DeviceStatus::On);
    }

    #[test]
    fn should_parse_case_insensitively() {
        assert_eq!("on".parse::<DeviceStatus>().unwrap(), DeviceStatus::On);
        assert_eq!(" OFF ".parse::<DeviceStatus>().unwrap(), DeviceStatus::Off);
    }

    #[test]
    fn should_reject_unknown_status() {
        let result = "dimmed".parse::<DeviceStatus>();
        assert!(matches!(result, Err(ValidationError::UnknownStatus(s)) if s == "dimmed"));
    }

    #[test]
    fn should_serialize_uppercase() {
        let json = serde_json::to_string(&DeviceStatus::On).unwrap();
        assert_eq!(json, "\"ON\"");
    }
}
