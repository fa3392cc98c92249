//! Report — a read-only summary of the whole home.

use serde::Serialize;

use crate::device::DeviceStatus;
use crate::id::{DeviceId, RuleId, UserId};
use crate::user::Role;

/// One device line of a [`Report`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeviceLine {
    pub id: DeviceId,
    pub name: String,
    pub device_type: String,
    pub status: DeviceStatus,
}

/// One user line of a [`Report`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserLine {
    pub id: UserId,
    pub name: String,
    pub role: Role,
}

/// Snapshot of devices, users and rules at the time it was built.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Report {
    pub devices: Vec<DeviceLine>,
    pub users: Vec<UserLine>,
    pub rules: Vec<RuleId>,
}

impl Report {
    /// Number of devices currently switched on.
    #[must_use]
    pub fn devices_on(&self) -> usize {
        self.devices.iter().filter(|d| d.status.is_on()).count()
    }
}

impl std::fmt::Display for Report {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "Devices: {} ({} on)",
            self.devices.len(),
            self.devices_on()
        )?;
        for d in &self.devices {
            writeln!(f, "  {} - {}, {}, Status: {}", d.id, d.name, d.device_type, d.status)?;
        }
        writeln!(f, "Users: {}", self.users.len())?;
        for u in &self.users {
            writeln!(f, "  {} - {} ({})", u.id, u.name, u.role)?;
        }
        write!(f, "Automation rules: {}", self.rules.len())?;
        for id in &self.rules {
            write!(f, "\n  Rule ID: {id}")?;
        }
        Ok(())
    }
}
