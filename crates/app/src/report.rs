//! Report aggregator — read-only projection over the registries.

use smarthub_domain::report::{DeviceLine, Report, UserLine};

use crate::device_registry::DeviceRegistry;
use crate::rule_engine::RuleEngine;
use crate::user_registry::UserRegistry;

/// Summarise devices, users and rules in registration order.
#[must_use]
pub fn build_report(devices: &DeviceRegistry, users: &UserRegistry, rules: &RuleEngine) -> Report {
    Report {
        devices: devices
            .list_all()
            .map(|d| DeviceLine {
                id: d.id,
                name: d.name.clone(),
                device_type: d.device_type.clone(),
                status: d.status,
            })
            .collect(),
        users: users
            .list_all()
            .map(|u| UserLine {
                id: u.id,
                name: u.name.clone(),
                role: u.role,
            })
            .collect(),
        rules: rules.list_rules().map(|r| r.id).collect(),
    }
}
