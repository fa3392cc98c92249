//! Automation rule engine — stores rules and runs evaluation passes.
//!
//! An evaluation pass visits every rule in registration order and checks
//! its condition against the *live* device registry. Actions run as soon as
//! their condition holds, so a rule earlier in the pass can change the
//! outcome of a later one in the same pass. Evaluation only happens when a
//! caller asks for it.

use indexmap::IndexMap;

use smarthub_domain::automation::{Action, AutomationRule};
use smarthub_domain::device::{Device, DeviceUpdate};
use smarthub_domain::error::{DanglingReferenceError, DuplicateKeyError, HubError, NotFoundError};
use smarthub_domain::event::{Event, EventType};
use smarthub_domain::id::{DeviceId, RuleId};

use crate::device_registry::DeviceRegistry;
use crate::ports::{LogSink, SharedSink};

/// A rule whose action ran during a pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Firing {
    pub rule_id: RuleId,
    /// The one event emitted for this firing.
    pub event: Event,
}

/// Outcome of one [`RuleEngine::evaluate_all`] pass.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct EvaluationReport {
    /// Rules that fired, in firing order.
    pub fired: Vec<Firing>,
    /// Rules skipped because they reference a device that no longer exists.
    pub skipped: Vec<DanglingReferenceError>,
}

impl EvaluationReport {
    /// Ids of the rules that fired, in firing order.
    #[must_use]
    pub fn fired_ids(&self) -> Vec<RuleId> {
        self.fired.iter().map(|f| f.rule_id).collect()
    }

    /// Whether nothing fired and nothing was skipped.
    #[must_use]
    pub fn is_quiet(&self) -> bool {
        self.fired.is_empty() && self.skipped.is_empty()
    }
}

/// Owns the registered rules.
///
/// Rules reference devices by id only; the engine never owns a device.
pub struct RuleEngine {
    rules: IndexMap<RuleId, AutomationRule>,
    sink: SharedSink,
}

impl RuleEngine {
    /// Create an empty engine that logs firings to `sink`.
    #[must_use]
    pub fn new(sink: SharedSink) -> Self {
        Self {
            rules: IndexMap::new(),
            sink,
        }
    }

    /// Register a rule at the end of the evaluation order.
    ///
    /// # Errors
    ///
    /// Returns [`HubError::DuplicateKey`] if a rule with the same id exists,
    /// or [`HubError::Validation`] if the rule breaks an invariant.
    pub fn add_rule(&mut self, rule: AutomationRule) -> Result<&AutomationRule, HubError> {
        rule.validate()?;
        if self.rules.contains_key(&rule.id) {
            return Err(DuplicateKeyError {
                entity: "Rule",
                id: rule.id.to_string(),
            }
            .into());
        }
        tracing::debug!(rule_id = %rule.id, condition = %rule.condition, action = %rule.action, "rule registered");
        Ok(&*self.rules.entry(rule.id).or_insert(rule))
    }

    /// Remove a rule; the remaining rules keep their order.
    ///
    /// # Errors
    ///
    /// Returns [`HubError::NotFound`] when no rule with `id` exists.
    pub fn delete_rule(&mut self, id: RuleId) -> Result<AutomationRule, HubError> {
        let rule = self.rules.shift_remove(&id).ok_or_else(|| NotFoundError {
            entity: "Rule",
            id: id.to_string(),
        })?;
        tracing::debug!(rule_id = %id, "rule removed");
        Ok(rule)
    }

    /// Look up a rule by id.
    ///
    /// # Errors
    ///
    /// Returns [`HubError::NotFound`] when no rule with `id` exists.
    pub fn get_rule(&self, id: RuleId) -> Result<&AutomationRule, HubError> {
        self.rules.get(&id).ok_or_else(|| {
            NotFoundError {
                entity: "Rule",
                id: id.to_string(),
            }
            .into()
        })
    }

    /// Every rule in evaluation order.
    pub fn list_rules(&self) -> impl ExactSizeIterator<Item = &AutomationRule> + Clone + '_ {
        self.rules.values()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Run one evaluation pass over every rule, in registration order.
    ///
    /// Each condition reads the current state of `devices`, including
    /// changes made by actions earlier in the same pass. A rule that
    /// references a missing device is logged and skipped; the pass always
    /// visits every rule.
    #[tracing::instrument(skip_all, fields(rules = self.rules.len()))]
    pub fn evaluate_all(&self, devices: &mut DeviceRegistry) -> EvaluationReport {
        let mut report = EvaluationReport::default();
        for rule in self.rules.values() {
            match evaluate_rule(rule, devices) {
                Ok(Some(event)) => {
                    self.sink.emit(&event.message);
                    report.fired.push(Firing {
                        rule_id: rule.id,
                        event,
                    });
                }
                Ok(None) => {
                    tracing::trace!(rule_id = %rule.id, "condition not met");
                }
                Err(err) => {
                    tracing::warn!(rule_id = %rule.id, error = %err, "rule skipped");
                    self.sink.emit(&format!("Rule {} skipped: {err}", rule.id));
                    report.skipped.push(err);
                }
            }
        }
        tracing::debug!(
            fired = report.fired.len(),
            skipped = report.skipped.len(),
            "evaluation pass finished"
        );
        report
    }
}

fn evaluate_rule(
    rule: &AutomationRule,
    devices: &mut DeviceRegistry,
) -> Result<Option<Event>, DanglingReferenceError> {
    let watched = resolve(rule, rule.condition.device_id(), devices)?;
    if !rule.condition.is_satisfied_by(watched) {
        return Ok(None);
    }
    execute(rule, devices).map(Some)
}

fn resolve<'a>(
    rule: &AutomationRule,
    device_id: DeviceId,
    devices: &'a DeviceRegistry,
) -> Result<&'a Device, DanglingReferenceError> {
    devices.get(device_id).map_err(|_| DanglingReferenceError {
        rule_id: rule.id,
        device_id,
    })
}

fn execute(
    rule: &AutomationRule,
    devices: &mut DeviceRegistry,
) -> Result<Event, DanglingReferenceError> {
    let device_id = match &rule.action {
        Action::Notify { message } => {
            return Ok(Event::new(
                EventType::RuleFired,
                format!("Rule {}: {message}", rule.id),
                serde_json::json!({ "rule_id": rule.id }),
            ));
        }
        Action::SetStatus { device_id, .. } | Action::Toggle { device_id } => *device_id,
    };

    let current = resolve(rule, device_id, devices)?.status;
    let status = rule.action.resulting_status(current).unwrap_or(current);
    let device = devices
        .update(device_id, DeviceUpdate::status(status))
        .map_err(|_| DanglingReferenceError {
            rule_id: rule.id,
            device_id,
        })?;

    Ok(Event::new(
        EventType::RuleFired,
        format!(
            "Rule {}: Executed - {} is now {}",
            rule.id, device.name, device.status
        ),
        serde_json::json!({
            "rule_id": rule.id,
            "device_id": device.id,
            "from": current,
            "to": device.status,
        }),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::MemorySink;
    use smarthub_domain::device::DeviceStatus;
    use std::sync::Arc;

    // ── Helpers ────────────────────────────────────────────────────

    fn device(id: u32, name: &str, status: DeviceStatus) -> Device {
        Device::builder()
            .id(DeviceId::new(id))
            .name(name)
            .device_type("Light")
            .status(status)
            .build()
            .unwrap()
    }

    fn registry_with(devices: Vec<Device>) -> DeviceRegistry {
        let mut registry = DeviceRegistry::new();
        for d in devices {
            registry.add(d).unwrap();
        }
        registry
    }

    fn engine() -> (RuleEngine, Arc<MemorySink>) {
        let memory = Arc::new(MemorySink::new());
        (RuleEngine::new(memory.clone()), memory)
    }

    fn notify_rule(id: u32, device: u32, status: DeviceStatus, message: &str) -> AutomationRule {
        AutomationRule::builder()
            .id(RuleId::new(id))
            .when_status(DeviceId::new(device), status)
            .notify(message)
            .build()
            .unwrap()
    }

    // ── Registration ───────────────────────────────────────────────

    #[test]
    fn should_return_duplicate_key_when_rule_id_exists() {
        let (mut engine, _) = engine();
        let rule = AutomationRule::switching(RuleId::new(1), DeviceId::new(1), DeviceStatus::On);
        engine.add_rule(rule.clone()).unwrap();
        assert!(matches!(
            engine.add_rule(rule),
            Err(HubError::DuplicateKey(e)) if e.entity == "Rule"
        ));
        assert_eq!(engine.len(), 1);
    }

    #[test]
    fn should_return_not_found_when_deleting_unknown_rule() {
        let (mut engine, _) = engine();
        assert!(matches!(
            engine.delete_rule(RuleId::new(42)),
            Err(HubError::NotFound(_))
        ));
    }

    #[test]
    fn should_keep_registration_order_after_delete() {
        let (mut engine, _) = engine();
        for id in [5, 1, 3] {
            engine
                .add_rule(AutomationRule::switching(
                    RuleId::new(id),
                    DeviceId::new(1),
                    DeviceStatus::On,
                ))
                .unwrap();
        }
        engine.delete_rule(RuleId::new(1)).unwrap();

        let ids: Vec<_> = engine.list_rules().map(|r| r.id).collect();
        assert_eq!(ids, vec![RuleId::new(5), RuleId::new(3)]);
        assert!(engine.get_rule(RuleId::new(1)).is_err());
    }

    // ── Evaluation ─────────────────────────────────────────────────

    #[test]
    fn should_fire_later_rule_after_earlier_action_changes_state() {
        let mut devices = registry_with(vec![device(1, "Lamp", DeviceStatus::Off)]);
        let (mut engine, memory) = engine();
        engine
            .add_rule(AutomationRule::switching(
                RuleId::new(1),
                DeviceId::new(1),
                DeviceStatus::On,
            ))
            .unwrap();
        engine
            .add_rule(notify_rule(2, 1, DeviceStatus::On, "R2 fired"))
            .unwrap();

        let report = engine.evaluate_all(&mut devices);

        assert_eq!(report.fired_ids(), vec![RuleId::new(1), RuleId::new(2)]);
        assert_eq!(
            devices.get(DeviceId::new(1)).unwrap().status,
            DeviceStatus::On
        );
        assert_eq!(
            memory.lines(),
            vec!["Rule 1: Executed - Lamp is now ON", "Rule 2: R2 fired"]
        );
    }

    #[test]
    fn should_not_fire_earlier_rule_enabled_by_later_action() {
        let mut devices = registry_with(vec![device(1, "Lamp", DeviceStatus::Off)]);
        let (mut engine, _) = engine();
        engine
            .add_rule(notify_rule(2, 1, DeviceStatus::On, "lamp is on"))
            .unwrap();
        engine
            .add_rule(AutomationRule::switching(
                RuleId::new(1),
                DeviceId::new(1),
                DeviceStatus::On,
            ))
            .unwrap();

        let report = engine.evaluate_all(&mut devices);

        assert_eq!(report.fired_ids(), vec![RuleId::new(1)]);
    }

    #[test]
    fn should_fire_nothing_on_second_pass_without_state_change() {
        let mut devices = registry_with(vec![
            device(1, "Lamp", DeviceStatus::Off),
            device(2, "Thermostat", DeviceStatus::On),
        ]);
        let (mut engine, _) = engine();
        engine
            .add_rule(AutomationRule::switching(
                RuleId::new(1),
                DeviceId::new(1),
                DeviceStatus::On,
            ))
            .unwrap();
        engine
            .add_rule(AutomationRule::switching(
                RuleId::new(2),
                DeviceId::new(2),
                DeviceStatus::Off,
            ))
            .unwrap();

        let first = engine.evaluate_all(&mut devices);
        let second = engine.evaluate_all(&mut devices);

        assert_eq!(first.fired.len(), 2);
        assert!(second.is_quiet());
    }

    #[test]
    fn should_skip_dangling_rule_and_keep_evaluating() {
        let mut devices = registry_with(vec![
            device(1, "Lamp", DeviceStatus::Off),
            device(2, "Fan", DeviceStatus::Off),
        ]);
        let (mut engine, memory) = engine();
        engine
            .add_rule(AutomationRule::switching(
                RuleId::new(10),
                DeviceId::new(1),
                DeviceStatus::On,
            ))
            .unwrap();
        engine
            .add_rule(AutomationRule::switching(
                RuleId::new(20),
                DeviceId::new(2),
                DeviceStatus::On,
            ))
            .unwrap();
        devices.delete(DeviceId::new(1)).unwrap();

        let report = engine.evaluate_all(&mut devices);

        assert_eq!(report.fired_ids(), vec![RuleId::new(20)]);
        assert_eq!(
            report.skipped,
            vec![DanglingReferenceError {
                rule_id: RuleId::new(10),
                device_id: DeviceId::new(1),
            }]
        );
        assert_eq!(
            memory.lines()[0],
            "Rule 10 skipped: rule 10 references missing device 1"
        );
    }

    #[test]
    fn should_skip_rule_whose_action_targets_missing_device() {
        let mut devices = registry_with(vec![device(1, "Lamp", DeviceStatus::On)]);
        let (mut engine, _) = engine();
        engine
            .add_rule(
                AutomationRule::builder()
                    .id(RuleId::new(1))
                    .when_status(DeviceId::new(1), DeviceStatus::On)
                    .set_status(DeviceId::new(99), DeviceStatus::Off)
                    .build()
                    .unwrap(),
            )
            .unwrap();
        engine
            .add_rule(notify_rule(2, 1, DeviceStatus::On, "still evaluated"))
            .unwrap();

        let report = engine.evaluate_all(&mut devices);

        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].device_id, DeviceId::new(99));
        assert_eq!(report.fired_ids(), vec![RuleId::new(2)]);
    }

    #[test]
    fn should_emit_exactly_one_event_per_firing() {
        let mut devices = registry_with(vec![device(3, "Fan", DeviceStatus::On)]);
        let (mut engine, memory) = engine();
        engine
            .add_rule(
                AutomationRule::builder()
                    .id(RuleId::new(7))
                    .when_status(DeviceId::new(3), DeviceStatus::On)
                    .action(Action::Toggle {
                        device_id: DeviceId::new(3),
                    })
                    .build()
                    .unwrap(),
            )
            .unwrap();

        let report = engine.evaluate_all(&mut devices);

        assert_eq!(report.fired.len(), 1);
        let event = &report.fired[0].event;
        assert_eq!(event.event_type, EventType::RuleFired);
        assert_eq!(event.data["from"], "ON");
        assert_eq!(event.data["to"], "OFF");
        assert_eq!(memory.lines().len(), 1);
    }

    #[test]
    fn should_return_quiet_report_when_no_rules() {
        let mut devices = DeviceRegistry::new();
        let (engine, _) = engine();
        assert!(engine.evaluate_all(&mut devices).is_quiet());
    }
}
