//! End-to-end scenarios for the fully wired controller.
//!
//! Each test builds the same stack as `smarthubd` (sink, notifier,
//! interception chain, registries, rule engine) with an in-memory sink in
//! place of `tracing`, then drives it through public operations only.

use std::sync::Arc;

use smarthub_app::controller::{Controller, ControllerConfig};
use smarthub_app::interception::MetricsHook;
use smarthub_app::ports::{MemorySink, SinkNotifier};
use smarthub_domain::automation::AutomationRule;
use smarthub_domain::device::{DeviceStatus, DeviceUpdate};
use smarthub_domain::error::HubError;
use smarthub_domain::id::{DeviceId, RuleId, UserId};
use smarthub_domain::user::{Role, User};

fn home(config: ControllerConfig) -> (Controller<SinkNotifier>, Arc<MemorySink>) {
    let memory = Arc::new(MemorySink::new());
    let mut controller =
        Controller::new(config, memory.clone(), SinkNotifier::new(memory.clone()));
    controller
        .seed_sample_data()
        .expect("sample data should load into an empty home");
    (controller, memory)
}

// ---------------------------------------------------------------------------
// Startup
// ---------------------------------------------------------------------------

#[test]
fn should_switch_thermostat_off_when_startup_evaluation_runs() {
    let (mut controller, _) = home(ControllerConfig::default());

    let evaluation = controller.evaluate_rules();

    assert_eq!(evaluation.fired_ids(), vec![RuleId::new(201)]);
    let report = controller.report();
    assert_eq!(report.devices_on(), 0);
    assert_eq!(
        report.to_string(),
        "Devices: 3 (0 on)\n\
         \x20 1 - Living Room Light, Light, Status: OFF\n\
         \x20 2 - Main Thermostat, Thermostat, Status: OFF\n\
         \x20 3 - Bedroom Fan, Fan, Status: OFF\n\
         Users: 2\n\
         \x20 101 - Alice (HomeOwner)\n\
         \x20 102 - Bob (Admin)\n\
         Automation rules: 1\n\
         \x20 Rule ID: 201"
    );
}

#[test]
fn should_serialize_report_as_json() {
    let (controller, _) = home(ControllerConfig::default());

    let json = serde_json::to_value(controller.report()).unwrap();

    assert_eq!(json["devices"].as_array().unwrap().len(), 3);
    assert_eq!(json["rules"], serde_json::json!([201]));
}

// ---------------------------------------------------------------------------
// Device lifecycle
// ---------------------------------------------------------------------------

#[test]
fn should_cascade_rules_after_each_mutation_when_auto_evaluate_enabled() {
    let (mut controller, memory) = home(ControllerConfig {
        evaluate_after_mutation: true,
        ..ControllerConfig::default()
    });
    controller.evaluate_rules();

    let porch = controller
        .add_device_from_pool("Porch Light", "Light")
        .unwrap()
        .expect("pool should not be empty");
    controller
        .add_rule(
            AutomationRule::builder()
                .id(RuleId::new(202))
                .when_status(porch, DeviceStatus::On)
                .set_status(DeviceId::new(3), DeviceStatus::On)
                .build()
                .unwrap(),
        )
        .unwrap();
    memory.clear();

    controller
        .set_device_status(porch, DeviceStatus::On)
        .unwrap();

    assert_eq!(
        controller.devices().get(DeviceId::new(3)).unwrap().status,
        DeviceStatus::On
    );
    let lines = memory.lines();
    assert_eq!(lines.first().unwrap(), "Pre-processing: Update Device");
    assert!(lines.contains(&"Rule 202: Executed - Bedroom Fan is now ON".to_string()));
    assert_eq!(lines.last().unwrap(), "Post-processing: Update Device");
}

#[test]
fn should_rename_device_without_touching_status() {
    let (mut controller, _) = home(ControllerConfig::default());

    controller
        .update_device(
            DeviceId::new(1),
            DeviceUpdate::default().with_name("Lounge Light"),
        )
        .unwrap();

    let device = controller.devices().get(DeviceId::new(1)).unwrap();
    assert_eq!(device.name, "Lounge Light");
    assert_eq!(device.status, DeviceStatus::Off);
}

#[test]
fn should_hand_out_every_pooled_device_then_report_exhaustion() {
    let (mut controller, memory) = home(ControllerConfig {
        pool_size: 2,
        ..ControllerConfig::default()
    });

    let first = controller.add_device_from_pool("A", "Light").unwrap();
    let second = controller.add_device_from_pool("B", "Light").unwrap();
    let third = controller.add_device_from_pool("C", "Light").unwrap();

    assert_eq!(first, Some(DeviceId::new(1000)));
    assert_eq!(second, Some(DeviceId::new(1001)));
    assert_eq!(third, None);
    assert!(memory
        .lines()
        .contains(&"No devices available in pool".to_string()));

    controller.delete_device(DeviceId::new(1000)).unwrap();
    let recycled = controller.add_device_from_pool("D", "Fan").unwrap();
    assert_eq!(recycled, Some(DeviceId::new(1000)));
    assert_eq!(
        controller.devices().get(DeviceId::new(1000)).unwrap().name,
        "D"
    );
}

// ---------------------------------------------------------------------------
// Users and rules
// ---------------------------------------------------------------------------

#[test]
fn should_reject_duplicate_user_and_keep_single_subscription() {
    let (mut controller, _) = home(ControllerConfig::default());

    let result =
        controller.register_user(User::new(UserId::new(101), "Alice", Role::HomeOwner).unwrap());

    assert!(matches!(result, Err(HubError::DuplicateKey(_))));
    assert_eq!(controller.users().len(), 2);
    assert_eq!(controller.hub().len(), 2);
}

#[test]
fn should_report_not_found_when_deleting_unknown_rule() {
    let metrics = Arc::new(MetricsHook::new());
    let (controller, memory) = home(ControllerConfig::default());
    let mut controller = controller.with_hook(metrics.clone());

    let result = controller.delete_rule(RuleId::new(999));

    assert!(matches!(result, Err(HubError::NotFound(_))));
    assert_eq!(
        memory.lines(),
        vec!["Pre-processing: Delete Rule", "Post-processing: Delete Rule"]
    );
    assert_eq!(metrics.counts("Delete Rule").finished, 1);
}

#[test]
fn should_notify_remaining_users_of_rule_firings() {
    let (mut controller, memory) = home(ControllerConfig::default());
    controller.delete_user(UserId::new(102)).unwrap();
    memory.clear();

    controller.evaluate_rules();

    let notifications: Vec<String> = memory
        .lines()
        .into_iter()
        .filter(|line| line.starts_with("Notification to"))
        .collect();
    assert_eq!(
        notifications,
        vec!["Notification to Alice: Rule 201: Executed - Main Thermostat is now OFF"]
    );
}
