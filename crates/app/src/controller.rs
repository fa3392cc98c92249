//! Controller — the caller-side use-cases of the home.
//!
//! Every mutating operation follows the same sequence:
//!
//! 1. interception `before` hooks
//! 2. registry mutation (its event line goes to the log sink immediately)
//! 3. an evaluation pass, when `evaluate_after_mutation` is set and the
//!    mutation can change a rule outcome
//! 4. broadcast of the mutation event and every firing event to subscribers
//! 5. interception `after` hooks, on success and failure alike

use smarthub_domain::automation::AutomationRule;
use smarthub_domain::device::{Device, DeviceStatus, DeviceUpdate};
use smarthub_domain::error::HubError;
use smarthub_domain::event::{Event, EventType};
use smarthub_domain::id::{DeviceId, RuleId, UserId};
use smarthub_domain::report::Report;
use smarthub_domain::user::{Role, User};

use crate::device_pool::{self, DevicePool};
use crate::device_registry::DeviceRegistry;
use crate::interception::{InterceptionChain, LoggingHook};
use crate::notification_hub::NotificationHub;
use crate::ports::{Hook, LogSink, Notifier, SharedSink};
use crate::report::build_report;
use crate::rule_engine::{EvaluationReport, RuleEngine};
use crate::user_registry::UserRegistry;

/// Knobs for [`Controller`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControllerConfig {
    /// Run an evaluation pass after every device or rule mutation.
    pub evaluate_after_mutation: bool,
    /// First id reserved for pooled devices.
    pub pool_first_id: u32,
    /// Number of pooled devices.
    pub pool_size: u32,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            evaluate_after_mutation: false,
            pool_first_id: device_pool::DEFAULT_FIRST_ID,
            pool_size: device_pool::DEFAULT_SIZE,
        }
    }
}

/// Owns every store of the home and runs the use-cases over them.
pub struct Controller<N> {
    interception: InterceptionChain,
    home: Home<N>,
}

struct Home<N> {
    devices: DeviceRegistry,
    users: UserRegistry,
    engine: RuleEngine,
    hub: NotificationHub<N>,
    pool: DevicePool,
    sink: SharedSink,
    evaluate_after_mutation: bool,
}

impl<N: Notifier> Controller<N> {
    /// Build a controller logging to `sink` and notifying through `notifier`.
    ///
    /// The interception chain starts with a [`LoggingHook`] on `sink`.
    pub fn new(config: ControllerConfig, sink: SharedSink, notifier: N) -> Self {
        Self {
            interception: InterceptionChain::new().with_hook(LoggingHook::new(sink.clone())),
            home: Home {
                devices: DeviceRegistry::new(),
                users: UserRegistry::new(),
                engine: RuleEngine::new(sink.clone()),
                hub: NotificationHub::new(notifier),
                pool: DevicePool::preloaded(config.pool_first_id, config.pool_size),
                sink,
                evaluate_after_mutation: config.evaluate_after_mutation,
            },
        }
    }

    /// Append a hook to the interception chain.
    #[must_use]
    pub fn with_hook(mut self, hook: impl Hook + Send + Sync + 'static) -> Self {
        self.interception.push(hook);
        self
    }

    // ── Devices ────────────────────────────────────────────────────

    /// Take a device from the pool, name it and register it.
    ///
    /// Returns `Ok(None)` when the pool is empty.
    ///
    /// # Errors
    ///
    /// Returns [`HubError::Validation`] for a blank name or type, or
    /// [`HubError::DuplicateKey`] when the pooled id is already registered.
    /// The device goes back to the pool in both cases.
    #[tracing::instrument(skip(self))]
    pub fn add_device_from_pool(
        &mut self,
        name: &str,
        device_type: &str,
    ) -> Result<Option<DeviceId>, HubError> {
        let _guard = self.interception.enter("Add Device");
        self.home.add_from_pool(name, device_type)
    }

    /// Register a fully built device.
    ///
    /// # Errors
    ///
    /// Returns [`HubError::DuplicateKey`] when the id is taken.
    #[tracing::instrument(skip(self, device), fields(device_id = %device.id))]
    pub fn add_device(&mut self, device: Device) -> Result<(), HubError> {
        let _guard = self.interception.enter("Add Device");
        self.home.add_device(device)
    }

    /// Apply a partial update to a device.
    ///
    /// # Errors
    ///
    /// Returns [`HubError::NotFound`] when the device does not exist, or
    /// [`HubError::Validation`] when the update would make it invalid.
    #[tracing::instrument(skip(self))]
    pub fn update_device(&mut self, id: DeviceId, update: DeviceUpdate) -> Result<(), HubError> {
        let _guard = self.interception.enter("Update Device");
        self.home.update_device(id, update)
    }

    /// Switch a device on or off.
    ///
    /// # Errors
    ///
    /// Returns [`HubError::NotFound`] when the device does not exist.
    pub fn set_device_status(&mut self, id: DeviceId, status: DeviceStatus) -> Result<(), HubError> {
        self.update_device(id, DeviceUpdate::status(status))
    }

    /// Remove a device; pooled devices go back to the pool.
    ///
    /// Rules referencing the device are kept and will be skipped by later
    /// evaluation passes.
    ///
    /// # Errors
    ///
    /// Returns [`HubError::NotFound`] when the device does not exist.
    #[tracing::instrument(skip(self))]
    pub fn delete_device(&mut self, id: DeviceId) -> Result<(), HubError> {
        let _guard = self.interception.enter("Delete Device");
        self.home.delete_device(id)
    }

    // ── Users ──────────────────────────────────────────────────────

    /// Register a user and subscribe it to notifications.
    ///
    /// # Errors
    ///
    /// Returns [`HubError::DuplicateKey`] when the id is taken.
    #[tracing::instrument(skip(self, user), fields(user_id = %user.id))]
    pub fn register_user(&mut self, user: User) -> Result<(), HubError> {
        let _guard = self.interception.enter("Register User");
        self.home.register_user(user)
    }

    /// Unsubscribe and remove a user.
    ///
    /// # Errors
    ///
    /// Returns [`HubError::NotFound`] when the user does not exist.
    #[tracing::instrument(skip(self))]
    pub fn delete_user(&mut self, id: UserId) -> Result<(), HubError> {
        let _guard = self.interception.enter("Delete User");
        self.home.delete_user(id)
    }

    // ── Rules ──────────────────────────────────────────────────────

    /// Register a rule at the end of the evaluation order.
    ///
    /// # Errors
    ///
    /// Returns [`HubError::DuplicateKey`] when the id is taken.
    #[tracing::instrument(skip(self, rule), fields(rule_id = %rule.id))]
    pub fn add_rule(&mut self, rule: AutomationRule) -> Result<(), HubError> {
        let _guard = self.interception.enter("Add Rule");
        self.home.add_rule(rule)
    }

    /// Remove a rule.
    ///
    /// # Errors
    ///
    /// Returns [`HubError::NotFound`] when the rule does not exist.
    #[tracing::instrument(skip(self))]
    pub fn delete_rule(&mut self, id: RuleId) -> Result<(), HubError> {
        let _guard = self.interception.enter("Delete Rule");
        self.home.delete_rule(id)
    }

    /// Run one evaluation pass and broadcast every firing.
    #[tracing::instrument(skip(self))]
    pub fn evaluate_rules(&mut self) -> EvaluationReport {
        let _guard = self.interception.enter("Evaluate Rules");
        self.home.evaluate()
    }

    // ── Read side ──────────────────────────────────────────────────

    /// Summary of devices, users and rules.
    #[must_use]
    pub fn report(&self) -> Report {
        build_report(&self.home.devices, &self.home.users, &self.home.engine)
    }

    #[must_use]
    pub fn devices(&self) -> &DeviceRegistry {
        &self.home.devices
    }

    #[must_use]
    pub fn users(&self) -> &UserRegistry {
        &self.home.users
    }

    #[must_use]
    pub fn rules(&self) -> &RuleEngine {
        &self.home.engine
    }

    #[must_use]
    pub fn hub(&self) -> &NotificationHub<N> {
        &self.home.hub
    }

    #[must_use]
    pub fn pool(&self) -> &DevicePool {
        &self.home.pool
    }

    #[must_use]
    pub fn interception(&self) -> &InterceptionChain {
        &self.interception
    }

    /// Load the demo household: two users, three devices and one rule
    /// switching the thermostat off whenever it is on.
    ///
    /// Sample data goes straight into the stores, without hooks,
    /// notifications or evaluation.
    ///
    /// # Errors
    ///
    /// Returns [`HubError::DuplicateKey`] when any sample id is taken.
    pub fn seed_sample_data(&mut self) -> Result<(), HubError> {
        let home = &mut self.home;
        for user in [
            User::new(UserId::new(101), "Alice", Role::HomeOwner)?,
            User::new(UserId::new(102), "Bob", Role::Admin)?,
        ] {
            home.hub.subscribe(&user);
            home.users.add(user)?;
        }
        for (id, name, device_type, status) in [
            (1, "Living Room Light", "Light", DeviceStatus::Off),
            (2, "Main Thermostat", "Thermostat", DeviceStatus::On),
            (3, "Bedroom Fan", "Fan", DeviceStatus::Off),
        ] {
            home.devices.add(
                Device::builder()
                    .id(DeviceId::new(id))
                    .name(name)
                    .device_type(device_type)
                    .status(status)
                    .build()?,
            )?;
        }
        home.engine.add_rule(AutomationRule::switching(
            RuleId::new(201),
            DeviceId::new(2),
            DeviceStatus::Off,
        ))?;
        tracing::info!(
            devices = home.devices.len(),
            users = home.users.len(),
            rules = home.engine.len(),
            "sample data loaded"
        );
        Ok(())
    }
}

impl<N: Notifier> Home<N> {
    fn add_from_pool(&mut self, name: &str, device_type: &str) -> Result<Option<DeviceId>, HubError> {
        let Some(pooled) = self.pool.acquire() else {
            self.sink.emit("No devices available in pool");
            return Ok(None);
        };
        let device = Device {
            name: name.to_string(),
            device_type: device_type.to_string(),
            ..pooled.clone()
        };
        let id = device.id;
        if let Err(err) = self.add_device(device) {
            self.pool.release(pooled);
            return Err(err);
        }
        Ok(Some(id))
    }

    fn add_device(&mut self, device: Device) -> Result<(), HubError> {
        let device = self.devices.add(device)?;
        let event = Event::new(
            EventType::DeviceAdded,
            format!(
                "Device {} added: {}, {}, Status: {}",
                device.id, device.name, device.device_type, device.status
            ),
            serde_json::json!({ "device_id": device.id }),
        );
        self.commit(event, true);
        Ok(())
    }

    fn update_device(&mut self, id: DeviceId, update: DeviceUpdate) -> Result<(), HubError> {
        let device = self.devices.update(id, update)?;
        let event = Event::new(
            EventType::DeviceUpdated,
            format!("Device {id} updated: {} is now {}", device.name, device.status),
            serde_json::json!({ "device_id": id, "status": device.status }),
        );
        self.commit(event, true);
        Ok(())
    }

    fn delete_device(&mut self, id: DeviceId) -> Result<(), HubError> {
        let device = self.devices.delete(id)?;
        let dangling: Vec<RuleId> = self
            .engine
            .list_rules()
            .filter(|r| r.referenced_devices().contains(&id))
            .map(|r| r.id)
            .collect();
        if !dangling.is_empty() {
            tracing::warn!(device_id = %id, rules = ?dangling, "deleted device is still referenced by rules");
        }
        let event = Event::new(
            EventType::DeviceRemoved,
            format!("Device {id} removed: {}", device.name),
            serde_json::json!({ "device_id": id, "dangling_rules": dangling }),
        );
        self.pool.release(device);
        self.commit(event, true);
        Ok(())
    }

    fn register_user(&mut self, user: User) -> Result<(), HubError> {
        let user = self.users.add(user)?;
        self.hub.subscribe(user);
        let event = Event::new(
            EventType::UserRegistered,
            format!("User {} registered: {} ({})", user.id, user.name, user.role),
            serde_json::json!({ "user_id": user.id, "role": user.role }),
        );
        self.commit(event, false);
        Ok(())
    }

    fn delete_user(&mut self, id: UserId) -> Result<(), HubError> {
        let user = self.users.delete(id)?;
        self.hub.unsubscribe(id);
        let event = Event::new(
            EventType::UserRemoved,
            format!("User {id} removed: {}", user.name),
            serde_json::json!({ "user_id": id }),
        );
        self.commit(event, false);
        Ok(())
    }

    fn add_rule(&mut self, rule: AutomationRule) -> Result<(), HubError> {
        let missing: Vec<DeviceId> = rule
            .referenced_devices()
            .into_iter()
            .filter(|id| !self.devices.contains(*id))
            .collect();
        let rule = self.engine.add_rule(rule)?;
        if !missing.is_empty() {
            tracing::warn!(rule_id = %rule.id, devices = ?missing, "rule references unknown devices");
        }
        let event = Event::new(
            EventType::RuleAdded,
            format!("Rule {} added: {} -> {}", rule.id, rule.condition, rule.action),
            serde_json::json!({ "rule_id": rule.id }),
        );
        self.commit(event, true);
        Ok(())
    }

    fn delete_rule(&mut self, id: RuleId) -> Result<(), HubError> {
        self.engine.delete_rule(id)?;
        let event = Event::new(
            EventType::RuleRemoved,
            format!("Rule {id} deleted"),
            serde_json::json!({ "rule_id": id }),
        );
        self.commit(event, false);
        Ok(())
    }

    fn evaluate(&mut self) -> EvaluationReport {
        let report = self.engine.evaluate_all(&mut self.devices);
        for firing in &report.fired {
            self.hub.broadcast(&firing.event);
        }
        report
    }

    /// Log `event`, optionally re-evaluate, then broadcast everything.
    fn commit(&mut self, event: Event, may_trigger_rules: bool) {
        self.sink.emit(&event.message);
        let mut events = vec![event];
        if may_trigger_rules && self.evaluate_after_mutation {
            let report = self.engine.evaluate_all(&mut self.devices);
            events.extend(report.fired.into_iter().map(|f| f.event));
        }
        for event in &events {
            self.hub.broadcast(event);
        }
    }
}
