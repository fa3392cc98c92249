//! # smarthub-app
//!
//! Application layer — registries, use-cases and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that outer layers implement:
//!   - `LogSink` — receives every human-readable log line
//!   - `Notifier` — delivers an event to one user
//!   - `Hook` — runs before and after an intercepted operation
//! - Keep the in-memory stores: `DeviceRegistry`, `UserRegistry`, `DevicePool`
//! - Fan events out to subscribers through `NotificationHub`
//! - Evaluate automation rules in registration order through `RuleEngine`
//! - Orchestrate all of the above behind `Controller`, with every mutation
//!   wrapped by the `InterceptionChain`
//!
//! ## Dependency rule
//! Depends on `smarthub-domain` only (plus `indexmap` for ordered stores).
//! Never performs IO itself; the binary wires sinks and notifiers in.

pub mod controller;
pub mod device_pool;
pub mod device_registry;
pub mod interception;
pub mod notification_hub;
pub mod ports;
pub mod report;
pub mod rule_engine;
pub mod user_registry;
