//! # smarthub-domain
//!
//! Pure domain model for the smarthub home automation controller.
//!
//! ## Responsibilities
//! - Foundational types: typed identifiers, error conventions
//! - Define **Devices** (stateful things that can be switched on and off)
//! - Define **Users** and their **Roles**
//! - Define **Automation rules** (condition → action, expressed as data)
//! - Define **Events** (records of what happened, delivered to subscribers)
//! - Define the **Report** projection
//! - Contain all invariant enforcement and domain logic
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app` or external IO crates.
//! All collaborator boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod id;

pub mod automation;
pub mod device;
pub mod event;
pub mod report;
pub mod user;
