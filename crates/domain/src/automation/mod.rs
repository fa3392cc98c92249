//! Automation — condition → action rules.
//!
//! A rule pairs a [`Condition`] over one device with an [`Action`] that is
//! executed when the condition holds. Both are plain data referencing
//! devices by identifier, so rules can be inspected and serialized; the
//! engine resolves the identifiers against the live registry on every
//! evaluation.

mod action;
mod condition;

pub use action::Action;
pub use condition::Condition;

use serde::{Deserialize, Serialize};

use crate::device::DeviceStatus;
use crate::error::{HubError, ValidationError};
use crate::id::{DeviceId, RuleId};

/// A registered automation rule. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutomationRule {
    pub id: RuleId,
    pub condition: Condition,
    pub action: Action,
}

impl AutomationRule {
    /// Create a builder for constructing an [`AutomationRule`].
    #[must_use]
    pub fn builder() -> AutomationRuleBuilder {
        AutomationRuleBuilder::default()
    }

    /// A rule that drives `device_id` to `target` whenever it is in the
    /// opposite status.
    #[must_use]
    pub fn switching(id: RuleId, device_id: DeviceId, target: DeviceStatus) -> Self {
        Self {
            id,
            condition: Condition::StatusIs {
                device_id,
                status: target.toggled(),
            },
            action: Action::SetStatus {
                device_id,
                status: target,
            },
        }
    }

    /// Device identifiers this rule reads or writes, condition first.
    #[must_use]
    pub fn referenced_devices(&self) -> Vec<DeviceId> {
        let mut ids = vec![self.condition.device_id()];
        if let Some(target) = self.action.device_id()
            && !ids.contains(&target)
        {
            ids.push(target);
        }
        ids
    }

    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`HubError::Validation`] when a `Notify` action carries an
    /// empty message ([`ValidationError::EmptyMessage`]).
    pub fn validate(&self) -> Result<(), HubError> {
        if let Action::Notify { message } = &self.action
            && message.trim().is_empty()
        {
            return Err(ValidationError::EmptyMessage.into());
        }
        Ok(())
    }
}

impl std::fmt::Display for AutomationRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "rule {}: {} -> {}", self.id, self.condition, self.action)
    }
}

/// Step-by-step builder for [`AutomationRule`].
#[derive(Debug, Default)]
pub struct AutomationRuleBuilder {
    id: Option<RuleId>,
    condition: Option<Condition>,
    action: Option<Action>,
}

impl AutomationRuleBuilder {
    #[must_use]
    pub fn id(mut self, id: RuleId) -> Self {
        self.id = Some(id);
        self
    }

    #[must_use]
    pub fn condition(mut self, condition: Condition) -> Self {
        self.condition = Some(condition);
        self
    }

    /// Shorthand for a [`Condition::StatusIs`] condition.
    #[must_use]
    pub fn when_status(self, device_id: DeviceId, status: DeviceStatus) -> Self {
        self.condition(Condition::StatusIs { device_id, status })
    }

    #[must_use]
    pub fn action(mut self, action: Action) -> Self {
        self.action = Some(action);
        self
    }

    /// Shorthand for an [`Action::SetStatus`] action.
    #[must_use]
    pub fn set_status(self, device_id: DeviceId, status: DeviceStatus) -> Self {
        self.action(Action::SetStatus { device_id, status })
    }

    /// Shorthand for an [`Action::Notify`] action.
    #[must_use]
    pub fn notify(self, message: impl Into<String>) -> Self {
        self.action(Action::Notify {
            message: message.into(),
        })
    }

    /// Consume the builder, validate, and return an [`AutomationRule`].
    ///
    /// # Errors
    ///
    /// Returns [`HubError::Validation`] if the id, condition or action is
    /// missing, or if the rule breaks an invariant checked by
    /// [`AutomationRule::validate`].
    pub fn build(self) -> Result<AutomationRule, HubError> {
        let rule = AutomationRule {
            id: self.id.ok_or(ValidationError::MissingId)?,
            condition: self.condition.ok_or(ValidationError::MissingCondition)?,
            action: self.action.ok_or(ValidationError::MissingAction)?,
        };
        rule.validate()?;
        Ok(rule)
    }
}
