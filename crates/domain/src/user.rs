//! User — an account that receives notifications.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{HubError, ValidationError};
use crate::id::UserId;

/// What a user is allowed to do.
///
/// Nothing enforces these yet; callers that want to gate an operation ask
/// [`Role::allows`] explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    OperateDevices,
    ManageDevices,
    ManageUsers,
    ManageRules,
}

/// Role attached to a user account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Role {
    #[default]
    HomeOwner,
    Admin,
}

impl Role {
    /// Whether this role grants `capability`.
    #[must_use]
    pub fn allows(self, capability: Capability) -> bool {
        match self {
            Self::Admin => true,
            Self::HomeOwner => !matches!(capability, Capability::ManageUsers),
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::HomeOwner => f.write_str("HomeOwner"),
            Self::Admin => f.write_str("Admin"),
        }
    }
}

impl FromStr for Role {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "homeowner" | "home_owner" => Ok(Self::HomeOwner),
            "admin" => Ok(Self::Admin),
            _ => Err(ValidationError::UnknownRole(s.to_string())),
        }
    }
}

/// A registered user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub role: Role,
}

impl User {
    /// Build a validated user.
    ///
    /// # Errors
    ///
    /// Returns [`HubError::Validation`] when `name` is empty.
    pub fn new(id: UserId, name: impl Into<String>, role: Role) -> Result<Self, HubError> {
        let user = Self {
            id,
            name: name.into(),
            role,
        };
        user.validate()?;
        Ok(user)
    }

    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`HubError::Validation`] when `name` is empty.
    pub fn validate(&self) -> Result<(), HubError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyName.into());
        }
        Ok(())
    }
}
