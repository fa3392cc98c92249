//! Device — a stateful thing in the home that can be switched on and off.

mod status;

pub use status::DeviceStatus;

use serde::{Deserialize, Serialize};

use crate::error::{HubError, ValidationError};
use crate::id::DeviceId;

/// A registered device.
///
/// The identifier never changes once the device is built; name, type and
/// status are mutated in place by the device registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Device {
    pub id: DeviceId,
    pub name: String,
    /// Free-form tag such as `"Light"` or `"Thermostat"`.
    pub device_type: String,
    pub status: DeviceStatus,
}

impl Device {
    /// Create a builder for constructing a [`Device`].
    #[must_use]
    pub fn builder() -> DeviceBuilder {
        DeviceBuilder::default()
    }

    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`HubError::Validation`] when:
    /// - `name` is empty ([`ValidationError::EmptyName`])
    /// - `device_type` is empty ([`ValidationError::EmptyDeviceType`])
    pub fn validate(&self) -> Result<(), HubError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyName.into());
        }
        if self.device_type.trim().is_empty() {
            return Err(ValidationError::EmptyDeviceType.into());
        }
        Ok(())
    }

    /// Apply the supplied fields of `update`, leaving the others untouched.
    ///
    /// Returns `true` when the status changed.
    pub fn apply(&mut self, update: DeviceUpdate) -> bool {
        let previous = self.status;
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(device_type) = update.device_type {
            self.device_type = device_type;
        }
        if let Some(status) = update.status {
            self.status = status;
        }
        previous != self.status
    }
}

/// Step-by-step builder for [`Device`].
#[derive(Debug, Default)]
pub struct DeviceBuilder {
    id: Option<DeviceId>,
    name: Option<String>,
    device_type: Option<String>,
    status: Option<DeviceStatus>,
}

impl DeviceBuilder {
    #[must_use]
    pub fn id(mut self, id: DeviceId) -> Self {
        self.id = Some(id);
        self
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn device_type(mut self, device_type: impl Into<String>) -> Self {
        self.device_type = Some(device_type.into());
        self
    }

    #[must_use]
    pub fn status(mut self, status: DeviceStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Consume the builder, validate, and return a [`Device`].
    ///
    /// A missing type defaults to `"Generic"` and a missing status to
    /// [`DeviceStatus::Off`].
    ///
    /// # Errors
    ///
    /// Returns [`HubError::Validation`] if the id is missing or the name is
    /// missing or empty.
    pub fn build(self) -> Result<Device, HubError> {
        let device = Device {
            id: self.id.ok_or(ValidationError::MissingId)?,
            name: self.name.unwrap_or_default(),
            device_type: self.device_type.unwrap_or_else(|| "Generic".to_string()),
            status: self.status.unwrap_or_default(),
        };
        device.validate()?;
        Ok(device)
    }
}

/// Partial update for a device: only the `Some` fields are applied.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceUpdate {
    pub name: Option<String>,
    pub device_type: Option<String>,
    pub status: Option<DeviceStatus>,
}

impl DeviceUpdate {
    /// An update that only changes the status.
    #[must_use]
    pub fn status(status: DeviceStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn with_device_type(mut self, device_type: impl Into<String>) -> Self {
        self.device_type = Some(device_type.into());
        self
    }

    /// Whether the update carries no field at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.device_type.is_none() && self.status.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lamp() -> Device {
        Device::builder()
            .id(DeviceId::new(1))
            .name("Living Room Light")
            .device_type("Light")
            .build()
            .unwrap()
    }

    #[test]
    fn should_build_valid_device_when_required_fields_provided() {
        let device = lamp();
        assert_eq!(device.id, DeviceId::new(1));
        assert_eq!(device.name, "Living Room Light");
        assert_eq!(device.device_type, "Light");
        assert_eq!(device.status, DeviceStatus::Off);
    }

    #[test]
    fn should_default_type_to_generic() {
        let device = Device::builder().id(DeviceId::new(4)).name("Plug").build().unwrap();
        assert_eq!(device.device_type, "Generic");
    }

    #[test]
    fn should_return_validation_error_when_name_is_blank() {
        let result = Device::builder().id(DeviceId::new(1)).name("  ").build();
        assert!(matches!(
            result,
            Err(HubError::Validation(ValidationError::EmptyName))
        ));
    }

    #[test]
    fn should_return_validation_error_when_id_is_missing() {
        let result = Device::builder().name("Fan").build();
        assert!(matches!(
            result,
            Err(HubError::Validation(ValidationError::MissingId))
        ));
    }

    #[test]
    fn should_return_validation_error_when_type_is_empty() {
        let result = Device::builder().id(DeviceId::new(1)).name("Fan").device_type("").build();
        assert!(matches!(
            result,
            Err(HubError::Validation(ValidationError::EmptyDeviceType))
        ));
    }

    #[test]
    fn should_apply_only_supplied_fields() {
        let mut device = lamp();
        let changed = device.apply(DeviceUpdate::default().with_name("Hall Light"));
        assert!(!changed);
        assert_eq!(device.name, "Hall Light");
        assert_eq!(device.device_type, "Light");
        assert_eq!(device.status, DeviceStatus::Off);
    }

    #[test]
    fn should_report_status_change_when_applying_new_status() {
        let mut device = lamp();
        assert!(device.apply(DeviceUpdate::status(DeviceStatus::On)));
        assert!(!device.apply(DeviceUpdate::status(DeviceStatus::On)));
        assert_eq!(device.status, DeviceStatus::On);
    }

    #[test]
    fn should_report_empty_update() {
        assert!(DeviceUpdate::default().is_empty());
        assert!(!DeviceUpdate::status(DeviceStatus::Off).is_empty());
    }
}
