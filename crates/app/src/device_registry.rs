//! Device registry — the single owner of live device state.

use indexmap::IndexMap;

use smarthub_domain::device::{Device, DeviceUpdate};
use smarthub_domain::error::{DuplicateKeyError, HubError, NotFoundError};
use smarthub_domain::id::DeviceId;

/// Insertion-ordered map from [`DeviceId`] to [`Device`].
///
/// Updates mutate the stored device in place, so every later read sees the
/// new state; nothing is copied on read.
#[derive(Debug, Default)]
pub struct DeviceRegistry {
    devices: IndexMap<DeviceId, Device>,
}

impl DeviceRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new device.
    ///
    /// # Errors
    ///
    /// Returns [`HubError::DuplicateKey`] if a device with the same id is
    /// already registered, or [`HubError::Validation`] if the device breaks
    /// an invariant.
    pub fn add(&mut self, device: Device) -> Result<&Device, HubError> {
        device.validate()?;
        if self.devices.contains_key(&device.id) {
            return Err(DuplicateKeyError {
                entity: "Device",
                id: device.id.to_string(),
            }
            .into());
        }
        let id = device.id;
        tracing::debug!(device_id = %id, name = %device.name, "device registered");
        Ok(&*self.devices.entry(id).or_insert(device))
    }

    /// Look up a device by id.
    ///
    /// # Errors
    ///
    /// Returns [`HubError::NotFound`] when no device with `id` exists.
    pub fn get(&self, id: DeviceId) -> Result<&Device, HubError> {
        self.devices.get(&id).ok_or_else(|| not_found(id))
    }

    /// Apply the supplied fields of `update` to the device in place.
    ///
    /// The device is left untouched when the update would break an invariant.
    ///
    /// # Errors
    ///
    /// Returns [`HubError::NotFound`] when no device with `id` exists, or
    /// [`HubError::Validation`] when the updated device would be invalid.
    pub fn update(&mut self, id: DeviceId, update: DeviceUpdate) -> Result<&Device, HubError> {
        let device = self.devices.get_mut(&id).ok_or_else(|| not_found(id))?;
        let mut candidate = device.clone();
        let status_changed = candidate.apply(update);
        candidate.validate()?;
        *device = candidate;
        tracing::debug!(device_id = %id, status = %device.status, status_changed, "device updated");
        Ok(&*device)
    }

    /// Remove a device and hand it back to the caller.
    ///
    /// Remaining devices keep their relative order.
    ///
    /// # Errors
    ///
    /// Returns [`HubError::NotFound`] when no device with `id` exists.
    pub fn delete(&mut self, id: DeviceId) -> Result<Device, HubError> {
        let device = self.devices.shift_remove(&id).ok_or_else(|| not_found(id))?;
        tracing::debug!(device_id = %id, "device removed");
        Ok(device)
    }

    /// Every device in registration order.
    ///
    /// The iterator is lazy and can be cloned to restart it.
    pub fn list_all(&self) -> impl ExactSizeIterator<Item = &Device> + Clone + '_ {
        self.devices.values()
    }

    #[must_use]
    pub fn contains(&self, id: DeviceId) -> bool {
        self.devices.contains_key(&id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.devices.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }
}

fn not_found(id: DeviceId) -> HubError {
    NotFoundError {
        entity: "Device",
        id: id.to_string(),
    }
    .into()
}
