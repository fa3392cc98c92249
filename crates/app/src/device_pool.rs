//! Device pool — a free-list of pre-built devices over a reserved id range.
//!
//! Acquired devices carry a reserved id and placeholder name/type; the
//! caller configures them before registering. Released devices return to
//! the back of the free-list switched off. Devices whose id lies outside the
//! reserved range never enter the pool.

use std::collections::VecDeque;
use std::ops::Range;

use smarthub_domain::device::{Device, DeviceStatus};
use smarthub_domain::id::DeviceId;

/// First identifier reserved for pooled devices.
pub const DEFAULT_FIRST_ID: u32 = 1000;
/// Number of devices preloaded into the pool.
pub const DEFAULT_SIZE: u32 = 5;

/// Free-list of ready-to-configure devices.
#[derive(Debug, Default)]
pub struct DevicePool {
    ids: Range<u32>,
    free: VecDeque<Device>,
}

impl DevicePool {
    /// Preload `size` devices with ids `first_id..first_id + size`.
    ///
    /// The range is clamped at `u32::MAX`.
    #[must_use]
    pub fn preloaded(first_id: u32, size: u32) -> Self {
        let ids = first_id..first_id.saturating_add(size);
        let free = ids
            .clone()
            .map(|id| Device {
                id: DeviceId::new(id),
                name: format!("Preloaded Device {id}"),
                device_type: "Generic".to_string(),
                status: DeviceStatus::Off,
            })
            .collect();
        Self { ids, free }
    }

    /// Take the next free device, if any.
    pub fn acquire(&mut self) -> Option<Device> {
        let device = self.free.pop_front();
        match &device {
            Some(d) => tracing::debug!(device_id = %d.id, remaining = self.free.len(), "device acquired from pool"),
            None => tracing::debug!("device pool exhausted"),
        }
        device
    }

    /// Return a device to the pool, switched off.
    ///
    /// Returns `false` and drops the device when its id is outside the
    /// reserved range or already free.
    pub fn release(&mut self, mut device: Device) -> bool {
        if !self.owns(device.id) {
            tracing::debug!(device_id = %device.id, "device not from pool, dropped");
            return false;
        }
        if self.free.iter().any(|d| d.id == device.id) {
            tracing::debug!(device_id = %device.id, "device already in pool");
            return false;
        }
        device.status = DeviceStatus::Off;
        tracing::debug!(device_id = %device.id, "device released to pool");
        self.free.push_back(device);
        true
    }

    /// Whether `id` lies in the range reserved for pooled devices.
    #[must_use]
    pub fn owns(&self, id: DeviceId) -> bool {
        self.ids.contains(&id.get())
    }

    /// Number of devices ready to be acquired.
    #[must_use]
    pub fn available(&self) -> usize {
        self.free.len()
    }
}
