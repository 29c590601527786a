//! In-memory device registry.
//!
//! Thread-safe keyed store of device records: many concurrent readers or one
//! exclusive writer. The registry is constructed once by the application
//! shell and shared via `Arc` between the scan engine (writer) and any number
//! of reporting readers. Entries never expire; removal is only via explicit
//! `delete` or `clear`.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::device::DeviceInfo;
use crate::error::RegistryError;

/// Thread-safe registry of discovered devices, keyed by device name.
#[derive(Debug, Default)]
pub struct DeviceRegistry {
    devices: RwLock<HashMap<String, DeviceInfo>>,
}

impl DeviceRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Check whether a device with the given name exists.
    pub fn exists(&self, name: &str) -> bool {
        self.read().contains_key(name)
    }

    /// Number of devices currently stored.
    pub fn size(&self) -> usize {
        self.read().len()
    }

    /// Return a copy of the device with the given name, if present.
    pub fn get_by_name(&self, name: &str) -> Option<DeviceInfo> {
        self.read().get(name).cloned()
    }

    /// Return copies of all stored devices, in unspecified order.
    pub fn get_all(&self) -> Vec<DeviceInfo> {
        self.read().values().cloned().collect()
    }

    /// Upsert a device record by name.
    ///
    /// Always fully overwrites an existing entry; carrying `first_seen`
    /// forward on rediscovery is the caller's responsibility, read before
    /// writing.
    pub fn store(&self, device: DeviceInfo) -> Result<(), RegistryError> {
        if device.name.is_empty() {
            return Err(RegistryError::EmptyName);
        }
        self.write().insert(device.name.clone(), device);
        Ok(())
    }

    /// Remove the device with the given name.
    pub fn delete(&self, name: &str) -> Result<(), RegistryError> {
        match self.write().remove(name) {
            Some(_) => Ok(()),
            None => Err(RegistryError::NotFound(name.to_string())),
        }
    }

    /// Remove all devices.
    pub fn clear(&self) {
        self.write().clear();
    }

    // A poisoned lock still holds a consistent map; recover the guard.
    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, DeviceInfo>> {
        self.devices.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, DeviceInfo>> {
        self.devices.write().unwrap_or_else(PoisonError::into_inner)
    }
}
