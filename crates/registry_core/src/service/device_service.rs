//! Device use-case service.
//!
//! # Responsibility
//! - Provide device registry entry points driven by form-shaped drafts.
//! - Delegate validation, uniqueness and persistence to the repository.
//!
//! # Invariants
//! - Updates replace every non-identity attribute; the inventory number is
//!   fixed once stored.

use crate::model::device::{Device, DeviceStatus};
use crate::repo::entity_repo::{EntityRepository, LookupAttribute, RegistryResult};

/// Raw device form input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeviceDraft {
    /// Inventory number as typed.
    pub id: String,
    pub name: String,
    pub device_type: Option<String>,
    pub location: Option<String>,
    pub status: DeviceStatus,
    pub remarks: Option<String>,
}

impl DeviceDraft {
    /// Normalizes the draft into a device value object.
    pub fn to_device(&self) -> Device {
        Device::new(&self.id, &self.name)
            .with_type(self.device_type.as_deref())
            .with_location(self.location.as_deref())
            .with_status(self.status)
            .with_remarks(self.remarks.as_deref())
    }
}

/// Use-case service wrapper for device registry operations.
pub struct DeviceService<R: EntityRepository<Device>> {
    repo: R,
}

impl<R: EntityRepository<Device>> DeviceService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Registers a new device. Returns the normalized device as stored.
    pub fn create_device(&mut self, draft: &DeviceDraft) -> RegistryResult<Device> {
        let device = draft.to_device();
        self.repo.create(&device)?;
        Ok(device)
    }

    /// Replaces the attributes of an existing device.
    ///
    /// Returns repository-level not-found or validation errors unchanged.
    pub fn update_device(&mut self, draft: &DeviceDraft) -> RegistryResult<Device> {
        let device = draft.to_device();
        self.repo.update(&device)?;
        Ok(device)
    }

    /// Lists all devices ordered by name.
    pub fn list_devices(&self) -> RegistryResult<Vec<Device>> {
        self.repo.find_all()
    }

    /// Looks up one device by inventory number.
    pub fn get_device(&self, raw_id: &str) -> RegistryResult<Option<Device>> {
        self.repo.find_by(LookupAttribute::Id, raw_id)
    }

    /// Looks up one device by a raw attribute name (`id` or `name`).
    pub fn find_device(&self, attribute: &str, value: &str) -> RegistryResult<Option<Device>> {
        self.repo.find_by_attribute(attribute, value)
    }

    /// Deletes the device with the given inventory number.
    ///
    /// Returns whether a stored device was removed.
    pub fn delete_device(&mut self, raw_id: &str) -> RegistryResult<bool> {
        let removed = self.repo.delete(&Device::new(raw_id, ""))?;
        Ok(removed > 0)
    }
}
