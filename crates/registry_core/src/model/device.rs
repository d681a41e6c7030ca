//! Device domain model.
//!
//! # Responsibility
//! - Hold a normalized device value object keyed by inventory number.
//! - Define the closed set of device availability states.
//!
//! # Invariants
//! - `id` is trimmed and lowercased; after normalization it must match
//!   `^[a-z0-9][a-z0-9._/-]*$` to be valid.
//! - Optional text attributes never hold blank strings.
//! - Status defaults to `available`.

use crate::model::entity::{
    normalize_identity, normalize_optional_text, normalize_text, Entity, EntityKind,
    ValidationError,
};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

static INVENTORY_NUMBER_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z0-9][a-z0-9._/-]*$").expect("inventory pattern is valid"));

/// Availability state of a device.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceStatus {
    /// Ready to be used or lent out.
    #[default]
    Available,
    /// Temporarily out of service for maintenance.
    #[serde(rename = "in-maintenance")]
    InMaintenance,
    /// Broken; needs repair or disposal.
    Defective,
    /// Booked by someone.
    Reserved,
}

impl DeviceStatus {
    /// All states in display order.
    pub const ALL: [DeviceStatus; 4] = [
        DeviceStatus::Available,
        DeviceStatus::InMaintenance,
        DeviceStatus::Defective,
        DeviceStatus::Reserved,
    ];

    /// Stable storage/wire value.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::InMaintenance => "in-maintenance",
            Self::Defective => "defective",
            Self::Reserved => "reserved",
        }
    }
}

impl Display for DeviceStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for status strings outside the supported set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownDeviceStatus(pub String);

impl Display for UnknownDeviceStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "unknown device status `{}`; expected available|in-maintenance|defective|reserved",
            self.0
        )
    }
}

impl Error for UnknownDeviceStatus {}

impl FromStr for DeviceStatus {
    type Err = UnknownDeviceStatus;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "available" => Ok(Self::Available),
            "in_maintenance" | "in-maintenance" => Ok(Self::InMaintenance),
            "defective" => Ok(Self::Defective),
            "reserved" => Ok(Self::Reserved),
            _ => Err(UnknownDeviceStatus(value.to_string())),
        }
    }
}

/// Registered device. The inventory number is the natural key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "DeviceFields")]
pub struct Device {
    id: String,
    name: String,
    #[serde(rename = "type")]
    device_type: Option<String>,
    location: Option<String>,
    status: DeviceStatus,
    remarks: Option<String>,
}

#[derive(Deserialize)]
struct DeviceFields {
    id: String,
    name: String,
    #[serde(rename = "type", default)]
    device_type: Option<String>,
    #[serde(default)]
    location: Option<String>,
    #[serde(default)]
    status: DeviceStatus,
    #[serde(default)]
    remarks: Option<String>,
}

impl From<DeviceFields> for Device {
    fn from(value: DeviceFields) -> Self {
        Self::new(&value.id, &value.name)
            .with_type(value.device_type.as_deref())
            .with_location(value.location.as_deref())
            .with_status(value.status)
            .with_remarks(value.remarks.as_deref())
    }
}

impl Device {
    /// Builds a device from raw form input with default attributes.
    ///
    /// Performs normalization only; the result may still be invalid.
    pub fn new(raw_id: &str, raw_name: &str) -> Self {
        Self {
            id: normalize_identity(raw_id),
            name: normalize_text(raw_name),
            device_type: None,
            location: None,
            status: DeviceStatus::default(),
            remarks: None,
        }
    }

    pub fn with_name(mut self, raw_name: &str) -> Self {
        self.name = normalize_text(raw_name);
        self
    }

    pub fn with_type(mut self, raw_type: Option<&str>) -> Self {
        self.device_type = normalize_optional_text(raw_type);
        self
    }

    pub fn with_location(mut self, raw_location: Option<&str>) -> Self {
        self.location = normalize_optional_text(raw_location);
        self
    }

    pub fn with_status(mut self, status: DeviceStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_remarks(mut self, raw_remarks: Option<&str>) -> Self {
        self.remarks = normalize_optional_text(raw_remarks);
        self
    }

    /// Normalized inventory number.
    pub fn inventory_number(&self) -> &str {
        &self.id
    }

    pub fn device_type(&self) -> Option<&str> {
        self.device_type.as_deref()
    }

    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    pub fn status(&self) -> DeviceStatus {
        self.status
    }

    pub fn remarks(&self) -> Option<&str> {
        self.remarks.as_deref()
    }
}

impl Entity for Device {
    const KIND: EntityKind = EntityKind::Device;

    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn validate(&self) -> Result<(), ValidationError> {
        if self.id.is_empty() {
            return Err(ValidationError::Empty { field: "id" });
        }
        if !INVENTORY_NUMBER_PATTERN.is_match(&self.id) {
            return Err(ValidationError::InvalidFormat {
                field: "id",
                expected: "an inventory number of letters, digits and `.` `_` `/` `-`",
            });
        }
        if self.name.is_empty() {
            return Err(ValidationError::Empty { field: "name" });
        }
        Ok(())
    }
}

impl Display for Device {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({}) [{}]", self.name, self.id, self.status)
    }
}
