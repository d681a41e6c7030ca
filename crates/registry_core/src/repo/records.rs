//! Row mapping for concrete entity kinds.
//!
//! # Invariants
//! - Column order matches the table definitions in `db::schema`.
//! - Rows whose identity is not already normalized are rejected, since no
//!   lookup could ever reach them.

use crate::model::device::{Device, DeviceStatus};
use crate::model::entity::Entity;
use crate::model::user::User;
use crate::repo::entity_repo::{RegistryError, RegistryResult, StoredEntity};
use rusqlite::types::Value;
use rusqlite::Row;

impl StoredEntity for User {
    const COLUMNS: &'static [&'static str] = &["id", "name"];

    fn to_values(&self) -> Vec<Value> {
        vec![text(self.id()), text(self.name())]
    }

    fn from_row(row: &Row<'_>) -> RegistryResult<Self> {
        let raw_id: String = row.get("id")?;
        let raw_name: String = row.get("name")?;
        let user = User::new(&raw_id, &raw_name);
        check_persisted(&user, &raw_id)?;
        Ok(user)
    }
}

impl StoredEntity for Device {
    const COLUMNS: &'static [&'static str] =
        &["id", "name", "type", "location", "status", "remarks"];

    fn to_values(&self) -> Vec<Value> {
        vec![
            text(self.id()),
            text(self.name()),
            optional_text(self.device_type()),
            optional_text(self.location()),
            text(self.status().as_str()),
            optional_text(self.remarks()),
        ]
    }

    fn from_row(row: &Row<'_>) -> RegistryResult<Self> {
        let raw_id: String = row.get("id")?;
        let raw_name: String = row.get("name")?;

        // The column is nullable; a missing status reads as available.
        let status = match row.get::<_, Option<String>>("status")? {
            Some(value) => value.parse::<DeviceStatus>().map_err(|_| {
                RegistryError::InvalidData(format!(
                    "invalid device status `{value}` in devices.status"
                ))
            })?,
            None => DeviceStatus::default(),
        };

        let device = Device::new(&raw_id, &raw_name)
            .with_type(row.get::<_, Option<String>>("type")?.as_deref())
            .with_location(row.get::<_, Option<String>>("location")?.as_deref())
            .with_status(status)
            .with_remarks(row.get::<_, Option<String>>("remarks")?.as_deref());
        check_persisted(&device, &raw_id)?;
        Ok(device)
    }
}

fn check_persisted<E: Entity>(entity: &E, raw_id: &str) -> RegistryResult<()> {
    let table = E::KIND.table_name();
    if entity.id() != raw_id {
        return Err(RegistryError::InvalidData(format!(
            "non-normalized identity in {table}.id"
        )));
    }
    entity
        .validate()
        .map_err(|err| RegistryError::InvalidData(format!("{table} row violates rule: {err}")))
}

fn text(value: &str) -> Value {
    Value::Text(value.to_string())
}

fn optional_text(value: Option<&str>) -> Value {
    value.map_or(Value::Null, text)
}
