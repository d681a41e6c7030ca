//! Core registry logic for users and devices.
//! This crate is the single source of truth for identity, validation and
//! uniqueness invariants; front ends only call into it.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use db::{ensure_all_schemas, ensure_schema, open_db, open_db_in_memory, DbError, DbResult};
pub use logging::{default_log_level, init_logging, logging_status, LogTarget};
pub use model::device::{Device, DeviceStatus, UnknownDeviceStatus};
pub use model::entity::{Entity, EntityKind, ValidationError};
pub use model::user::User;
pub use repo::entity_repo::{
    EntityRepository, LookupAttribute, RegistryError, RegistryResult, SqliteEntityRepository,
    StoredEntity,
};
pub use repo::{SqliteDeviceRepository, SqliteUserRepository};
pub use service::device_service::{DeviceDraft, DeviceService};
pub use service::user_service::UserService;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
