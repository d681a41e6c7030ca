//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts.
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - Repository writes must enforce `Entity::validate()` before persistence.
//! - Repository APIs return semantic errors (`DuplicateIdentity`,
//!   `NotFound`) in addition to storage errors.

pub mod entity_repo;
mod records;

use crate::model::device::Device;
use crate::model::user::User;
use entity_repo::SqliteEntityRepository;

pub type SqliteUserRepository<'conn> = SqliteEntityRepository<'conn, User>;
pub type SqliteDeviceRepository<'conn> = SqliteEntityRepository<'conn, Device>;
