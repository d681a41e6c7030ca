//! Registry domain model.
//!
//! # Responsibility
//! - Define the value objects the registry persists (users, devices).
//! - Keep normalization and validation free of storage concerns.
//!
//! # Invariants
//! - Every entity is identified by a normalized natural key.
//! - Deletion is a hard delete; value objects outlive their rows.

pub mod device;
pub mod entity;
pub mod user;
