//! Per-kind table creation.
//!
//! # Invariants
//! - The identity column `id` is the table's primary key, so duplicate
//!   identities are rejected by SQLite even when callers race.
//! - `ensure_schema` is idempotent and safe to run from many connections.

use super::DbResult;
use crate::model::entity::EntityKind;
use log::{debug, error};
use rusqlite::Connection;

const USERS_TABLE_SQL: &str = "CREATE TABLE IF NOT EXISTS users (
    id   TEXT PRIMARY KEY NOT NULL,
    name TEXT NOT NULL
);";

const DEVICES_TABLE_SQL: &str = "CREATE TABLE IF NOT EXISTS devices (
    id       TEXT PRIMARY KEY NOT NULL,
    name     TEXT NOT NULL,
    type     TEXT,
    location TEXT,
    status   TEXT,
    remarks  TEXT
);";

/// Returns the `CREATE TABLE IF NOT EXISTS` statement for one kind.
pub fn table_sql(kind: EntityKind) -> &'static str {
    match kind {
        EntityKind::User => USERS_TABLE_SQL,
        EntityKind::Device => DEVICES_TABLE_SQL,
    }
}

/// Creates the durable table for `kind` if it does not exist yet.
///
/// # Errors
/// - Returns the underlying SQLite error unchanged (permission, disk, lock).
pub fn ensure_schema(conn: &Connection, kind: EntityKind) -> DbResult<()> {
    match conn.execute_batch(table_sql(kind)) {
        Ok(()) => {
            debug!(
                "event=schema_ensure module=db status=ok kind={} table={}",
                kind,
                kind.table_name()
            );
            Ok(())
        }
        Err(err) => {
            error!(
                "event=schema_ensure module=db status=error kind={} error={}",
                kind, err
            );
            Err(err.into())
        }
    }
}

/// Ensures tables for every known entity kind.
pub fn ensure_all_schemas(conn: &Connection) -> DbResult<()> {
    for kind in EntityKind::ALL {
        ensure_schema(conn, kind)?;
    }
    Ok(())
}
