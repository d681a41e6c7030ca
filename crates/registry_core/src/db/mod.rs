//! SQLite storage bootstrap and schema initialization entry points.
//!
//! # Responsibility
//! - Open and configure SQLite connections for the registry.
//! - Ensure one table per entity kind exists before any registry call.
//!
//! # Invariants
//! - Core code must not read/write registry rows before schema init succeeds.
//! - Storage failures are surfaced unmodified and never retried here.

use std::error::Error;
use std::fmt::{Display, Formatter};

mod open;
pub mod schema;

pub use open::{open_db, open_db_in_memory};
pub use schema::{ensure_all_schemas, ensure_schema};

pub type DbResult<T> = Result<T, DbError>;

/// Storage-layer failure (connection, permission, disk, SQL).
#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "storage error: {err}"),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
