//! Entity repository contracts and generic SQLite implementation.
//!
//! # Responsibility
//! - Provide create/update/find/delete over one table per entity kind.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - Write paths call `Entity::validate()` before any SQL mutation.
//! - Every operation runs inside exactly one transaction; writes take the
//!   write lock up front (`BEGIN IMMEDIATE`) so the existence check and the
//!   mutation see the same state.
//! - The `id` primary key is the final uniqueness guard: a constraint
//!   violation on insert is reported as `DuplicateIdentity`.
//! - Read paths reject invalid persisted rows instead of masking them.

use crate::db::DbError;
use crate::model::entity::{
    normalize_identity, normalize_text, Entity, EntityKind, ValidationError,
};
use log::{debug, info, warn};
use rusqlite::types::Value;
use rusqlite::{
    params_from_iter, Connection, ErrorCode, Row, Transaction, TransactionBehavior,
};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::marker::PhantomData;
use std::str::FromStr;

pub type RegistryResult<T> = Result<T, RegistryError>;

/// Registry error for entity persistence and query operations.
#[derive(Debug)]
pub enum RegistryError {
    /// Entity failed field validation; nothing was written.
    Validation(ValidationError),
    /// A row with the same normalized identity already exists.
    DuplicateIdentity { kind: EntityKind, identity: String },
    /// Lookup attribute is not one of the supported fields.
    InvalidAttribute(String),
    /// Update target does not exist.
    NotFound { kind: EntityKind, identity: String },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
    InvalidData(String),
    /// Storage failure, propagated unmodified.
    Db(DbError),
}

impl Display for RegistryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::DuplicateIdentity { kind, identity } => {
                write!(f, "{kind} `{identity}` already exists")
            }
            Self::InvalidAttribute(attribute) => write!(
                f,
                "unsupported lookup attribute `{attribute}`; expected id|name"
            ),
            Self::NotFound { kind, identity } => write!(f, "{kind} not found: {identity}"),
            Self::MissingRequiredTable(table) => {
                write!(f, "connection is missing required table `{table}`")
            }
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "table `{table}` is missing required column `{column}`")
            }
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
            Self::Db(err) => write!(f, "{err}"),
        }
    }
}

impl Error for RegistryError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::DuplicateIdentity { .. }
            | Self::InvalidAttribute(_)
            | Self::NotFound { .. }
            | Self::MissingRequiredTable(_)
            | Self::MissingRequiredColumn { .. }
            | Self::InvalidData(_) => None,
        }
    }
}

impl From<ValidationError> for RegistryError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RegistryError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RegistryError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Field a single-entity lookup can match on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupAttribute {
    /// Identity key; matched case- and whitespace-insensitively.
    Id,
    /// Display name; trimmed, matched case-sensitively.
    Name,
}

impl LookupAttribute {
    pub fn column(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Name => "name",
        }
    }

    /// Applies the normalization the stored column was written with.
    pub fn normalize(self, value: &str) -> String {
        match self {
            Self::Id => normalize_identity(value),
            Self::Name => normalize_text(value),
        }
    }
}

impl FromStr for LookupAttribute {
    type Err = RegistryError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "id" => Ok(Self::Id),
            "name" => Ok(Self::Name),
            other => Err(RegistryError::InvalidAttribute(other.to_string())),
        }
    }
}

/// Row mapping between an entity and its table.
pub trait StoredEntity: Entity + Sized {
    /// Column names in bind order. The first entry is always `id`.
    const COLUMNS: &'static [&'static str];

    /// Bind values in `COLUMNS` order.
    fn to_values(&self) -> Vec<Value>;

    /// Rebuilds an entity from a row selected with `COLUMNS`.
    ///
    /// # Errors
    /// - `InvalidData` when the row breaks entity invariants.
    fn from_row(row: &Row<'_>) -> RegistryResult<Self>;
}

/// Repository interface for registry CRUD operations.
pub trait EntityRepository<E: Entity> {
    /// Persists a new entity after validation and uniqueness checks.
    fn create(&mut self, entity: &E) -> RegistryResult<()>;
    /// Rewrites the non-identity fields of an existing entity.
    fn update(&mut self, entity: &E) -> RegistryResult<()>;
    /// Lists every entity ordered by name (case-insensitive), then identity.
    ///
    /// Fails with `InvalidData` as a whole if any stored row breaks entity
    /// invariants; no partial listing is returned.
    fn find_all(&self) -> RegistryResult<Vec<E>>;
    /// Returns the first match for `attribute`, lowest identity first.
    fn find_by(&self, attribute: LookupAttribute, value: &str) -> RegistryResult<Option<E>>;
    /// Removes the row for the entity's identity and returns rows removed.
    ///
    /// Removing an absent identity is a success with zero rows.
    fn delete(&mut self, entity: &E) -> RegistryResult<usize>;

    /// String-keyed lookup for callers holding raw attribute names.
    fn find_by_attribute(&self, attribute: &str, value: &str) -> RegistryResult<Option<E>> {
        let attribute = attribute.parse::<LookupAttribute>()?;
        self.find_by(attribute, value)
    }
}

/// SQLite-backed repository for one entity kind.
pub struct SqliteEntityRepository<'conn, E> {
    conn: &'conn mut Connection,
    entity: PhantomData<fn() -> E>,
}

impl<'conn, E: StoredEntity> SqliteEntityRepository<'conn, E> {
    /// Wraps a connection whose schema for `E::KIND` is in place.
    ///
    /// # Errors
    /// - `MissingRequiredTable` / `MissingRequiredColumn` when schema init was
    ///   skipped or the table predates the current column set.
    pub fn try_new(conn: &'conn mut Connection) -> RegistryResult<Self> {
        ensure_connection_ready::<E>(conn)?;
        Ok(Self {
            conn,
            entity: PhantomData,
        })
    }
}

impl<E: StoredEntity> EntityRepository<E> for SqliteEntityRepository<'_, E> {
    fn create(&mut self, entity: &E) -> RegistryResult<()> {
        let kind = E::KIND;
        if let Err(err) = entity.validate() {
            warn!(
                "event=entity_create module=repo status=rejected kind={} reason=validation field={}",
                kind,
                err.field()
            );
            return Err(err.into());
        }

        let identity = normalize_identity(entity.id());
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        if identity_exists(&tx, kind, &identity)? {
            warn!("event=entity_create module=repo status=rejected kind={kind} reason=duplicate");
            return Err(RegistryError::DuplicateIdentity { kind, identity });
        }

        if let Err(err) = tx.execute(&insert_sql::<E>(), params_from_iter(entity.to_values())) {
            if is_primary_key_violation(&err) {
                warn!(
                    "event=entity_create module=repo status=rejected kind={kind} reason=primary_key"
                );
                return Err(RegistryError::DuplicateIdentity { kind, identity });
            }
            return Err(err.into());
        }
        tx.commit()?;

        info!("event=entity_create module=repo status=ok kind={kind}");
        Ok(())
    }

    fn update(&mut self, entity: &E) -> RegistryResult<()> {
        let kind = E::KIND;
        entity.validate()?;

        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        let changed = tx.execute(&update_sql::<E>(), params_from_iter(entity.to_values()))?;
        if changed == 0 {
            return Err(RegistryError::NotFound {
                kind,
                identity: normalize_identity(entity.id()),
            });
        }
        tx.commit()?;

        info!("event=entity_update module=repo status=ok kind={kind}");
        Ok(())
    }

    fn find_all(&self) -> RegistryResult<Vec<E>> {
        let tx = self.conn.unchecked_transaction()?;
        let entities = {
            let mut stmt = tx.prepare(&format!(
                "{} ORDER BY name COLLATE NOCASE ASC, id ASC;",
                select_sql::<E>()
            ))?;
            let mut rows = stmt.query([])?;
            let mut entities = Vec::new();
            while let Some(row) = rows.next()? {
                entities.push(E::from_row(row)?);
            }
            entities
        };
        tx.commit()?;

        debug!(
            "event=entity_list module=repo status=ok kind={} count={}",
            E::KIND,
            entities.len()
        );
        Ok(entities)
    }

    fn find_by(&self, attribute: LookupAttribute, value: &str) -> RegistryResult<Option<E>> {
        let needle = attribute.normalize(value);
        let tx = self.conn.unchecked_transaction()?;
        let found = {
            let mut stmt = tx.prepare(&format!(
                "{} WHERE {} = ?1 ORDER BY id ASC LIMIT 1;",
                select_sql::<E>(),
                attribute.column()
            ))?;
            let mut rows = stmt.query([needle.as_str()])?;
            match rows.next()? {
                Some(row) => Some(E::from_row(row)?),
                None => None,
            }
        };
        tx.commit()?;

        debug!(
            "event=entity_lookup module=repo status=ok kind={} attribute={} found={}",
            E::KIND,
            attribute.column(),
            found.is_some()
        );
        Ok(found)
    }

    fn delete(&mut self, entity: &E) -> RegistryResult<usize> {
        let identity = normalize_identity(entity.id());
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        let removed = tx.execute(
            &format!("DELETE FROM {} WHERE id = ?1;", E::KIND.table_name()),
            [identity.as_str()],
        )?;
        tx.commit()?;

        info!(
            "event=entity_delete module=repo status=ok kind={} removed={}",
            E::KIND,
            removed
        );
        Ok(removed)
    }
}

fn select_sql<E: StoredEntity>() -> String {
    format!(
        "SELECT {} FROM {}",
        E::COLUMNS.join(", "),
        E::KIND.table_name()
    )
}

fn insert_sql<E: StoredEntity>() -> String {
    let placeholders = (1..=E::COLUMNS.len())
        .map(|index| format!("?{index}"))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "INSERT INTO {} ({}) VALUES ({placeholders});",
        E::KIND.table_name(),
        E::COLUMNS.join(", ")
    )
}

// Binds `id` as ?1 so `to_values()` can be reused unchanged.
fn update_sql<E: StoredEntity>() -> String {
    let assignments = E::COLUMNS
        .iter()
        .enumerate()
        .skip(1)
        .map(|(index, column)| format!("{column} = ?{}", index + 1))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "UPDATE {} SET {assignments} WHERE id = ?1;",
        E::KIND.table_name()
    )
}

fn identity_exists(tx: &Transaction<'_>, kind: EntityKind, identity: &str) -> RegistryResult<bool> {
    let exists: i64 = tx.query_row(
        &format!(
            "SELECT EXISTS(SELECT 1 FROM {} WHERE id = ?1);",
            kind.table_name()
        ),
        [identity],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn is_primary_key_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(inner, _)
            if inner.code == ErrorCode::ConstraintViolation
                && inner.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY
    )
}

fn ensure_connection_ready<E: StoredEntity>(conn: &Connection) -> RegistryResult<()> {
    let table = E::KIND.table_name();
    if !table_exists(conn, table)? {
        return Err(RegistryError::MissingRequiredTable(table));
    }
    for &column in E::COLUMNS {
        if !table_has_column(conn, table, column)? {
            return Err(RegistryError::MissingRequiredColumn { table, column });
        }
    }
    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RegistryResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> RegistryResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}
