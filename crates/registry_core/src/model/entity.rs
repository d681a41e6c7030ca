//! Shared registry entity contract.
//!
//! # Responsibility
//! - Name the entity kinds the registry persists.
//! - Define the pure validation contract every entity implements.
//! - Provide the one normalization routine used on every read/write path.
//!
//! # Invariants
//! - Identity values are compared only after `normalize_identity`.
//! - Validation is pure: no I/O, no store access.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Entity kinds with a durable table each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    User,
    Device,
}

impl EntityKind {
    /// Every kind known to the registry, in schema initialization order.
    pub const ALL: [EntityKind; 2] = [EntityKind::User, EntityKind::Device];

    /// Stable lowercase label used in logs and error messages.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Device => "device",
        }
    }

    /// Backing table name.
    pub fn table_name(self) -> &'static str {
        match self {
            Self::User => "users",
            Self::Device => "devices",
        }
    }
}

impl Display for EntityKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Field-level validation failure. Reported to callers verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Required field is empty after trimming.
    Empty { field: &'static str },
    /// Field is present but does not have the expected shape.
    InvalidFormat {
        field: &'static str,
        expected: &'static str,
    },
}

impl ValidationError {
    /// Name of the first violated field.
    pub fn field(&self) -> &'static str {
        match self {
            Self::Empty { field } | Self::InvalidFormat { field, .. } => field,
        }
    }
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty { field } => write!(f, "{field} must not be empty"),
            Self::InvalidFormat { field, expected } => {
                write!(f, "{field} must be {expected}")
            }
        }
    }
}

impl Error for ValidationError {}

/// Contract shared by every registry entity.
///
/// Implementors are plain value objects: constructing one never touches the
/// store, and `validate` decides whether it may become durable.
pub trait Entity {
    /// Kind (and therefore table) this entity is stored under.
    const KIND: EntityKind;

    /// Normalized identity key.
    fn id(&self) -> &str;

    /// Trimmed display name.
    fn name(&self) -> &str;

    /// Checks field rules and returns the first violation.
    fn validate(&self) -> Result<(), ValidationError>;
}

/// Normalizes an identity value: trims whitespace and lowercases.
pub fn normalize_identity(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Normalizes a free-text value by trimming surrounding whitespace.
pub fn normalize_text(raw: &str) -> String {
    raw.trim().to_string()
}

/// Normalizes an optional free-text value; blank input becomes `None`.
pub fn normalize_optional_text(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::{normalize_identity, normalize_optional_text, normalize_text, ValidationError};

    #[test]
    fn identity_normalization_trims_and_lowercases() {
        assert_eq!(normalize_identity("  Max@Example.COM \t"), "max@example.com");
        assert_eq!(normalize_identity(""), "");
    }

    #[test]
    fn text_normalization_keeps_case() {
        assert_eq!(normalize_text("  Max Mustermann "), "Max Mustermann");
    }

    #[test]
    fn optional_text_collapses_blank_to_none() {
        assert_eq!(normalize_optional_text(Some("   ")), None);
        assert_eq!(normalize_optional_text(None), None);
        assert_eq!(
            normalize_optional_text(Some(" Labor 1 ")).as_deref(),
            Some("Labor 1")
        );
    }

    #[test]
    fn validation_error_reports_field() {
        let err = ValidationError::InvalidFormat {
            field: "id",
            expected: "an email address containing `@`",
        };
        assert_eq!(err.field(), "id");
        assert_eq!(err.to_string(), "id must be an email address containing `@`");
    }
}
