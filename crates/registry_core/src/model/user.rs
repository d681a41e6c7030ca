//! User domain model.
//!
//! # Responsibility
//! - Hold a normalized user value object keyed by email address.
//! - Validate the email/name rules before the registry persists a user.
//!
//! # Invariants
//! - `id` is always trimmed and lowercased, on every construction path
//!   (including deserialization).
//! - `name` is always trimmed.
//! - Construction never fails; `validate()` is the only gate.

use crate::model::entity::{
    normalize_identity, normalize_text, Entity, EntityKind, ValidationError,
};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Registered user. The email address is the natural key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "UserFields")]
pub struct User {
    id: String,
    name: String,
}

#[derive(Deserialize)]
struct UserFields {
    id: String,
    name: String,
}

impl From<UserFields> for User {
    fn from(value: UserFields) -> Self {
        Self::new(&value.id, &value.name)
    }
}

impl User {
    /// Builds a user from raw form input.
    ///
    /// Performs normalization only; the result may still be invalid.
    pub fn new(raw_id: &str, raw_name: &str) -> Self {
        Self {
            id: normalize_identity(raw_id),
            name: normalize_text(raw_name),
        }
    }

    /// Normalized email address.
    pub fn email(&self) -> &str {
        &self.id
    }

    /// Returns a copy carrying a new display name; identity is unchanged.
    pub fn renamed(&self, raw_name: &str) -> Self {
        Self::new(&self.id, raw_name)
    }
}

impl Entity for User {
    const KIND: EntityKind = EntityKind::User;

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
        if !self.id.contains('@') {
            return Err(ValidationError::InvalidFormat {
                field: "id",
                expected: "an email address containing `@`",
            });
        }
        if self.name.is_empty() {
            return Err(ValidationError::Empty { field: "name" });
        }
        Ok(())
    }
}

impl Display for User {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name, self.id)
    }
}
