//! User use-case service.
//!
//! # Responsibility
//! - Provide user registry entry points that accept raw field strings.
//! - Delegate validation, uniqueness and persistence to the repository.
//!
//! # Invariants
//! - Service APIs never bypass repository validation/uniqueness contracts.
//! - Service layer remains storage-agnostic.

use crate::model::user::User;
use crate::repo::entity_repo::{EntityRepository, LookupAttribute, RegistryResult};

/// Use-case service wrapper for user registry operations.
pub struct UserService<R: EntityRepository<User>> {
    repo: R,
}

impl<R: EntityRepository<User>> UserService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Registers a new user from raw email and name input.
    ///
    /// Returns the normalized user exactly as stored.
    pub fn create_user(&mut self, raw_email: &str, raw_name: &str) -> RegistryResult<User> {
        let user = User::new(raw_email, raw_name);
        self.repo.create(&user)?;
        Ok(user)
    }

    /// Renames an existing user. The email address cannot change.
    pub fn rename_user(&mut self, raw_email: &str, raw_name: &str) -> RegistryResult<User> {
        let user = User::new(raw_email, raw_name);
        self.repo.update(&user)?;
        Ok(user)
    }

    /// Lists all users ordered by name.
    pub fn list_users(&self) -> RegistryResult<Vec<User>> {
        self.repo.find_all()
    }

    /// Looks up one user by email.
    pub fn get_user(&self, raw_email: &str) -> RegistryResult<Option<User>> {
        self.repo.find_by(LookupAttribute::Id, raw_email)
    }

    /// Looks up one user by a raw attribute name (`id` or `name`).
    pub fn find_user(&self, attribute: &str, value: &str) -> RegistryResult<Option<User>> {
        self.repo.find_by_attribute(attribute, value)
    }

    /// Deletes the user with the given email.
    ///
    /// Returns whether a stored user was removed; an unknown email is not an
    /// error.
    pub fn delete_user(&mut self, raw_email: &str) -> RegistryResult<bool> {
        let removed = self.repo.delete(&User::new(raw_email, ""))?;
        Ok(removed > 0)
    }
}
