//! User store collaborator
//!
//! This module defines the trait the authentication gate uses to check
//! basic credentials and register users. Store implementations live outside
//! this crate; tests use the generated mock.

use async_trait::async_trait;

use crate::error::StoreError;

/// User store operations consumed by the authentication gate
///
/// It uses `async_trait` for async methods and `mockall::automock` for
/// testing.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Check a username/password pair.
    ///
    /// Returns the user's group list on success, or
    /// `StoreError::InvalidCredentials` when the pair is rejected.
    async fn authenticate(&self, username: &str, password: &str)
        -> Result<Vec<String>, StoreError>;

    /// Register a new user.
    async fn add_user(&self, username: &str, password: &str) -> Result<(), StoreError>;
}
