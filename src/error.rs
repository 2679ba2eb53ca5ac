//! Application error types for registry-warden
//!
//! This module defines common error types used throughout the crate.
//! All error types use `thiserror` for ergonomic error handling.
//!
//! The taxonomy keeps authentication failures (`AuthError`, the Unauthorized
//! class) statically distinct from authorization failures (`AccessError`, the
//! Forbidden class) so callers can always tell the two apart.

use thiserror::Error;

use crate::models::AccessAction;

/// Authentication-related errors
///
/// Absence of credentials is not an error and is never represented here;
/// resolution reports it as `Ok(None)` and callers fall back to the
/// anonymous identity.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum AuthError {
    /// A bearer token failed verification for a reason other than the
    /// signature/format check itself (key material, claim decoding, internal
    /// failure in the verifier)
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// The user store rejected the supplied username/password pair
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// The signing collaborator failed while issuing a token
    #[error("Token signing failed: {0}")]
    Signing(String),

    /// Symmetric cipher failure while issuing a legacy token
    #[error("Crypto error: {0}")]
    Crypto(#[from] CryptoError),
}

/// Authorization (permission) errors
///
/// Raised when a well-identified principal lacks permission for a requested
/// action. Distinct from `AuthError` by design.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum AccessError {
    /// A named user is not listed for the action, directly or via groups
    #[error("user {user} is not allowed to {action} package {package}")]
    UserForbidden {
        /// Name of the denied user
        user: String,
        /// The guarded action
        action: AccessAction,
        /// Name of the target package
        package: String,
    },

    /// An unauthenticated caller is not listed for the action
    #[error("unregistered users are not allowed to {action} package {package}")]
    UnregisteredForbidden {
        /// The guarded action
        action: AccessAction,
        /// Name of the target package
        package: String,
    },
}

/// Symmetric cipher errors
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CryptoError {
    /// Encryption failed
    #[error("Encryption failed: {0}")]
    EncryptFailed(String),

    /// Decryption failed (wrong secret or corrupted payload)
    #[error("Decryption failed: {0}")]
    DecryptFailed(String),

    /// Payload is too short to carry a nonce
    #[error("Ciphertext too short")]
    TruncatedPayload,
}

/// User store errors
#[derive(Debug, Error, Clone, PartialEq)]
pub enum StoreError {
    /// The username/password pair was rejected
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// A user with this name already exists
    #[error("User already exists: {0}")]
    UserExists(String),

    /// Backend failure in the store implementation
    #[error("Store error: {0}")]
    Backend(String),
}

/// Configuration error types
///
/// Resolving a security configuration over the defaults is total and cannot
/// fail; this type only covers parsing a configuration fragment from text.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    /// Error parsing configuration text
    #[error("Failed to parse configuration: {0}")]
    Parse(String),
}

/// Application-level error type
///
/// Aggregates all domain-specific error types for callers that want a single
/// error surface.
#[derive(Debug, Error)]
pub enum AppError {
    /// Authentication error
    #[error("Authentication failed: {0}")]
    Auth(#[from] AuthError),

    /// Authorization error
    #[error("Access denied: {0}")]
    Access(#[from] AccessError),

    /// Crypto error
    #[error("Crypto error: {0}")]
    Crypto(#[from] CryptoError),

    /// User store error
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}
