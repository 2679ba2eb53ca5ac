//! Authentication system for registry-warden
//!
//! This module provides authentication and authorization functionality:
//! - Authorization header parsing
//! - Credential resolution for the legacy and signed token schemes
//! - Token issuance and verification
//! - Package permission enforcement

pub mod access;
pub mod credentials;
pub mod header;
pub mod manager;
pub mod token;

pub use access::{allow_access, allow_publish, check_permission};
pub use credentials::{
    resolve_credentials, resolve_legacy_credentials, BasicPayload, ResolvedCredentials,
};
pub use header::{
    is_header_well_formed, parse_auth_header, AuthTokenHeader, SCHEME_BASIC, SCHEME_BEARER,
};
pub use manager::AuthGate;
pub use token::{
    issue_api_token, issue_web_token, JwtSigner, SessionToken, SignError, TokenSigner,
    VerifyError, SESSION_TOKEN_LIFETIME_HOURS,
};
