//! Authentication gate
//!
//! This module provides the main authentication interface for the crate.
//! It wires header parsing, credential resolution, the user store, and the
//! permission enforcer into one request-facing surface.

use std::sync::Arc;

use tracing::debug;

use crate::auth::access;
use crate::auth::credentials::{resolve_credentials, ResolvedCredentials};
use crate::auth::token::{self, TokenSigner};
use crate::config::SecurityConfig;
use crate::error::{AccessError, AuthError, StoreError};
use crate::models::{PackageAccess, RemoteUser};
use crate::store::UserStore;

/// Authentication gate
///
/// Holds the resolved security configuration, the shared secret, and the
/// external collaborators. Safe for concurrent reuse behind `Arc`.
pub struct AuthGate<S: UserStore> {
    security: SecurityConfig,
    secret: String,
    store: Arc<S>,
    signer: Arc<dyn TokenSigner>,
}

impl<S: UserStore> AuthGate<S> {
    /// Create a new authentication gate.
    ///
    /// The security configuration is resolved over the built-in defaults
    /// once, here; every later mode dispatch reads the resolved copy.
    pub fn new(
        security: Option<&SecurityConfig>,
        secret: impl Into<String>,
        store: Arc<S>,
        signer: Arc<dyn TokenSigner>,
    ) -> Self {
        Self {
            security: SecurityConfig::resolve(security),
            secret: secret.into(),
            store,
            signer,
        }
    }

    /// The resolved security configuration
    pub fn security(&self) -> &SecurityConfig {
        &self.security
    }

    /// Resolve the identity making a request.
    ///
    /// A missing header or absent credentials resolve to the anonymous
    /// identity. Basic credentials are checked against the user store; a
    /// verified bearer identity is returned directly. Hard authentication
    /// failures propagate.
    pub async fn resolve_identity(&self, header: Option<&str>) -> Result<RemoteUser, AuthError> {
        let Some(raw) = header else {
            debug!("no authorization header, resolving to anonymous");
            return Ok(RemoteUser::anonymous());
        };

        let resolved =
            resolve_credentials(raw, &self.security, &self.secret, self.signer.as_ref()).await?;

        match resolved {
            None => {
                debug!("no usable credentials, resolving to anonymous");
                Ok(RemoteUser::anonymous())
            }
            Some(ResolvedCredentials::Identity(user)) => Ok(user),
            Some(ResolvedCredentials::Basic(payload)) => {
                let groups = self
                    .store
                    .authenticate(&payload.user, &payload.password)
                    .await
                    .map_err(map_store_error)?;
                debug!(user = %payload.user, "authenticated against user store");
                Ok(RemoteUser::authenticated(payload.user, groups))
            }
        }
    }

    /// Register a new user and return its authenticated identity.
    pub async fn add_user(&self, username: &str, password: &str) -> Result<RemoteUser, AuthError> {
        self.store
            .add_user(username, password)
            .await
            .map_err(map_store_error)?;
        let groups = self
            .store
            .authenticate(username, password)
            .await
            .map_err(map_store_error)?;

        Ok(RemoteUser::authenticated(username, groups))
    }

    /// Issue an API token for a resolved identity
    pub async fn issue_api_token(&self, user: &RemoteUser) -> Result<String, AuthError> {
        token::issue_api_token(user, &self.security, &self.secret, self.signer.as_ref()).await
    }

    /// Issue a web session token for a resolved identity
    pub async fn issue_web_token(&self, user: &RemoteUser) -> Result<String, AuthError> {
        token::issue_web_token(user, &self.security, &self.secret, self.signer.as_ref()).await
    }

    /// Check read access to a package
    pub fn allow_access(
        &self,
        user: &RemoteUser,
        package: &PackageAccess,
    ) -> Result<(), AccessError> {
        access::allow_access(user, package)
    }

    /// Check publish access to a package
    pub fn allow_publish(
        &self,
        user: &RemoteUser,
        package: &PackageAccess,
    ) -> Result<(), AccessError> {
        access::allow_publish(user, package)
    }
}

fn map_store_error(err: StoreError) -> AuthError {
    match err {
        StoreError::InvalidCredentials => AuthError::InvalidCredentials,
        other => AuthError::Unauthorized(other.to_string()),
    }
}
