//! Credential resolution
//!
//! This module turns a raw `Authorization` header into either raw basic
//! credentials (legacy mode) or a verified identity (modern mode). The two
//! code paths are mutually exclusive; the active one is selected by the
//! resolved security configuration.
//!
//! Absence of usable credentials is not an error: it is reported as
//! `Ok(None)` so the caller can fall back to the anonymous identity. Only
//! the modern verification path can raise.

use base64::{engine::general_purpose::STANDARD, Engine};

use crate::auth::header::{parse_auth_header, AuthTokenHeader};
use crate::auth::token::{TokenSigner, VerifyError};
use crate::config::SecurityConfig;
use crate::crypto;
use crate::error::AuthError;
use crate::models::RemoteUser;

/// Basic credentials decoded from a legacy token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BasicPayload {
    /// User name (head of the credential string)
    pub user: String,

    /// Password (everything after the first `:`, may itself contain `:`)
    pub password: String,
}

impl BasicPayload {
    /// Split a credential string at the first `:`.
    ///
    /// Returns `None` when the string contains no `:`.
    pub fn from_credential_string(raw: &str) -> Option<Self> {
        let (user, password) = raw.split_once(':')?;
        Some(Self {
            user: user.to_string(),
            password: password.to_string(),
        })
    }
}

/// Outcome of credential resolution
///
/// Legacy mode yields raw basic credentials still to be checked against the
/// user store; modern mode yields an already-verified identity. Call sites
/// handle each variant explicitly.
#[derive(Debug, Clone, PartialEq)]
pub enum ResolvedCredentials {
    /// Raw basic credentials from a legacy token
    Basic(BasicPayload),

    /// Verified identity from a signed bearer token
    Identity(RemoteUser),
}

/// Decode a legacy token into the credential string it carries.
///
/// `Basic` tokens are plain base64; `Bearer` tokens are base64 over a
/// symmetrically encrypted payload. Any other scheme, a missing token, or a
/// failed decode yields `None` so a stale token degrades to anonymous
/// instead of failing the request.
fn decode_legacy_token(header: &AuthTokenHeader, secret: &str) -> Option<String> {
    let token = header.token.as_deref()?;

    if header.is_basic() {
        let bytes = STANDARD.decode(token).ok()?;
        String::from_utf8(bytes).ok()
    } else if header.is_bearer() {
        let bytes = STANDARD.decode(token).ok()?;
        let plain = crypto::decrypt(&bytes, secret).ok()?;
        String::from_utf8(plain).ok()
    } else {
        None
    }
}

/// Resolve a header under the legacy scheme into basic credentials.
pub fn resolve_legacy_credentials(raw_header: &str, secret: &str) -> Option<BasicPayload> {
    let header = parse_auth_header(raw_header);
    let credential = decode_legacy_token(&header, secret)?;
    BasicPayload::from_credential_string(&credential)
}

/// Resolve an `Authorization` header into credentials.
///
/// Dispatches on the configured scheme: legacy mode decodes basic
/// credentials, modern mode verifies a signed bearer token. A signed token
/// that fails the signature/format check resolves to the anonymous identity
/// so clients issued tokens under a previous scheme are forced to
/// re-authenticate rather than hard-failed; every other verification
/// failure surfaces as an Unauthorized-class error.
pub async fn resolve_credentials(
    raw_header: &str,
    security: &SecurityConfig,
    secret: &str,
    signer: &dyn TokenSigner,
) -> Result<Option<ResolvedCredentials>, AuthError> {
    if security.uses_legacy_api_tokens() {
        return Ok(resolve_legacy_credentials(raw_header, secret).map(ResolvedCredentials::Basic));
    }

    let header = parse_auth_header(raw_header);
    if !header.is_bearer() {
        return Ok(None);
    }
    let token = match header.token.as_deref() {
        Some(token) if !token.is_empty() => token,
        _ => return Ok(None),
    };

    match signer.verify(token, secret).await {
        Ok(user) => Ok(Some(ResolvedCredentials::Identity(user))),
        Err(VerifyError::Signature(reason)) => {
            tracing::warn!(%reason, "bearer token failed signature check, resolving to anonymous");
            Ok(Some(ResolvedCredentials::Identity(RemoteUser::anonymous())))
        }
        Err(VerifyError::Other(reason)) => Err(AuthError::Unauthorized(reason)),
    }
}
