//! Token signing, verification, and issuance
//!
//! This module defines the sign/verify collaborator seam, its JWT
//! implementation, and the token issuer that picks between the legacy
//! symmetric scheme and the signed scheme. Exactly one of the two issuance
//! paths runs per call.

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::{SecurityConfig, TokenSignOptions, TokenVerifyOptions};
use crate::crypto;
use crate::error::AuthError;
use crate::models::RemoteUser;

/// Fixed lifetime of a session token
pub const SESSION_TOKEN_LIFETIME_HOURS: i64 = 10;

/// Error raised by the signing half of the collaborator
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SignError {
    /// Signing failed
    #[error("{0}")]
    Signing(String),
}

/// Error raised by the verification half of the collaborator
///
/// The two variants drive the fallback rule: a `Signature` failure degrades
/// the resolution to the anonymous identity, while `Other` must surface to
/// the caller as an Unauthorized-class error.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum VerifyError {
    /// The structural or signature check itself failed
    #[error("{0}")]
    Signature(String),

    /// Key material, claim decoding, or internal failure
    #[error("{0}")]
    Other(String),
}

/// Token sign/verify collaborator
///
/// Both operations may perform asynchronous work; callers await completion
/// before using the result. Implementations must be shareable across
/// concurrent resolutions.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TokenSigner: Send + Sync {
    /// Sign an identity into an opaque token string
    async fn sign(
        &self,
        user: &RemoteUser,
        options: &TokenSignOptions,
        secret: &str,
    ) -> Result<String, SignError>;

    /// Verify a token and recover the identity it carries
    async fn verify(&self, token: &str, secret: &str) -> Result<RemoteUser, VerifyError>;
}

/// JWT claims carried by signed identity tokens
#[derive(Debug, Serialize, Deserialize)]
struct IdentityClaims {
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(default)]
    groups: Vec<String>,
    #[serde(default)]
    real_groups: Vec<String>,
    iat: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    exp: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    nbf: Option<i64>,
}

impl IdentityClaims {
    fn new(user: &RemoteUser, options: &TokenSignOptions) -> Self {
        let now = Utc::now().timestamp();
        Self {
            name: user.name.clone(),
            groups: user.groups.clone(),
            real_groups: user.real_groups.clone(),
            iat: now,
            exp: options.expires_in.map(|d| now + d.as_secs() as i64),
            nbf: options.not_before.map(|d| now + d.as_secs() as i64),
        }
    }
}

impl From<IdentityClaims> for RemoteUser {
    fn from(claims: IdentityClaims) -> Self {
        Self {
            name: claims.name,
            groups: claims.groups,
            real_groups: claims.real_groups,
        }
    }
}

/// HMAC-signed JWT implementation of [`TokenSigner`]
#[derive(Debug, Clone, Default)]
pub struct JwtSigner {
    leeway: Option<std::time::Duration>,
}

impl JwtSigner {
    /// Create a signer with default verification settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a signer honoring the configured verification options
    pub fn with_verify_options(options: &TokenVerifyOptions) -> Self {
        Self {
            leeway: options.leeway,
        }
    }
}

#[async_trait]
impl TokenSigner for JwtSigner {
    async fn sign(
        &self,
        user: &RemoteUser,
        options: &TokenSignOptions,
        secret: &str,
    ) -> Result<String, SignError> {
        let claims = IdentityClaims::new(user, options);
        let key = EncodingKey::from_secret(secret.as_bytes());

        encode(&Header::default(), &claims, &key).map_err(|e| SignError::Signing(e.to_string()))
    }

    async fn verify(&self, token: &str, secret: &str) -> Result<RemoteUser, VerifyError> {
        let key = DecodingKey::from_secret(secret.as_bytes());

        let mut validation = Validation::default();
        // Tokens signed without expiry options carry no exp claim
        validation.set_required_spec_claims::<&str>(&[]);
        if let Some(leeway) = self.leeway {
            validation.leeway = leeway.as_secs();
        }

        decode::<IdentityClaims>(token, &key, &validation)
            .map(|data| RemoteUser::from(data.claims))
            .map_err(classify_verify_error)
    }
}

/// Map the verification library's error kinds onto the collaborator's two
/// failure classes.
///
/// Only failures of the structural/signature check itself land in
/// `Signature`; key-material, claim-decoding, and internal failures stay
/// hard errors, as do unknown future kinds.
fn classify_verify_error(err: jsonwebtoken::errors::Error) -> VerifyError {
    use jsonwebtoken::errors::ErrorKind;

    match err.kind() {
        ErrorKind::InvalidToken
        | ErrorKind::InvalidSignature
        | ErrorKind::ExpiredSignature
        | ErrorKind::ImmatureSignature
        | ErrorKind::InvalidAlgorithm
        | ErrorKind::Base64(_) => VerifyError::Signature(err.to_string()),

        _ => VerifyError::Other(err.to_string()),
    }
}

/// Issue an API token for a resolved identity.
///
/// Legacy mode, or modern mode without `api.jwt.sign` options, produces the
/// base64 of the symmetric encryption of `"<name>:<secret>"`. Otherwise the
/// identity is signed with the configured options. Exactly one of the two
/// paths executes.
pub async fn issue_api_token(
    user: &RemoteUser,
    security: &SecurityConfig,
    secret: &str,
    signer: &dyn TokenSigner,
) -> Result<String, AuthError> {
    match security.api_jwt_sign_options() {
        Some(options) if !security.uses_legacy_api_tokens() => {
            tracing::debug!(user = ?user.name, "issuing signed api token");
            signer
                .sign(user, options, secret)
                .await
                .map_err(|e| AuthError::Signing(e.to_string()))
        }
        _ => {
            tracing::debug!(user = ?user.name, "issuing legacy api token");
            let name = user.name.as_deref().unwrap_or_default();
            let payload = format!("{}:{}", name, secret);
            let encrypted = crypto::encrypt(payload.as_bytes(), secret)?;
            Ok(STANDARD.encode(encrypted))
        }
    }
}

/// Issue a signed web session token using the `web` signing options.
pub async fn issue_web_token(
    user: &RemoteUser,
    security: &SecurityConfig,
    secret: &str,
    signer: &dyn TokenSigner,
) -> Result<String, AuthError> {
    signer
        .sign(user, &security.web.sign, secret)
        .await
        .map_err(|e| AuthError::Signing(e.to_string()))
}

/// An opaque token paired with its absolute expiration instant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionToken {
    /// The opaque token value
    pub token: String,

    /// When the session expires
    pub expires_at: DateTime<Utc>,
}

impl SessionToken {
    /// Wrap a token with the fixed session lifetime.
    ///
    /// The expiration is metadata only; no timer is held.
    pub fn create(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            expires_at: Utc::now() + Duration::hours(SESSION_TOKEN_LIFETIME_HOURS),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::JwtTokenOptions;
    use std::time::Duration as StdDuration;

    fn jwt_security(expires_in: Option<StdDuration>) -> SecurityConfig {
        let mut security = SecurityConfig::default();
        security.api.jwt = Some(JwtTokenOptions {
            sign: Some(TokenSignOptions {
                expires_in,
                not_before: None,
            }),
            verify: None,
        });
        security
    }

    // Test 1: Sign and verify round-trip preserves the identity
    #[tokio::test]
    async fn test_sign_verify_roundtrip() {
        let signer = JwtSigner::new();
        let user = RemoteUser::authenticated("alice", vec!["maintainers".to_string()]);
        let options = TokenSignOptions {
            expires_in: Some(StdDuration::from_secs(3600)),
            not_before: None,
        };

        let token = signer.sign(&user, &options, "secret").await.unwrap();
        let verified = signer.verify(&token, "secret").await.unwrap();

        assert_eq!(verified, user);
    }

    // Test 2: Tokens signed without expiry options still verify
    #[tokio::test]
    async fn test_verify_token_without_expiry() {
        let signer = JwtSigner::new();
        let user = RemoteUser::authenticated("alice", Vec::new());

        let token = signer
            .sign(&user, &TokenSignOptions::default(), "secret")
            .await
            .unwrap();
        let verified = signer.verify(&token, "secret").await.unwrap();

        assert_eq!(verified.name.as_deref(), Some("alice"));
    }

    // Test 3: A wrong secret is a signature-class failure
    #[tokio::test]
    async fn test_verify_wrong_secret_is_signature_error() {
        let signer = JwtSigner::new();
        let user = RemoteUser::authenticated("alice", Vec::new());

        let token = signer
            .sign(&user, &TokenSignOptions::default(), "secret")
            .await
            .unwrap();
        let result = signer.verify(&token, "other-secret").await;

        assert!(matches!(result, Err(VerifyError::Signature(_))));
    }

    // Test 4: Garbage tokens are a signature-class failure
    #[tokio::test]
    async fn test_verify_garbage_token_is_signature_error() {
        let signer = JwtSigner::new();

        for token in ["not.a.token", "garbage", ""] {
            let result = signer.verify(token, "secret").await;
            assert!(
                matches!(result, Err(VerifyError::Signature(_))),
                "expected signature-class error for token {:?}",
                token
            );
        }
    }

    // Test 5: An expired token is a signature-class failure
    #[tokio::test]
    async fn test_verify_expired_token_is_signature_error() {
        let signer = JwtSigner::new();
        let now = Utc::now().timestamp();
        let claims = IdentityClaims {
            name: Some("alice".to_string()),
            groups: Vec::new(),
            real_groups: Vec::new(),
            iat: now - 7200,
            exp: Some(now - 3600),
            nbf: None,
        };
        let key = EncodingKey::from_secret(b"secret");
        let token = encode(&Header::default(), &claims, &key).unwrap();

        let result = signer.verify(&token, "secret").await;
        assert!(matches!(result, Err(VerifyError::Signature(_))));
    }

    // Test 6: Malformed claims are a hard failure, not a fallback
    #[tokio::test]
    async fn test_verify_malformed_claims_is_other_error() {
        let signer = JwtSigner::new();
        // Well-signed token whose payload does not match the claims shape
        let claims = serde_json::json!({ "groups": "not-an-array", "iat": 0 });
        let key = EncodingKey::from_secret(b"secret");
        let token = encode(&Header::default(), &claims, &key).unwrap();

        let result = signer.verify(&token, "secret").await;
        assert!(matches!(result, Err(VerifyError::Other(_))));
    }

    // Test 7: Legacy issuance returns base64 of the encrypted name:secret
    #[tokio::test]
    async fn test_issue_api_token_legacy() {
        let security = SecurityConfig::default();
        let signer = JwtSigner::new();
        let user = RemoteUser::authenticated("alice", Vec::new());

        let token = issue_api_token(&user, &security, "secret", &signer)
            .await
            .unwrap();

        let encrypted = STANDARD.decode(&token).unwrap();
        let plain = crypto::decrypt(&encrypted, "secret").unwrap();
        assert_eq!(plain, b"alice:secret");
    }

    // Test 8: Legacy mode never invokes the signer
    #[tokio::test]
    async fn test_issue_api_token_legacy_never_signs() {
        let security = SecurityConfig::default();
        let signer = MockTokenSigner::new();
        let user = RemoteUser::authenticated("alice", Vec::new());

        // No expectation on sign: any call would panic the mock
        let token = issue_api_token(&user, &security, "secret", &signer)
            .await
            .unwrap();
        assert!(STANDARD.decode(&token).is_ok());
    }

    // Test 9: Modern mode with sign options produces a verifiable JWT
    #[tokio::test]
    async fn test_issue_api_token_signed() {
        let security = jwt_security(Some(StdDuration::from_secs(3600)));
        let signer = JwtSigner::new();
        let user = RemoteUser::authenticated("alice", vec!["maintainers".to_string()]);

        let token = issue_api_token(&user, &security, "secret", &signer)
            .await
            .unwrap();
        let verified = signer.verify(&token, "secret").await.unwrap();

        assert_eq!(verified, user);
    }

    // Test 10: Modern mode without sign options falls back to the legacy path
    #[tokio::test]
    async fn test_issue_api_token_jwt_without_sign_options() {
        let mut security = SecurityConfig::default();
        security.api.jwt = Some(JwtTokenOptions::default());
        let signer = MockTokenSigner::new();
        let user = RemoteUser::authenticated("alice", Vec::new());

        let token = issue_api_token(&user, &security, "secret", &signer)
            .await
            .unwrap();

        let encrypted = STANDARD.decode(&token).unwrap();
        let plain = crypto::decrypt(&encrypted, "secret").unwrap();
        assert_eq!(plain, b"alice:secret");
    }

    // Test 11: Web tokens are signed regardless of legacy mode
    #[tokio::test]
    async fn test_issue_web_token_always_signed() {
        let security = SecurityConfig::default();
        assert!(security.uses_legacy_api_tokens());

        let signer = JwtSigner::new();
        let user = RemoteUser::authenticated("alice", Vec::new());

        let token = issue_web_token(&user, &security, "secret", &signer)
            .await
            .unwrap();
        let verified = signer.verify(&token, "secret").await.unwrap();

        assert_eq!(verified.name.as_deref(), Some("alice"));
    }

    // Test 12: Session tokens expire 10 hours after creation
    #[test]
    fn test_session_token_lifetime() {
        let before = Utc::now() + Duration::hours(SESSION_TOKEN_LIFETIME_HOURS);
        let session = SessionToken::create("opaque-token");
        let after = Utc::now() + Duration::hours(SESSION_TOKEN_LIFETIME_HOURS);

        assert_eq!(session.token, "opaque-token");
        assert!(session.expires_at >= before);
        assert!(session.expires_at <= after);
    }

    // Test 13: Verification honors the configured leeway
    #[tokio::test]
    async fn test_verify_with_leeway() {
        let options = TokenVerifyOptions {
            leeway: Some(StdDuration::from_secs(7200)),
        };
        let signer = JwtSigner::with_verify_options(&options);

        let now = Utc::now().timestamp();
        let claims = IdentityClaims {
            name: Some("alice".to_string()),
            groups: Vec::new(),
            real_groups: Vec::new(),
            iat: now - 3600,
            exp: Some(now - 1800),
            nbf: None,
        };
        let key = EncodingKey::from_secret(b"secret");
        let token = encode(&Header::default(), &claims, &key).unwrap();

        // Expired half an hour ago but within the two-hour leeway
        let verified = signer.verify(&token, "secret").await.unwrap();
        assert_eq!(verified.name.as_deref(), Some("alice"));
    }
}
