//! Security configuration for registry-warden
//!
//! This module defines the token security configuration and the resolver
//! that merges caller-supplied partial configuration over the built-in
//! defaults. The resolved configuration decides which of the two mutually
//! exclusive credential schemes is active: legacy symmetrically-encrypted
//! tokens, or signed JWT bearer tokens.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::ConfigError;

/// Default expiry for signed web session tokens
pub const DEFAULT_WEB_TOKEN_EXPIRY: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// Token security configuration
///
/// Resolved once per effective configuration, immutable thereafter, and safe
/// for concurrent reuse across any number of simultaneous requests.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SecurityConfig {
    /// Token options for web session tokens
    #[serde(default)]
    pub web: WebTokenSecurity,

    /// Token options for API access tokens
    #[serde(default)]
    pub api: ApiTokenSecurity,
}

impl SecurityConfig {
    /// Resolve a possibly absent security configuration to a complete one.
    ///
    /// Absent input yields the built-in defaults verbatim. Field-level
    /// merging of partial input over the defaults happens at
    /// deserialization time via the serde field defaults, so a present
    /// input is already fully populated. This operation is total.
    pub fn resolve(security: Option<&SecurityConfig>) -> SecurityConfig {
        security.cloned().unwrap_or_default()
    }

    /// Parse a security configuration fragment from YAML text.
    ///
    /// Fields missing from the fragment carry the documented defaults.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(yaml)
            .map_err(|e| ConfigError::Parse(format!("Failed to parse YAML: {}", e)))
    }

    /// Whether API tokens use the legacy symmetric-encryption scheme.
    ///
    /// True iff the legacy flag is set and no JWT sub-configuration is
    /// present; configuring `api.jwt` always disables legacy mode regardless
    /// of the flag. Every mode dispatch in this crate goes through this
    /// predicate, computed on a resolved configuration.
    pub fn uses_legacy_api_tokens(&self) -> bool {
        self.api.legacy && self.api.jwt.is_none()
    }

    /// Signing options for API JWT tokens, when configured.
    pub fn api_jwt_sign_options(&self) -> Option<&TokenSignOptions> {
        self.api.jwt.as_ref().and_then(|jwt| jwt.sign.as_ref())
    }
}

/// Security options for web session tokens
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WebTokenSecurity {
    /// Signing options (7-day expiry by default)
    #[serde(default = "default_web_sign_options")]
    pub sign: TokenSignOptions,

    /// Verification options (empty by default)
    #[serde(default)]
    pub verify: TokenVerifyOptions,
}

impl Default for WebTokenSecurity {
    fn default() -> Self {
        Self {
            sign: default_web_sign_options(),
            verify: TokenVerifyOptions::default(),
        }
    }
}

fn default_web_sign_options() -> TokenSignOptions {
    TokenSignOptions {
        expires_in: Some(DEFAULT_WEB_TOKEN_EXPIRY),
        not_before: None,
    }
}

/// Security options for API access tokens
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApiTokenSecurity {
    /// Whether legacy symmetric tokens are enabled
    #[serde(default = "default_legacy")]
    pub legacy: bool,

    /// JWT sub-configuration; presence disables legacy mode
    pub jwt: Option<JwtTokenOptions>,

    /// Signing options (empty by default)
    #[serde(default)]
    pub sign: TokenSignOptions,
}

impl Default for ApiTokenSecurity {
    fn default() -> Self {
        Self {
            legacy: default_legacy(),
            jwt: None,
            sign: TokenSignOptions::default(),
        }
    }
}

fn default_legacy() -> bool {
    true
}

/// JWT options for API tokens
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct JwtTokenOptions {
    /// Signing options for issued tokens
    pub sign: Option<TokenSignOptions>,

    /// Verification options for presented tokens
    pub verify: Option<TokenVerifyOptions>,
}

/// Options applied when signing a token
///
/// Durations use humantime strings in configuration text ("7d", "10h").
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TokenSignOptions {
    /// Lifetime of the issued token (no expiry claim when absent)
    #[serde(default, with = "humantime_serde::option")]
    pub expires_in: Option<Duration>,

    /// Delay before the issued token becomes valid
    #[serde(default, with = "humantime_serde::option")]
    pub not_before: Option<Duration>,
}

/// Options applied when verifying a token
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TokenVerifyOptions {
    /// Clock-skew tolerance for time-based claims
    #[serde(default, with = "humantime_serde::option")]
    pub leeway: Option<Duration>,
}
