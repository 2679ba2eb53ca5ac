//! Identity domain models
//!
//! This module defines the resolved request identity and the builtin group
//! markers attached to it.

use serde::{Deserialize, Serialize};

/// Group marker carried by every identity
pub const GROUP_ALL: &str = "$all";

/// Group marker carried by unauthenticated identities
pub const GROUP_ANONYMOUS: &str = "$anonymous";

/// Group marker carried by authenticated identities
pub const GROUP_AUTHENTICATED: &str = "$authenticated";

// Deprecated aliases of the markers above, kept so group lists written by
// older deployments keep matching. Scheduled for removal in a future
// revision.
pub const GROUP_ALL_DEPRECATED: &str = "@all";
pub const GROUP_ANONYMOUS_DEPRECATED: &str = "@anonymous";
pub const GROUP_AUTHENTICATED_DEPRECATED: &str = "@authenticated";

/// Identity resolved for a request
///
/// Constructed per request, never mutated after construction, and never
/// persisted. An authenticated identity always has a name; the anonymous
/// identity has none.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteUser {
    /// User name (absent for the anonymous identity)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Effective groups, including the builtin markers
    #[serde(default)]
    pub groups: Vec<String>,

    /// Groups as reported by the user store, without the builtin markers.
    /// Used for audit and display, never for privilege grants.
    #[serde(default)]
    pub real_groups: Vec<String>,
}

impl RemoteUser {
    /// The canonical "no one is logged in" identity.
    ///
    /// Returns a fresh value on every call so concurrent resolutions never
    /// share a mutable default.
    pub fn anonymous() -> Self {
        Self {
            name: None,
            groups: vec![
                GROUP_ALL.to_string(),
                GROUP_ANONYMOUS.to_string(),
                GROUP_ALL_DEPRECATED.to_string(),
                GROUP_ANONYMOUS_DEPRECATED.to_string(),
            ],
            real_groups: Vec::new(),
        }
    }

    /// An authenticated identity carrying the store-reported groups.
    ///
    /// The builtin authenticated markers come first, followed by the real
    /// groups, which also populate `real_groups` verbatim.
    pub fn authenticated(name: impl Into<String>, real_groups: Vec<String>) -> Self {
        let mut groups = vec![
            GROUP_ALL.to_string(),
            GROUP_AUTHENTICATED.to_string(),
            GROUP_ALL_DEPRECATED.to_string(),
            GROUP_AUTHENTICATED_DEPRECATED.to_string(),
        ];
        groups.extend(real_groups.iter().cloned());

        Self {
            name: Some(name.into()),
            groups,
            real_groups,
        }
    }

    /// Whether this is the anonymous identity
    pub fn is_anonymous(&self) -> bool {
        self.name.is_none()
    }
}
