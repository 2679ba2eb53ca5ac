//! Package access-control models
//!
//! This module defines the per-package permission view: an ordered list of
//! principal names (user names or group names) for each guarded action.

use serde::{Deserialize, Serialize};

/// A guarded package action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessAction {
    /// Read package metadata or download a tarball
    Access,
    /// Publish a new package version
    Publish,
}

impl std::fmt::Display for AccessAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AccessAction::Access => write!(f, "access"),
            AccessAction::Publish => write!(f, "publish"),
        }
    }
}

/// Access-control view of a package
///
/// Each list holds principal names that may be either literal user names or
/// group names. Order is preserved from configuration but carries no
/// precedence meaning.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageAccess {
    /// Package name
    pub name: String,

    /// Principals allowed to access the package
    #[serde(default)]
    pub access: Vec<String>,

    /// Principals allowed to publish the package
    #[serde(default)]
    pub publish: Vec<String>,
}

impl PackageAccess {
    /// Create a permission view with empty principal lists
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            access: Vec::new(),
            publish: Vec::new(),
        }
    }

    /// Set the access principal list
    pub fn with_access(mut self, principals: Vec<String>) -> Self {
        self.access = principals;
        self
    }

    /// Set the publish principal list
    pub fn with_publish(mut self, principals: Vec<String>) -> Self {
        self.publish = principals;
        self
    }

    /// The principal list guarding the given action
    pub fn principals_for(&self, action: AccessAction) -> &[String] {
        match action {
            AccessAction::Access => &self.access,
            AccessAction::Publish => &self.publish,
        }
    }
}
