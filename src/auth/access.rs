//! Permission enforcement
//!
//! Decides whether a resolved identity may perform a guarded action on a
//! package. A principal list entry matches the identity's name or any of
//! its groups; the first match grants the action.

use crate::error::AccessError;
use crate::models::{AccessAction, PackageAccess, RemoteUser};

/// Check whether an identity may perform an action on a package.
///
/// Grants iff the identity's name equals any listed principal, or any of
/// the identity's groups equals any listed principal. Denials carry a
/// Forbidden-class error whose message distinguishes named users from
/// unregistered callers.
pub fn check_permission(
    action: AccessAction,
    user: &RemoteUser,
    package: &PackageAccess,
) -> Result<(), AccessError> {
    let principals = package.principals_for(action);

    let granted = principals.iter().any(|principal| {
        user.name.as_deref() == Some(principal.as_str())
            || user.groups.iter().any(|group| group == principal)
    });
    if granted {
        return Ok(());
    }

    tracing::debug!(
        user = ?user.name,
        %action,
        package = %package.name,
        "permission denied"
    );

    match &user.name {
        Some(name) => Err(AccessError::UserForbidden {
            user: name.clone(),
            action,
            package: package.name.clone(),
        }),
        None => Err(AccessError::UnregisteredForbidden {
            action,
            package: package.name.clone(),
        }),
    }
}

/// Check read access to a package
pub fn allow_access(user: &RemoteUser, package: &PackageAccess) -> Result<(), AccessError> {
    check_permission(AccessAction::Access, user, package)
}

/// Check publish access to a package
pub fn allow_publish(user: &RemoteUser, package: &PackageAccess) -> Result<(), AccessError> {
    check_permission(AccessAction::Publish, user, package)
}
