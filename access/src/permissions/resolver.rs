//! Authorization decisions.
//!
//! Pure functions of a user snapshot and a query. The current user is always
//! passed in explicitly; nothing here reads ambient session state.

use fd_common::{Role, User, UserStatus};

/// Whether `user` may perform `action` on `resource`.
///
/// Resolution order:
/// 1. No user, or a user that is not `active`, has no standing at all
/// 2. Otherwise any permission of the user's role matching the query allows it
///
/// Unknown resources or actions are not errors; they just fail to match.
pub fn has_permission(user: Option<&User>, resource: &str, action: impl AsRef<str>) -> bool {
    let Some(user) = user else {
        return false;
    };
    user.is_active() && user.role.allows(resource, action.as_ref())
}

/// Like [`has_permission`], but explains a denial.
pub fn require_permission(
    user: &User,
    resource: &str,
    action: impl AsRef<str>,
) -> Result<(), PermissionError> {
    if !user.is_active() {
        return Err(PermissionError::InactiveUser(user.status));
    }

    let action = action.as_ref();
    if user.role.allows(resource, action) {
        Ok(())
    } else {
        Err(PermissionError::MissingPermission {
            resource: resource.to_string(),
            action: action.to_string(),
        })
    }
}

/// Check if an actor may hand out `target`.
///
/// Rules:
/// 1. Cannot grant a role more privileged (lower level) than your own
pub const fn can_grant_role(actor_role: &Role, target: &Role) -> Result<(), PermissionError> {
    if actor_role.can_grant(target) {
        Ok(())
    } else {
        Err(PermissionError::RoleHierarchy {
            actor_level: actor_role.level,
            target_level: target.level,
        })
    }
}

/// Check if an actor may change or remove a member.
///
/// Rules:
/// 1. Cannot act on a member more privileged than yourself
pub fn can_manage_member(actor: &User, target: &User) -> Result<(), PermissionError> {
    if target.role.outranks(&actor.role) {
        return Err(PermissionError::MemberHierarchy {
            actor_level: actor.role.level,
            target_level: target.role.level,
        });
    }
    Ok(())
}

/// Authorization denials.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PermissionError {
    /// Account is not active; no role applies.
    #[error("Account is {0}")]
    InactiveUser(UserStatus),

    /// Role has no permission matching the query.
    #[error("Missing permission: {action} on {resource}")]
    MissingPermission { resource: String, action: String },

    /// Attempted to grant a role above your own.
    #[error("Cannot grant role at level {target_level} (your level: {actor_level})")]
    RoleHierarchy { actor_level: u8, target_level: u8 },

    /// Attempted to manage a member above yourself.
    #[error("Cannot manage member at level {target_level} (your level: {actor_level})")]
    MemberHierarchy { actor_level: u8, target_level: u8 },

    /// Role id is not in the registry.
    #[error("Role not found: {0}")]
    UnknownRole(String),
}

impl PermissionError {
    /// Stable rejection code for the UI.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::UnknownRole(_) => "not_found",
            _ => "permission_denied",
        }
    }
}
