//! Role Types

use serde::{Deserialize, Serialize};

use super::permission::Permission;

/// Named, leveled bundle of permissions.
///
/// Level 1 is the most privileged. Roles are built once at startup and
/// shared behind an `Arc` by every user that holds them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub id: String,
    pub name: String,
    pub level: u8,
    pub permissions: Vec<Permission>,
}

impl Role {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        level: u8,
        permissions: Vec<Permission>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            level,
            permissions,
        }
    }

    /// Whether any permission of this role covers the query.
    #[must_use]
    pub fn allows(&self, resource: &str, action: &str) -> bool {
        self.permissions.iter().any(|p| p.matches(resource, action))
    }

    /// Strictly more privileged (lower level) than `other`.
    #[must_use]
    pub const fn outranks(&self, other: &Self) -> bool {
        self.level < other.level
    }

    /// A holder of this role may hand out `target` (same or less privileged).
    #[must_use]
    pub const fn can_grant(&self, target: &Self) -> bool {
        self.level <= target.level
    }
}
