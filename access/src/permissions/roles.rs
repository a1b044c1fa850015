//! Role registry.
//!
//! The fixed set of roles available to an organization, seeded once from the
//! permission catalog. No runtime mutation API exists; roles are shared by
//! `Arc` with every user and invitation that refers to them.

use std::sync::Arc;

use fd_common::{Permission, Role};

use super::catalog::{permissions_of, CatalogPermission};
use super::resolver::PermissionError;

/// Ids of the seeded roles.
pub mod role_ids {
    pub const ADMIN: &str = "admin";
    pub const MANAGER: &str = "manager";
    pub const MEMBER: &str = "member";
    pub const VIEWER: &str = "viewer";
}

/// Catalog entries managers do not get.
const MANAGER_EXCLUDED: [CatalogPermission; 3] = [
    CatalogPermission::BillingManage,
    CatalogPermission::TeamRemove,
    CatalogPermission::SettingsUpdate,
];

const MEMBER_PERMISSIONS: [CatalogPermission; 8] = [
    CatalogPermission::DashboardView,
    CatalogPermission::AutomationView,
    CatalogPermission::AutomationCreate,
    CatalogPermission::AutomationExecute,
    CatalogPermission::ProjectView,
    CatalogPermission::ProjectCreate,
    CatalogPermission::AnalyticsView,
    CatalogPermission::SettingsView,
];

const VIEWER_PERMISSIONS: [CatalogPermission; 4] = [
    CatalogPermission::DashboardView,
    CatalogPermission::AutomationView,
    CatalogPermission::ProjectView,
    CatalogPermission::AnalyticsView,
];

/// Immutable, level-ordered role lookup.
#[derive(Debug, Clone)]
pub struct RoleRegistry {
    roles: Vec<Arc<Role>>,
}

impl Default for RoleRegistry {
    fn default() -> Self {
        Self::seeded()
    }
}

impl RoleRegistry {
    /// Administrator, Manager, Team Member and Viewer.
    #[must_use]
    pub fn seeded() -> Self {
        let manager: Vec<CatalogPermission> = CatalogPermission::all()
            .iter()
            .copied()
            .filter(|p| !MANAGER_EXCLUDED.contains(p))
            .collect();

        Self::from_roles(vec![
            Role::new(
                role_ids::ADMIN,
                "Administrator",
                1,
                vec![Permission::full_access()],
            ),
            Role::new(role_ids::MANAGER, "Manager", 2, permissions_of(&manager)),
            Role::new(
                role_ids::MEMBER,
                "Team Member",
                3,
                permissions_of(&MEMBER_PERMISSIONS),
            ),
            Role::new(
                role_ids::VIEWER,
                "Viewer",
                4,
                permissions_of(&VIEWER_PERMISSIONS),
            ),
        ])
    }

    /// Build a registry from an explicit role set.
    #[must_use]
    pub fn from_roles(roles: Vec<Role>) -> Self {
        let mut roles: Vec<Arc<Role>> = roles.into_iter().map(Arc::new).collect();
        roles.sort_by_key(|r| r.level);
        Self { roles }
    }

    /// Look up a role; an unknown id is simply absent.
    #[must_use]
    pub fn get_role(&self, id: &str) -> Option<Arc<Role>> {
        self.roles.iter().find(|r| r.id == id).cloned()
    }

    /// Look up a role where the caller cannot proceed without it.
    pub fn require_role(&self, id: &str) -> Result<Arc<Role>, PermissionError> {
        self.get_role(id)
            .ok_or_else(|| PermissionError::UnknownRole(id.to_string()))
    }

    /// All roles, most privileged first.
    #[must_use]
    pub fn roles(&self) -> &[Arc<Role>] {
        &self.roles
    }

    /// Roles a holder of `level` may hand out (same level or less privileged).
    #[must_use]
    pub fn grantable_by(&self, level: u8) -> Vec<Arc<Role>> {
        self.roles
            .iter()
            .filter(|r| r.level >= level)
            .cloned()
            .collect()
    }
}
