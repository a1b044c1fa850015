//! Permission catalog for the automation dashboard.
//!
//! Static enumeration of every exact `(resource, action)` atom the dashboard
//! gates on. Roles are seeded from this list.

use fd_common::{Action, Permission};

/// Resource tags used across the dashboard and the audit log.
pub mod resources {
    pub const DASHBOARD: &str = "dashboard";
    pub const AUTOMATION: &str = "automation";
    pub const PROJECT: &str = "project";
    pub const ANALYTICS: &str = "analytics";
    pub const BILLING: &str = "billing";
    pub const TEAM: &str = "team";
    pub const SETTINGS: &str = "settings";
    pub const AUDIT: &str = "audit";
    /// Audit-only resource for sign-in and sign-out entries.
    pub const AUTHENTICATION: &str = "authentication";
}

/// Catalog entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CatalogPermission {
    DashboardView,
    AutomationView,
    AutomationCreate,
    AutomationExecute,
    AutomationDelete,
    ProjectView,
    ProjectCreate,
    ProjectUpdate,
    ProjectDelete,
    AnalyticsView,
    AnalyticsExport,
    BillingView,
    BillingManage,
    TeamView,
    TeamInvite,
    TeamManage,
    TeamRemove,
    SettingsView,
    SettingsUpdate,
    AuditView,
    AuditExport,
}

impl CatalogPermission {
    /// Stable identifier, e.g. `team_invite`.
    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::DashboardView => "dashboard_view",
            Self::AutomationView => "automation_view",
            Self::AutomationCreate => "automation_create",
            Self::AutomationExecute => "automation_execute",
            Self::AutomationDelete => "automation_delete",
            Self::ProjectView => "project_view",
            Self::ProjectCreate => "project_create",
            Self::ProjectUpdate => "project_update",
            Self::ProjectDelete => "project_delete",
            Self::AnalyticsView => "analytics_view",
            Self::AnalyticsExport => "analytics_export",
            Self::BillingView => "billing_view",
            Self::BillingManage => "billing_manage",
            Self::TeamView => "team_view",
            Self::TeamInvite => "team_invite",
            Self::TeamManage => "team_manage",
            Self::TeamRemove => "team_remove",
            Self::SettingsView => "settings_view",
            Self::SettingsUpdate => "settings_update",
            Self::AuditView => "audit_view",
            Self::AuditExport => "audit_export",
        }
    }

    /// Human-readable label.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::DashboardView => "View Dashboard",
            Self::AutomationView => "View Automations",
            Self::AutomationCreate => "Request Automations",
            Self::AutomationExecute => "Execute Automations",
            Self::AutomationDelete => "Delete Automations",
            Self::ProjectView => "View Projects",
            Self::ProjectCreate => "Create Projects",
            Self::ProjectUpdate => "Update Projects",
            Self::ProjectDelete => "Delete Projects",
            Self::AnalyticsView => "View Analytics",
            Self::AnalyticsExport => "Export Analytics",
            Self::BillingView => "View Billing",
            Self::BillingManage => "Manage Billing",
            Self::TeamView => "View Team",
            Self::TeamInvite => "Invite Members",
            Self::TeamManage => "Manage Members",
            Self::TeamRemove => "Remove Members",
            Self::SettingsView => "View Settings",
            Self::SettingsUpdate => "Update Settings",
            Self::AuditView => "View Audit Logs",
            Self::AuditExport => "Export Audit Logs",
        }
    }

    #[must_use]
    pub const fn resource(self) -> &'static str {
        use resources::{
            ANALYTICS, AUDIT, AUTOMATION, BILLING, DASHBOARD, PROJECT, SETTINGS, TEAM,
        };
        match self {
            Self::DashboardView => DASHBOARD,
            Self::AutomationView
            | Self::AutomationCreate
            | Self::AutomationExecute
            | Self::AutomationDelete => AUTOMATION,
            Self::ProjectView | Self::ProjectCreate | Self::ProjectUpdate | Self::ProjectDelete => {
                PROJECT
            }
            Self::AnalyticsView | Self::AnalyticsExport => ANALYTICS,
            Self::BillingView | Self::BillingManage => BILLING,
            Self::TeamView | Self::TeamInvite | Self::TeamManage | Self::TeamRemove => TEAM,
            Self::SettingsView | Self::SettingsUpdate => SETTINGS,
            Self::AuditView | Self::AuditExport => AUDIT,
        }
    }

    #[must_use]
    pub const fn action(self) -> Action {
        match self {
            Self::DashboardView
            | Self::AutomationView
            | Self::ProjectView
            | Self::AnalyticsView
            | Self::BillingView
            | Self::TeamView
            | Self::SettingsView
            | Self::AuditView => Action::Read,
            Self::AutomationCreate | Self::ProjectCreate | Self::TeamInvite => Action::Create,
            Self::ProjectUpdate
            | Self::BillingManage
            | Self::TeamManage
            | Self::SettingsUpdate => Action::Update,
            Self::AutomationDelete | Self::ProjectDelete | Self::TeamRemove => Action::Delete,
            Self::AutomationExecute => Action::Execute,
            Self::AnalyticsExport | Self::AuditExport => Action::Export,
        }
    }

    /// Returns all catalog entries in display order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::DashboardView,
            Self::AutomationView,
            Self::AutomationCreate,
            Self::AutomationExecute,
            Self::AutomationDelete,
            Self::ProjectView,
            Self::ProjectCreate,
            Self::ProjectUpdate,
            Self::ProjectDelete,
            Self::AnalyticsView,
            Self::AnalyticsExport,
            Self::BillingView,
            Self::BillingManage,
            Self::TeamView,
            Self::TeamInvite,
            Self::TeamManage,
            Self::TeamRemove,
            Self::SettingsView,
            Self::SettingsUpdate,
            Self::AuditView,
            Self::AuditExport,
        ]
    }

    /// Build the permission value object.
    #[must_use]
    pub fn permission(self) -> Permission {
        Permission::new(self.id(), self.name(), self.resource(), self.action())
    }
}

/// Materialize a list of catalog entries.
pub fn permissions_of(entries: &[CatalogPermission]) -> Vec<Permission> {
    entries.iter().map(|e| e.permission()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_ids_are_unique_snake_case() {
        let mut seen = HashSet::new();
        for entry in CatalogPermission::all() {
            let id = entry.id();
            assert!(
                id.chars().all(|c| c.is_ascii_lowercase() || c == '_'),
                "Id '{id}' should be snake_case"
            );
            assert!(seen.insert(id), "Duplicate id: {id}");
        }
        assert_eq!(seen.len(), 21);
    }

    #[test]
    fn test_pairs_are_unique() {
        let pairs: HashSet<_> = CatalogPermission::all()
            .iter()
            .map(|e| (e.resource(), e.action()))
            .collect();
        assert_eq!(pairs.len(), CatalogPermission::all().len());
    }

    #[test]
    fn test_team_invite_is_team_create() {
        let perm = CatalogPermission::TeamInvite.permission();
        assert!(perm.matches("team", "create"));
        assert_eq!(perm.name, "Invite Members");
    }

    #[test]
    fn test_names_are_not_empty() {
        for entry in CatalogPermission::all() {
            assert!(!entry.name().is_empty(), "{entry:?} has no name");
        }
    }
}
