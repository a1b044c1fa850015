//! Authorization Tests
//!
//! - Seeded role decisions (admin wildcard, viewer read-only)
//! - Non-active accounts have no standing
//! - Role hierarchy for granting and managing
//!
//! Run with: `cargo test --test authorization_test`

mod helpers;

use fd_access::permissions::{
    can_grant_role, has_permission, require_permission, role_ids, CatalogPermission,
    PermissionError, RoleRegistry,
};
use fd_common::{Action, Permission, Role, Scope, UserStatus};
use helpers::TestOrg;
use tokio_test::{assert_err, assert_ok};

#[test]
fn test_admin_can_update_billing() {
    let org = TestOrg::new();
    let admin = org.member("john.doe@acme.com", role_ids::ADMIN);

    assert!(has_permission(Some(&admin), "billing", "update"));
}

#[test]
fn test_viewer_cannot_update_team() {
    let org = TestOrg::new();
    let viewer = org.member("emily.davis@acme.com", role_ids::VIEWER);

    assert!(!has_permission(Some(&viewer), "team", "update"));
    for resource in ["dashboard", "automation", "project", "analytics"] {
        assert!(has_permission(Some(&viewer), resource, Action::Read));
    }
}

#[test]
fn test_inactive_accounts_denied_for_every_role_and_pair() {
    let org = TestOrg::new();
    let statuses = [
        UserStatus::Inactive,
        UserStatus::Pending,
        UserStatus::Suspended,
    ];

    for (i, role) in org.state.roles.roles().iter().enumerate() {
        for (j, status) in statuses.iter().enumerate() {
            let user = org.member_with(&format!("u{i}.s{j}@acme.com"), &role.id, *status);
            for perm in CatalogPermission::all() {
                assert!(!has_permission(Some(&user), perm.resource(), perm.action()));
            }
            assert_eq!(
                assert_err!(require_permission(&user, "dashboard", "read")),
                PermissionError::InactiveUser(*status)
            );
        }
    }
}

#[test]
fn test_wildcard_permission_matches_everything() {
    let registry = RoleRegistry::from_roles(vec![
        Role::new(
            "any_action_on_reports",
            "Reports",
            2,
            vec![Permission {
                id: "reports_all".into(),
                name: "Reports".into(),
                resource: Scope::Exact("reports".into()),
                action: Scope::Wildcard,
            }],
        ),
        Role::new(
            "read_anything",
            "Reader",
            3,
            vec![Permission {
                id: "read_all".into(),
                name: "Read".into(),
                resource: Scope::Wildcard,
                action: Scope::Exact(Action::Read),
            }],
        ),
    ]);
    let reports = registry.get_role("any_action_on_reports").unwrap();
    let reader = registry.get_role("read_anything").unwrap();

    for action in ["create", "read", "delete", "approve"] {
        assert!(reports.allows("reports", action));
        assert!(!reports.allows("billing", action));
    }
    for resource in ["billing", "team", "reports", "*"] {
        assert!(reader.allows(resource, "read"));
        assert!(!reader.allows(resource, "delete"));
    }
}

#[test]
fn test_literal_star_resource_is_not_a_wildcard() {
    let role = Role::new(
        "star",
        "Star",
        3,
        vec![Permission::new("star_read", "Star", "*", Action::Read)],
    );

    assert!(role.allows("*", "read"));
    assert!(!role.allows("billing", "read"));
}

#[test]
fn test_every_catalog_entry_is_reachable_by_admin() {
    let org = TestOrg::new();
    let admin = org.member("john.doe@acme.com", role_ids::ADMIN);

    for perm in CatalogPermission::all() {
        assert_ok!(require_permission(&admin, perm.resource(), perm.action()));
    }
}

#[test]
fn test_unknown_pairs_are_plain_denials() {
    let org = TestOrg::new();
    let member = org.member("mike.wilson@acme.com", role_ids::MEMBER);

    assert!(!has_permission(Some(&member), "spaceship", "launch"));
    assert!(!has_permission(None, "dashboard", "read"));
}

#[test]
fn test_grant_hierarchy() {
    let roles = RoleRegistry::seeded();
    let member = roles.get_role(role_ids::MEMBER).unwrap();
    let manager = roles.get_role(role_ids::MANAGER).unwrap();

    assert_ok!(can_grant_role(&manager, &member));
    assert_err!(can_grant_role(&member, &manager));

    let picker: Vec<String> = roles
        .grantable_by(member.level)
        .iter()
        .map(|r| r.id.clone())
        .collect();
    assert_eq!(picker, [role_ids::MEMBER, role_ids::VIEWER]);
}
