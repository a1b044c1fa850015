//! Audit Log Tests
//!
//! - Filtered queries over a populated store
//! - JSON export parses back to what was stored
//! - Retention cap evicts oldest first
//! - Unavailable log storage never fails the business action
//!
//! Run with: `cargo test --test audit_log_test`

mod helpers;

use std::sync::Arc;
use std::time::Duration;

use fd_access::audit::{
    export_csv, export_json, ActivityLogger, ActivityRecord, AuditFilter, AuditLogStore,
    ClientInfo, DateRange, ExportFormat,
};
use fd_access::config::Config;
use fd_access::permissions::role_ids;
use fd_common::{ActivityLogEntry, Severity};
use helpers::TestOrg;
use serde_json::json;
use tokio_test::assert_ok;

#[tokio::test]
async fn test_severity_filter_returns_only_critical() {
    let org = TestOrg::new();
    let admin = org.member("john.doe@acme.com", role_ids::ADMIN);

    for (action, severity) in [
        ("Viewed dashboard", Severity::Low),
        ("Deleted production workflow", Severity::Critical),
        ("Viewed analytics", Severity::Low),
    ] {
        org.state
            .logger
            .log_activity(
                &admin,
                ActivityRecord::new(action, "automation", action).with_severity(severity),
            )
            .await;
    }

    let hits = org
        .state
        .audit
        .query(&AuditFilter::default().with_severity(Severity::Critical))
        .await;
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].action, "Deleted production workflow");
}

#[tokio::test]
async fn test_filters_combine_as_conjunction() {
    let org = TestOrg::new();
    let jane = org.member("jane.smith@acme.com", role_ids::MANAGER);
    let mike = org.member("mike.wilson@acme.com", role_ids::MEMBER);

    for (user, action, resource, severity) in [
        (&jane, "Updated billing plan", "billing", Severity::High),
        (&jane, "Created project", "project", Severity::Medium),
        (&mike, "Executed workflow", "automation", Severity::Low),
    ] {
        org.state
            .logger
            .log_activity(
                user,
                ActivityRecord::new(action, resource, format!("{action} details"))
                    .with_severity(severity),
            )
            .await;
    }

    let filter = AuditFilter::default()
        .with_search("JANE")
        .with_resource("billing")
        .with_date_range(DateRange::Today);
    let hits = org.state.audit.query(&filter).await;
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].action, "Updated billing plan");

    let none = org
        .state
        .audit
        .query(&AuditFilter::default().with_search("nobody-matches-this"))
        .await;
    assert!(none.is_empty());

    let everything = org.state.audit.query(&AuditFilter::default()).await;
    let actions: Vec<&str> = everything.iter().map(|e| e.action.as_str()).collect();
    assert_eq!(
        actions,
        ["Executed workflow", "Created project", "Updated billing plan"]
    );
}

#[tokio::test]
async fn test_json_export_parses_back_to_stored_entries() {
    let org = TestOrg::new();
    let sarah = org.member("sarah.johnson@acme.com", role_ids::MANAGER);
    let client = ClientInfo::new("192.168.1.102", "Mozilla/5.0 (Macintosh)");

    org.state
        .logger
        .log_with_client(
            &sarah,
            &client,
            ActivityRecord::new(
                "Updated project",
                "project",
                "Updated \"Q1 Marketing Automation\" project timeline",
            )
            .with_resource_id("proj-001")
            .with_severity(Severity::Medium)
            .with_metadata(json!({"oldDeadline": "2024-03-01", "newDeadline": "2024-03-15"})),
        )
        .await;
    org.state
        .logger
        .log_activity(&sarah, ActivityRecord::new("Viewed dashboard", "dashboard", "Opened"))
        .await;

    let stored = org.audit_entries().await;
    let bytes = assert_ok!(export_json(&stored));
    let parsed: Vec<ActivityLogEntry> = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(parsed, stored);

    let raw: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    let with_extras = &raw[1];
    assert_eq!(with_extras["resourceId"], "proj-001");
    assert_eq!(with_extras["metadata"]["newDeadline"], "2024-03-15");
    assert_eq!(with_extras["ipAddress"], "192.168.1.102");
    let bare = raw[0].as_object().unwrap();
    assert!(!bare.contains_key("resourceId"));
    assert!(!bare.contains_key("metadata"));
    assert!(!bare.contains_key("ipAddress"));
    assert!(!bare.contains_key("userAgent"));
}

#[tokio::test]
async fn test_json_export_round_trips_null_metadata() {
    let org = TestOrg::new();
    let sarah = org.member("sarah.johnson@acme.com", role_ids::MANAGER);

    let stored = org
        .state
        .logger
        .log_with_client(
            &sarah,
            &ClientInfo::default(),
            ActivityRecord::new("Cleared filters", "dashboard", "Reset view")
                .with_metadata(serde_json::Value::Null),
        )
        .await
        .unwrap();
    assert!(stored.metadata.is_none());

    let entries = org.audit_entries().await;
    let bytes = assert_ok!(export_json(&entries));
    let parsed: Vec<ActivityLogEntry> = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(parsed, entries);
}

#[tokio::test]
async fn test_csv_export_layout() {
    let org = TestOrg::new();
    let mike = org.member("mike.wilson@acme.com", role_ids::MEMBER);
    org.state
        .logger
        .log_activity(
            &mike,
            ActivityRecord::new(
                "Executed workflow",
                "automation",
                "Manually executed Lead Qualification Bot",
            ),
        )
        .await;

    let entries = org.audit_entries().await;
    let csv = String::from_utf8(export_csv(&entries)).unwrap();
    let lines: Vec<&str> = csv.split('\n').collect();

    assert_eq!(
        lines[0],
        "Timestamp,User,Email,Action,Resource,Details,Severity,IP Address"
    );
    let cols: Vec<&str> = lines[1].split(',').collect();
    assert_eq!(cols.len(), 8);
    assert!(cols[0].ends_with('Z'));
    assert_eq!(
        &cols[1..],
        [
            "mike wilson",
            "mike.wilson@acme.com",
            "Executed workflow",
            "automation",
            "Manually executed Lead Qualification Bot",
            "low",
            "N/A",
        ]
    );
}

#[tokio::test]
async fn test_empty_exports_are_well_formed() {
    let csv = ExportFormat::Csv.render(&[]).unwrap();
    assert_eq!(
        String::from_utf8(csv).unwrap(),
        "Timestamp,User,Email,Action,Resource,Details,Severity,IP Address"
    );

    let json = ExportFormat::Json.render(&[]).unwrap();
    let parsed: Vec<ActivityLogEntry> = serde_json::from_slice(&json).unwrap();
    assert!(parsed.is_empty());
}

#[tokio::test]
async fn test_retention_cap_holds() {
    let org = TestOrg::with_config(Config {
        audit_retention: 5,
        ..Config::default_for_test()
    });
    let admin = org.member("john.doe@acme.com", role_ids::ADMIN);

    for i in 0..12 {
        org.state
            .logger
            .log_activity(
                &admin,
                ActivityRecord::new(format!("action {i}"), "settings", "changed"),
            )
            .await;
        assert!(org.state.audit.len().await <= 5);
    }

    let entries = org.audit_entries().await;
    let actions: Vec<&str> = entries.iter().map(|e| e.action.as_str()).collect();
    assert_eq!(
        actions,
        ["action 11", "action 10", "action 9", "action 8", "action 7"]
    );
    assert!(entries.windows(2).all(|w| w[0].timestamp >= w[1].timestamp));
}

#[tokio::test]
async fn test_closed_store_does_not_fail_team_actions() {
    let org = TestOrg::new();
    let admin = org.member("john.doe@acme.com", role_ids::ADMIN);
    let viewer = org.member("emily.davis@acme.com", role_ids::VIEWER);
    org.state.audit.close();

    let updated = assert_ok!(
        org.state
            .directory
            .update_member_role(&admin, viewer.id, role_ids::MEMBER)
            .await
    );
    assert_eq!(updated.role.id, role_ids::MEMBER);

    let invitation = assert_ok!(
        org.state
            .invitations
            .invite(&admin, "new.hire@acme.com", role_ids::VIEWER, None)
            .await
    );
    assert_ok!(org.state.invitations.cancel(&admin, invitation.id).await);

    assert!(org.state.audit.is_empty().await);
}

#[tokio::test]
async fn test_stats_over_live_store() {
    let store = Arc::new(AuditLogStore::new(100, Duration::from_millis(100)));
    let logger = ActivityLogger::new(Arc::clone(&store));
    let org = TestOrg::new();
    let a = org.member("john.doe@acme.com", role_ids::ADMIN);
    let b = org.member("jane.smith@acme.com", role_ids::MANAGER);

    for (user, severity) in [(&a, Severity::High), (&a, Severity::Low), (&b, Severity::Critical)] {
        logger
            .log_activity(user, ActivityRecord::new("x", "settings", "y").with_severity(severity))
            .await;
    }

    let stats = store.stats().await;
    assert_eq!(stats.total, 3);
    assert_eq!(stats.today, 3);
    assert_eq!(stats.high_priority, 2);
    assert_eq!(stats.active_users, 2);
}
