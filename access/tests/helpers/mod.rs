//! Shared fixtures for access integration tests.
//!
//! [`TestOrg`] wires a full [`AccessState`] and adds active members by role.
#![allow(dead_code)]

use fd_access::audit::AuditFilter;
use fd_access::config::Config;
use fd_access::team::NewMember;
use fd_access::AccessState;
use fd_common::{ActivityLogEntry, User, UserStatus};

pub struct TestOrg {
    pub state: AccessState,
}

impl TestOrg {
    pub fn new() -> Self {
        Self::with_config(Config::default_for_test())
    }

    pub fn with_config(config: Config) -> Self {
        Self {
            state: AccessState::new(config),
        }
    }

    /// Add a member with the given role id and status.
    pub fn member_with(&self, email: &str, role_id: &str, status: UserStatus) -> User {
        let (first, last) = email
            .split('@')
            .next()
            .and_then(|local| local.split_once('.'))
            .unwrap_or(("Test", "User"));
        self.state
            .directory
            .add_member(NewMember {
                email: email.to_string(),
                first_name: first.to_string(),
                last_name: last.to_string(),
                role: self.state.roles.get_role(role_id).expect("seeded role"),
                status,
                invited_by: None,
            })
            .expect("add member")
    }

    /// Add an active member with the given role id.
    pub fn member(&self, email: &str, role_id: &str) -> User {
        self.member_with(email, role_id, UserStatus::Active)
    }

    /// Every audit entry, most recent first.
    pub async fn audit_entries(&self) -> Vec<ActivityLogEntry> {
        self.state.audit.query(&AuditFilter::default()).await
    }
}
