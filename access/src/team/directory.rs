//! Organization member directory.
//!
//! Members are keyed by id in a `DashMap`, with a second map indexing them by
//! lowercased email. The email index is always written before the member map
//! and guards are never held across an `.await`.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use fd_common::{Action, Role, Severity, User, UserStatus};
use serde::Serialize;
use uuid::Uuid;
use validator::ValidateEmail;

use super::error::DirectoryError;
use crate::audit::{ActivityLogger, ActivityRecord};
use crate::permissions::{
    can_grant_role, can_manage_member, require_permission, resources, RoleRegistry,
};

/// Input for creating a member.
#[derive(Debug, Clone)]
pub struct NewMember {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: Arc<Role>,
    pub status: UserStatus,
    pub invited_by: Option<Uuid>,
}

/// Headline team counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamSummary {
    pub total: usize,
    pub active: usize,
    /// Members holding a level 1 role.
    pub admins: usize,
}

pub(crate) fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Members of one organization.
#[derive(Debug)]
pub struct TeamDirectory {
    members: DashMap<Uuid, User>,
    emails: DashMap<String, Uuid>,
    roles: Arc<RoleRegistry>,
    logger: ActivityLogger,
}

impl TeamDirectory {
    #[must_use]
    pub fn new(roles: Arc<RoleRegistry>, logger: ActivityLogger) -> Self {
        Self {
            members: DashMap::new(),
            emails: DashMap::new(),
            roles,
            logger,
        }
    }

    #[must_use]
    pub const fn roles(&self) -> &Arc<RoleRegistry> {
        &self.roles
    }

    /// Add a member. The email must be valid and not already taken.
    pub fn add_member(&self, new: NewMember) -> Result<User, DirectoryError> {
        let email = new.email.trim().to_string();
        if !email.validate_email() {
            return Err(DirectoryError::InvalidEmail(email));
        }

        let id = Uuid::now_v7();
        match self.emails.entry(normalize_email(&email)) {
            Entry::Occupied(_) => return Err(DirectoryError::EmailTaken(email)),
            Entry::Vacant(slot) => {
                slot.insert(id);
            }
        }

        let user = User {
            id,
            email,
            first_name: new.first_name,
            last_name: new.last_name,
            role: new.role,
            status: new.status,
            invited_by: new.invited_by,
            created_at: Utc::now(),
            last_login_at: None,
        };
        self.members.insert(id, user.clone());

        tracing::info!(user_id = %id, role = %user.role.id, "Added team member");
        Ok(user)
    }

    #[must_use]
    pub fn get(&self, id: Uuid) -> Option<User> {
        self.members.get(&id).map(|m| m.value().clone())
    }

    /// Case-insensitive lookup.
    #[must_use]
    pub fn find_by_email(&self, email: &str) -> Option<User> {
        let id = *self.emails.get(&normalize_email(email))?;
        self.get(id)
    }

    #[must_use]
    pub fn contains_email(&self, email: &str) -> bool {
        self.emails.contains_key(&normalize_email(email))
    }

    /// All members, oldest first.
    #[must_use]
    pub fn members(&self) -> Vec<User> {
        let mut members: Vec<User> = self.members.iter().map(|m| m.value().clone()).collect();
        members.sort_by_key(|m| (m.created_at, m.id));
        members
    }

    /// Members matching an optional status and role.
    #[must_use]
    pub fn filter(&self, status: Option<UserStatus>, role_id: Option<&str>) -> Vec<User> {
        self.members()
            .into_iter()
            .filter(|m| status.is_none_or(|s| m.status == s))
            .filter(|m| role_id.is_none_or(|r| m.role.id == r))
            .collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    #[must_use]
    pub fn summary(&self) -> TeamSummary {
        self.members
            .iter()
            .fold(TeamSummary::default(), |mut summary, m| {
                summary.total += 1;
                if m.is_active() {
                    summary.active += 1;
                }
                if m.role.level == 1 {
                    summary.admins += 1;
                }
                summary
            })
    }

    /// Stamp a successful sign-in.
    pub fn record_login(&self, id: Uuid, at: DateTime<Utc>) -> Result<User, DirectoryError> {
        let mut member = self.members.get_mut(&id).ok_or(DirectoryError::NotFound(id))?;
        member.last_login_at = Some(at);
        Ok(member.clone())
    }

    /// Replace a member's role.
    ///
    /// The actor needs `team:update` and cannot act on a member who outranks
    /// them. The new role may not be more privileged than the actor's own.
    #[tracing::instrument(skip(self, actor), fields(actor_id = %actor.id))]
    pub async fn update_member_role(
        &self,
        actor: &User,
        member_id: Uuid,
        role_id: &str,
    ) -> Result<User, DirectoryError> {
        require_permission(actor, resources::TEAM, Action::Update)?;
        let target = self.get(member_id).ok_or(DirectoryError::NotFound(member_id))?;
        can_manage_member(actor, &target)?;
        let role = self.roles.require_role(role_id)?;
        can_grant_role(&actor.role, &role)?;

        let previous = Arc::clone(&target.role);
        let updated = {
            let mut member = self
                .members
                .get_mut(&member_id)
                .ok_or(DirectoryError::NotFound(member_id))?;
            member.role = Arc::clone(&role);
            member.clone()
        };

        self.logger
            .log_activity(
                actor,
                ActivityRecord::new(
                    "Updated member role",
                    resources::TEAM,
                    format!("Changed {}'s role to {}", updated.full_name(), role.name),
                )
                .with_resource_id(member_id.to_string())
                .with_severity(Severity::High)
                .with_metadata(serde_json::json!({
                    "from": previous.id,
                    "to": role.id,
                })),
            )
            .await;

        Ok(updated)
    }

    /// Activate, deactivate or suspend a member.
    #[tracing::instrument(skip(self, actor), fields(actor_id = %actor.id))]
    pub async fn set_member_status(
        &self,
        actor: &User,
        member_id: Uuid,
        status: UserStatus,
    ) -> Result<User, DirectoryError> {
        require_permission(actor, resources::TEAM, Action::Update)?;
        let target = self.get(member_id).ok_or(DirectoryError::NotFound(member_id))?;
        can_manage_member(actor, &target)?;

        let updated = {
            let mut member = self
                .members
                .get_mut(&member_id)
                .ok_or(DirectoryError::NotFound(member_id))?;
            member.status = status;
            member.clone()
        };

        self.logger
            .log_activity(
                actor,
                ActivityRecord::new(
                    "Updated member status",
                    resources::TEAM,
                    format!("Set {} to {}", updated.full_name(), status),
                )
                .with_resource_id(member_id.to_string())
                .with_severity(Severity::Medium)
                .with_metadata(serde_json::json!({
                    "from": target.status,
                    "to": status,
                })),
            )
            .await;

        Ok(updated)
    }

    /// Remove a member from the organization.
    #[tracing::instrument(skip(self, actor), fields(actor_id = %actor.id))]
    pub async fn remove_member(&self, actor: &User, member_id: Uuid) -> Result<User, DirectoryError> {
        require_permission(actor, resources::TEAM, Action::Delete)?;
        if actor.id == member_id {
            return Err(DirectoryError::CannotRemoveSelf);
        }
        let target = self.get(member_id).ok_or(DirectoryError::NotFound(member_id))?;
        can_manage_member(actor, &target)?;

        let (_, removed) = self
            .members
            .remove(&member_id)
            .ok_or(DirectoryError::NotFound(member_id))?;
        self.emails.remove(&normalize_email(&removed.email));

        self.logger
            .log_activity(
                actor,
                ActivityRecord::new(
                    "Removed team member",
                    resources::TEAM,
                    format!("Removed {} from team", removed.full_name()),
                )
                .with_resource_id(member_id.to_string())
                .with_severity(Severity::High),
            )
            .await;

        Ok(removed)
    }
}
