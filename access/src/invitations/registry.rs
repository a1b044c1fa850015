//! Pending-invitation lifecycle.
//!
//! ```text
//! pending --accept--> accepted
//! pending --cancel--> cancelled
//! pending ==time===> expired   (derived on read, or stored by reconcile)
//! ```
//!
//! Every transition checks and writes the stored record under its map entry
//! lock, so two racing transitions on one invitation cannot both succeed.
//! Activity is logged after the lock is released.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use fd_common::{Action, InvitationStatus, Severity, TeamInvitation, User, UserStatus};
use uuid::Uuid;
use validator::ValidateEmail;

use super::error::InvitationError;
use crate::audit::{ActivityLogger, ActivityRecord};
use crate::permissions::{can_grant_role, require_permission, resources, RoleRegistry};
use crate::team::{normalize_email, NewMember, TeamDirectory};

/// Days an invitation stays acceptable after it is sent or resent.
pub const INVITATION_TTL_DAYS: i64 = 7;

fn expiry_from(now: DateTime<Utc>) -> DateTime<Utc> {
    now + Duration::days(INVITATION_TTL_DAYS)
}

#[derive(Debug)]
pub struct InvitationRegistry {
    invitations: DashMap<Uuid, TeamInvitation>,
    /// Lowercased email to its most recent invitation.
    by_email: DashMap<String, Uuid>,
    roles: Arc<RoleRegistry>,
    directory: Arc<TeamDirectory>,
    logger: ActivityLogger,
}

impl InvitationRegistry {
    #[must_use]
    pub fn new(
        roles: Arc<RoleRegistry>,
        directory: Arc<TeamDirectory>,
        logger: ActivityLogger,
    ) -> Self {
        Self {
            invitations: DashMap::new(),
            by_email: DashMap::new(),
            roles,
            directory,
            logger,
        }
    }

    /// Invite `email` to join with `role_id`.
    ///
    /// The inviter must be active with `team:create` and may only grant a
    /// role at their own level or below.
    #[tracing::instrument(skip(self, inviter, message), fields(inviter_id = %inviter.id))]
    pub async fn invite(
        &self,
        inviter: &User,
        email: &str,
        role_id: &str,
        message: Option<String>,
    ) -> Result<TeamInvitation, InvitationError> {
        require_permission(inviter, resources::TEAM, Action::Create)?;

        let email = email.trim().to_string();
        if !email.validate_email() {
            return Err(InvitationError::InvalidEmail(email));
        }

        let role = self.roles.require_role(role_id)?;
        can_grant_role(&inviter.role, &role)?;

        if self.directory.contains_email(&email) {
            return Err(InvitationError::AlreadyMember(email));
        }

        let now = Utc::now();
        let invitation = TeamInvitation {
            id: Uuid::now_v7(),
            email: email.clone(),
            role_id: role.id.clone(),
            invited_by: inviter.id,
            invited_at: now,
            expires_at: expiry_from(now),
            status: InvitationStatus::Pending,
            message,
        };

        // Store the record before the email slot guard is released
        match self.by_email.entry(normalize_email(&email)) {
            Entry::Occupied(mut slot) => {
                let still_pending = self
                    .invitations
                    .get(slot.get())
                    .is_some_and(|i| i.effective_status(now) == InvitationStatus::Pending);
                if still_pending {
                    return Err(InvitationError::AlreadyInvited(email));
                }
                self.invitations.insert(invitation.id, invitation.clone());
                slot.insert(invitation.id);
            }
            Entry::Vacant(slot) => {
                self.invitations.insert(invitation.id, invitation.clone());
                slot.insert(invitation.id);
            }
        }

        tracing::info!(invitation_id = %invitation.id, role = %role.id, "Created invitation");

        self.logger
            .log_activity(
                inviter,
                ActivityRecord::new(
                    "Invited team member",
                    resources::TEAM,
                    format!("Invited {} as {}", email, role.name),
                )
                .with_resource_id(invitation.id.to_string())
                .with_severity(Severity::Medium),
            )
            .await;

        Ok(invitation)
    }

    /// Send a pending invitation again, restarting its expiry window.
    #[tracing::instrument(skip(self, actor), fields(actor_id = %actor.id))]
    pub async fn resend(
        &self,
        actor: &User,
        invitation_id: Uuid,
    ) -> Result<TeamInvitation, InvitationError> {
        require_permission(actor, resources::TEAM, Action::Create)?;

        let refreshed = {
            let mut invitation = self
                .invitations
                .get_mut(&invitation_id)
                .ok_or(InvitationError::NotFound(invitation_id))?;

            let now = Utc::now();
            match invitation.effective_status(now) {
                InvitationStatus::Pending => {}
                InvitationStatus::Expired => return Err(InvitationError::Expired),
                status => return Err(InvitationError::AlreadyResolved(status)),
            }

            invitation.invited_at = now;
            invitation.expires_at = expiry_from(now);
            invitation.clone()
        };

        self.logger
            .log_activity(
                actor,
                ActivityRecord::new(
                    "Resent invitation",
                    resources::TEAM,
                    format!("Resent invitation to {}", refreshed.email),
                )
                .with_resource_id(invitation_id.to_string())
                .with_severity(Severity::Low),
            )
            .await;

        Ok(refreshed)
    }

    /// Cancel a pending invitation.
    ///
    /// Cancelling an invitation that is already terminal, including one that
    /// has lapsed, changes nothing and logs nothing. The returned record
    /// carries its effective status.
    #[tracing::instrument(skip(self, actor), fields(actor_id = %actor.id))]
    pub async fn cancel(
        &self,
        actor: &User,
        invitation_id: Uuid,
    ) -> Result<TeamInvitation, InvitationError> {
        require_permission(actor, resources::TEAM, Action::Create)?;

        let cancelled = {
            let mut invitation = self
                .invitations
                .get_mut(&invitation_id)
                .ok_or(InvitationError::NotFound(invitation_id))?;

            let status = invitation.effective_status(Utc::now());
            if status.is_terminal() {
                return Ok(TeamInvitation {
                    status,
                    ..invitation.clone()
                });
            }
            invitation.status = InvitationStatus::Cancelled;
            invitation.clone()
        };

        self.logger
            .log_activity(
                actor,
                ActivityRecord::new(
                    "Cancelled invitation",
                    resources::TEAM,
                    format!("Cancelled invitation to {}", cancelled.email),
                )
                .with_resource_id(invitation_id.to_string())
                .with_severity(Severity::Medium),
            )
            .await;

        Ok(cancelled)
    }

    /// Accept an invitation, creating an active member.
    ///
    /// The role is looked up now, not when the invitation was sent.
    #[tracing::instrument(skip(self, first_name, last_name))]
    pub async fn accept(
        &self,
        invitation_id: Uuid,
        first_name: &str,
        last_name: &str,
    ) -> Result<User, InvitationError> {
        let (invitation, user) = {
            let mut invitation = self
                .invitations
                .get_mut(&invitation_id)
                .ok_or(InvitationError::NotFound(invitation_id))?;

            match invitation.effective_status(Utc::now()) {
                InvitationStatus::Pending => {}
                InvitationStatus::Expired => return Err(InvitationError::Expired),
                status => return Err(InvitationError::AlreadyResolved(status)),
            }

            let role = self.roles.require_role(&invitation.role_id)?;
            let user = self.directory.add_member(NewMember {
                email: invitation.email.clone(),
                first_name: first_name.to_string(),
                last_name: last_name.to_string(),
                role,
                status: UserStatus::Active,
                invited_by: Some(invitation.invited_by),
            })?;

            invitation.status = InvitationStatus::Accepted;
            (invitation.clone(), user)
        };

        tracing::info!(user_id = %user.id, "Invitation accepted");

        self.logger
            .log_activity(
                &user,
                ActivityRecord::new(
                    "Accepted invitation",
                    resources::TEAM,
                    format!("{} joined as {}", user.full_name(), user.role.name),
                )
                .with_resource_id(invitation.id.to_string())
                .with_severity(Severity::Medium),
            )
            .await;

        Ok(user)
    }

    #[must_use]
    pub fn get(&self, invitation_id: Uuid) -> Option<TeamInvitation> {
        self.invitations.get(&invitation_id).map(|i| i.value().clone())
    }

    /// Status as seen now; `None` for an unknown id.
    #[must_use]
    pub fn effective_status(&self, invitation_id: Uuid) -> Option<InvitationStatus> {
        self.effective_status_at(invitation_id, Utc::now())
    }

    #[must_use]
    pub fn effective_status_at(
        &self,
        invitation_id: Uuid,
        now: DateTime<Utc>,
    ) -> Option<InvitationStatus> {
        self.invitations
            .get(&invitation_id)
            .map(|i| i.effective_status(now))
    }

    /// Every invitation, newest first.
    #[must_use]
    pub fn list(&self) -> Vec<TeamInvitation> {
        let mut all: Vec<TeamInvitation> =
            self.invitations.iter().map(|i| i.value().clone()).collect();
        all.sort_by(|a, b| b.invited_at.cmp(&a.invited_at).then(b.id.cmp(&a.id)));
        all
    }

    /// Invitations that can still be accepted, newest first.
    #[must_use]
    pub fn pending(&self) -> Vec<TeamInvitation> {
        let now = Utc::now();
        self.list()
            .into_iter()
            .filter(|i| i.effective_status(now) == InvitationStatus::Pending)
            .collect()
    }

    /// Import an existing record as is. Replaces any record with the same id.
    pub fn restore(&self, invitation: TeamInvitation) {
        let key = normalize_email(&invitation.email);
        let newer = self
            .by_email
            .get(&key)
            .and_then(|id| self.invitations.get(id.value()).map(|i| i.invited_at))
            .is_none_or(|current| invitation.invited_at >= current);
        if newer {
            self.by_email.insert(key, invitation.id);
        }
        self.invitations.insert(invitation.id, invitation);
    }

    /// Store `expired` on every pending record past its expiry at `now`.
    ///
    /// Returns the number of records changed.
    pub fn reconcile_expired(&self, now: DateTime<Utc>) -> usize {
        let mut expired = 0;
        for mut invitation in self.invitations.iter_mut() {
            if invitation.effective_status(now) == InvitationStatus::Expired
                && invitation.status == InvitationStatus::Pending
            {
                invitation.status = InvitationStatus::Expired;
                expired += 1;
                tracing::debug!(invitation_id = %invitation.id, "Invitation expired");
            }
        }
        expired
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.invitations.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.invitations.is_empty()
    }
}
