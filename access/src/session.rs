//! Signed-in user context.
//!
//! A [`Session`] is passed explicitly to whatever needs the current user.
//! Credential verification happens before this point and is not handled here.

use chrono::Utc;
use fd_common::{Action, ActivityLogEntry, Severity, User, UserStatus};
use serde_json::json;

use crate::audit::{ActivityLogger, ActivityRecord, AuditError, AuditFilter, ClientInfo, ExportFormat};
use crate::permissions::{has_permission, require_permission, resources, PermissionError};
use crate::team::TeamDirectory;

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("No member with email {0}")]
    UnknownUser(String),

    #[error("Account is {0}")]
    Inactive(UserStatus),

    #[error(transparent)]
    PermissionDenied(#[from] PermissionError),

    #[error(transparent)]
    Audit(#[from] AuditError),
}

impl SessionError {
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::UnknownUser(_) => "not_found",
            Self::Inactive(_) => "account_inactive",
            Self::PermissionDenied(e) => e.code(),
            Self::Audit(e) => e.code(),
        }
    }
}

/// Rendered audit export, ready to hand to a download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditExport {
    pub file_name: String,
    pub content_type: &'static str,
    pub body: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct Session {
    user: User,
    client: ClientInfo,
    logger: ActivityLogger,
}

impl Session {
    /// Wrap an already-authenticated user.
    #[must_use]
    pub const fn new(user: User, client: ClientInfo, logger: ActivityLogger) -> Self {
        Self {
            user,
            client,
            logger,
        }
    }

    /// Sign in the member registered under `email`.
    #[tracing::instrument(skip(directory, logger, client))]
    pub async fn sign_in(
        directory: &TeamDirectory,
        logger: ActivityLogger,
        email: &str,
        client: ClientInfo,
    ) -> Result<Self, SessionError> {
        let user = directory
            .find_by_email(email)
            .ok_or_else(|| SessionError::UnknownUser(email.to_string()))?;
        if !user.is_active() {
            tracing::warn!(user_id = %user.id, status = %user.status, "Sign-in refused");
            return Err(SessionError::Inactive(user.status));
        }

        let user = directory
            .record_login(user.id, Utc::now())
            .map_err(|_| SessionError::UnknownUser(email.to_string()))?;

        let session = Self::new(user, client, logger);
        session
            .log_activity(
                ActivityRecord::new("login", resources::AUTHENTICATION, "Signed in")
                    .with_severity(Severity::Medium)
                    .with_metadata(json!({ "email": session.user.email })),
            )
            .await;

        tracing::info!(user_id = %session.user.id, "Signed in");
        Ok(session)
    }

    #[must_use]
    pub const fn user(&self) -> &User {
        &self.user
    }

    #[must_use]
    pub const fn client(&self) -> &ClientInfo {
        &self.client
    }

    #[must_use]
    pub fn has_permission(&self, resource: &str, action: impl AsRef<str>) -> bool {
        has_permission(Some(&self.user), resource, action)
    }

    pub fn require(&self, resource: &str, action: impl AsRef<str>) -> Result<(), SessionError> {
        Ok(require_permission(&self.user, resource, action)?)
    }

    /// Record an activity as this user, from this client.
    pub async fn log_activity(&self, record: ActivityRecord) -> Option<ActivityLogEntry> {
        self.logger
            .log_with_client(&self.user, &self.client, record)
            .await
    }

    /// Audit entries matching `filter`, most recent first.
    pub async fn query_audit_log(
        &self,
        filter: &AuditFilter,
    ) -> Result<Vec<ActivityLogEntry>, SessionError> {
        self.require(resources::AUDIT, Action::Read)?;
        Ok(self.logger.store().query(filter).await)
    }

    /// Render the entries matching `filter` for download.
    pub async fn export_audit_log(
        &self,
        filter: &AuditFilter,
        format: ExportFormat,
    ) -> Result<AuditExport, SessionError> {
        self.require(resources::AUDIT, Action::Export)?;
        let entries = self.logger.store().query(filter).await;
        let body = format.render(&entries)?;

        tracing::debug!(count = entries.len(), format = format.extension(), "Exported audit log");

        Ok(AuditExport {
            file_name: format.file_name(Utc::now().date_naive()),
            content_type: format.content_type(),
            body,
        })
    }

    /// End the session.
    pub async fn sign_out(self) {
        self.log_activity(
            ActivityRecord::new("logout", resources::AUTHENTICATION, "Signed out")
                .with_severity(Severity::Low)
                .with_metadata(json!({ "email": self.user.email })),
        )
        .await;
        tracing::info!(user_id = %self.user.id, "Signed out");
    }
}
