//! Best-effort activity logging for business actions.
//!
//! Callers record an activity after their action has succeeded. A failure to
//! persist the entry is reported through `tracing` and never returned, so the
//! action that triggered it is not affected.

use std::sync::Arc;

use fd_common::{ActivityLogEntry, Actor, NewActivity, Severity, User};
use serde_json::Value;
use tokio::task::JoinHandle;

use super::store::AuditLogStore;

/// Request metadata stamped onto log entries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientInfo {
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

impl ClientInfo {
    #[must_use]
    pub fn new(ip_address: impl Into<String>, user_agent: impl Into<String>) -> Self {
        Self {
            ip_address: Some(ip_address.into()),
            user_agent: Some(user_agent.into()),
        }
    }
}

/// What happened, without who did it.
#[derive(Debug, Clone, PartialEq)]
pub struct ActivityRecord {
    pub action: String,
    pub resource: String,
    pub details: String,
    pub resource_id: Option<String>,
    pub severity: Severity,
    pub metadata: Option<Value>,
}

impl ActivityRecord {
    /// New record with `low` severity.
    pub fn new(
        action: impl Into<String>,
        resource: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            action: action.into(),
            resource: resource.into(),
            details: details.into(),
            resource_id: None,
            severity: Severity::Low,
            metadata: None,
        }
    }

    #[must_use]
    pub fn with_resource_id(mut self, id: impl Into<String>) -> Self {
        self.resource_id = Some(id.into());
        self
    }

    #[must_use]
    pub const fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    #[must_use]
    pub fn with_metadata(mut self, metadata: Value) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// Attach the actor snapshot and client metadata.
    #[must_use]
    pub fn into_activity(self, actor: &User, client: &ClientInfo) -> NewActivity {
        NewActivity {
            actor: Actor::from(actor),
            action: self.action,
            resource: self.resource,
            resource_id: self.resource_id,
            details: self.details,
            metadata: self.metadata,
            severity: self.severity,
            ip_address: client.ip_address.clone(),
            user_agent: client.user_agent.clone(),
        }
    }
}

/// Cheap-to-clone handle for recording activity into an [`AuditLogStore`].
#[derive(Debug, Clone)]
pub struct ActivityLogger {
    store: Arc<AuditLogStore>,
}

impl ActivityLogger {
    #[must_use]
    pub const fn new(store: Arc<AuditLogStore>) -> Self {
        Self { store }
    }

    #[must_use]
    pub const fn store(&self) -> &Arc<AuditLogStore> {
        &self.store
    }

    /// Record `record` as performed by `actor`, without client metadata.
    pub async fn log_activity(&self, actor: &User, record: ActivityRecord) {
        self.log_with_client(actor, &ClientInfo::default(), record)
            .await;
    }

    /// Record `record` as performed by `actor` from `client`.
    ///
    /// Returns the stored entry, or `None` when persistence failed.
    pub async fn log_with_client(
        &self,
        actor: &User,
        client: &ClientInfo,
        record: ActivityRecord,
    ) -> Option<ActivityLogEntry> {
        self.append(record.into_activity(actor, client)).await
    }

    /// Detached variant of [`log_with_client`](Self::log_with_client).
    ///
    /// The caller does not wait for the append. The handle may be dropped.
    pub fn spawn_log_activity(
        &self,
        actor: &User,
        client: &ClientInfo,
        record: ActivityRecord,
    ) -> JoinHandle<()> {
        let logger = self.clone();
        let activity = record.into_activity(actor, client);
        tokio::spawn(async move {
            logger.append(activity).await;
        })
    }

    async fn append(&self, activity: NewActivity) -> Option<ActivityLogEntry> {
        let action = activity.action.clone();
        let resource = activity.resource.clone();
        let user_id = activity.actor.user_id;

        match self.store.append(activity).await {
            Ok(entry) => Some(entry),
            Err(e) => {
                tracing::warn!(
                    user_id = %user_id,
                    action = %action,
                    resource = %resource,
                    error = %e,
                    code = e.code(),
                    "Failed to write activity log entry"
                );
                None
            }
        }
    }
}
