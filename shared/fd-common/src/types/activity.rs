//! Activity Log Types
//!
//! Entries carry a denormalized snapshot of the actor taken at write time.
//! Renaming or removing a user later never changes what old entries say.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::user::User;
use crate::Error;

/// Audit severity, ordered from least to most severe.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    #[default]
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }

    /// `high` or `critical`.
    #[must_use]
    pub const fn is_high_priority(self) -> bool {
        matches!(self, Self::High | Self::Critical)
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            "critical" => Ok(Self::Critical),
            other => Err(Error::UnknownSeverity(other.to_string())),
        }
    }
}

/// Who performed an action, frozen at write time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub user_id: Uuid,
    pub user_name: String,
    pub user_email: String,
}

impl From<&User> for Actor {
    fn from(user: &User) -> Self {
        Self {
            user_id: user.id,
            user_name: user.full_name(),
            user_email: user.email.clone(),
        }
    }
}

/// Activity entry before the store assigns `id` and `timestamp`.
#[derive(Debug, Clone, PartialEq)]
pub struct NewActivity {
    pub actor: Actor,
    /// Free-text verb phrase, e.g. "Invited team member".
    pub action: String,
    pub resource: String,
    pub resource_id: Option<String>,
    pub details: String,
    pub metadata: Option<serde_json::Value>,
    pub severity: Severity,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

/// Stored, immutable audit record.
///
/// Field names and order are the JSON export layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityLogEntry {
    pub id: Uuid,
    pub user_id: Uuid,
    pub user_name: String,
    pub user_email: String,
    pub action: String,
    pub resource: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_id: Option<String>,
    pub details: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
    pub timestamp: DateTime<Utc>,
    pub severity: Severity,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
}

impl ActivityLogEntry {
    /// Seal a pending activity with its store-assigned id and timestamp.
    ///
    /// A JSON `null` metadata value is stored as absent.
    #[must_use]
    pub fn record(new: NewActivity, id: Uuid, timestamp: DateTime<Utc>) -> Self {
        Self {
            id,
            user_id: new.actor.user_id,
            user_name: new.actor.user_name,
            user_email: new.actor.user_email,
            action: new.action,
            resource: new.resource,
            resource_id: new.resource_id,
            details: new.details,
            metadata: new.metadata.filter(|m| !m.is_null()),
            timestamp,
            severity: new.severity,
            ip_address: new.ip_address,
            user_agent: new.user_agent,
        }
    }
}
