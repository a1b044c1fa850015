//! Audit log query filters.
//!
//! A filter is a conjunction of optional predicates; an unset field matches
//! every entry.

use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use fd_common::{ActivityLogEntry, Severity};
use serde::{Deserialize, Serialize};

/// Named date-range shortcuts from the audit screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DateRange {
    /// Same calendar day (UTC) as `now`.
    Today,
    /// Within the last 7 days.
    Week,
    /// Within the last 30 days.
    Month,
}

impl DateRange {
    #[must_use]
    pub fn contains(self, timestamp: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        match self {
            Self::Today => timestamp.date_naive() == now.date_naive(),
            Self::Week => timestamp >= now - Duration::days(7),
            Self::Month => timestamp >= now - Duration::days(30),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown date range: {0}")]
pub struct UnknownDateRange(pub String);

impl FromStr for DateRange {
    type Err = UnknownDateRange;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "today" => Ok(Self::Today),
            "week" => Ok(Self::Week),
            "month" => Ok(Self::Month),
            other => Err(UnknownDateRange(other.to_string())),
        }
    }
}

/// Audit log query parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AuditFilter {
    /// Case-insensitive substring over action, user name, user email and details.
    pub search: Option<String>,
    pub severity: Option<Severity>,
    pub resource: Option<String>,
    pub date_range: Option<DateRange>,
}

impl AuditFilter {
    #[must_use]
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    #[must_use]
    pub const fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = Some(severity);
        self
    }

    #[must_use]
    pub fn with_resource(mut self, resource: impl Into<String>) -> Self {
        self.resource = Some(resource.into());
        self
    }

    #[must_use]
    pub const fn with_date_range(mut self, range: DateRange) -> Self {
        self.date_range = Some(range);
        self
    }

    /// Whether `entry` passes every set predicate, evaluated at `now`.
    #[must_use]
    pub fn matches(&self, entry: &ActivityLogEntry, now: DateTime<Utc>) -> bool {
        if let Some(search) = &self.search {
            let needle = search.to_lowercase();
            let hit = [
                &entry.action,
                &entry.user_name,
                &entry.user_email,
                &entry.details,
            ]
            .iter()
            .any(|field| field.to_lowercase().contains(&needle));
            if !hit {
                return false;
            }
        }

        if self.severity.is_some_and(|s| s != entry.severity) {
            return false;
        }

        if self
            .resource
            .as_deref()
            .is_some_and(|r| r != entry.resource)
        {
            return false;
        }

        self.date_range
            .is_none_or(|range| range.contains(entry.timestamp, now))
    }
}
