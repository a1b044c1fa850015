//! Headline counts for the audit screen.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use fd_common::ActivityLogEntry;
use serde::Serialize;

use super::filter::DateRange;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditStats {
    pub total: usize,
    /// Entries on the same UTC day as `now`.
    pub today: usize,
    /// `high` and `critical` entries.
    pub high_priority: usize,
    /// Distinct actors.
    pub active_users: usize,
}

impl AuditStats {
    pub fn compute<'a>(
        entries: impl IntoIterator<Item = &'a ActivityLogEntry>,
        now: DateTime<Utc>,
    ) -> Self {
        let mut stats = Self::default();
        let mut users = HashSet::new();

        for entry in entries {
            stats.total += 1;
            if DateRange::Today.contains(entry.timestamp, now) {
                stats.today += 1;
            }
            if entry.severity.is_high_priority() {
                stats.high_priority += 1;
            }
            users.insert(entry.user_id);
        }

        stats.active_users = users.len();
        stats
    }
}
