//! Append-only audit log store.
//!
//! Entries are kept oldest-first behind a single `RwLock`. Appends take the
//! write lock, which is the global append lock that serializes ordering and
//! retention; queries take the read lock and see a consistent snapshot.
//!
//! Timestamps are assigned under the lock, truncated to milliseconds and never
//! allowed to go backwards, so the front of the queue is always the oldest
//! entry by timestamp and eviction pops from there.

use std::collections::{HashSet, VecDeque};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use chrono::{DateTime, SubsecRound, Utc};
use fd_common::{ActivityLogEntry, NewActivity};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::error::AuditError;
use super::filter::AuditFilter;
use super::stats::AuditStats;
use crate::config::Config;

/// Size-bounded, append-only activity log.
#[derive(Debug)]
pub struct AuditLogStore {
    entries: RwLock<VecDeque<ActivityLogEntry>>,
    retention: usize,
    write_timeout: Duration,
    closed: AtomicBool,
}

impl AuditLogStore {
    /// Create an empty store. A zero retention cap is raised to one.
    #[must_use]
    pub fn new(retention: usize, write_timeout: Duration) -> Self {
        Self {
            entries: RwLock::new(VecDeque::new()),
            retention: retention.max(1),
            write_timeout,
            closed: AtomicBool::new(false),
        }
    }

    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.audit_retention, config.audit_write_timeout)
    }

    #[must_use]
    pub const fn retention(&self) -> usize {
        self.retention
    }

    /// Stop accepting appends. Reads keep working.
    pub fn close(&self) {
        self.closed.store(true, Ordering::Release);
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    /// Store a new entry, assigning its `id` and `timestamp`.
    ///
    /// Content is never rejected. Fails only when the store is closed or the
    /// append lock cannot be acquired within the write timeout.
    #[tracing::instrument(skip(self, activity), fields(action = %activity.action, resource = %activity.resource))]
    pub async fn append(&self, activity: NewActivity) -> Result<ActivityLogEntry, AuditError> {
        if self.is_closed() {
            return Err(AuditError::Closed);
        }

        let mut entries = tokio::time::timeout(self.write_timeout, self.entries.write())
            .await
            .map_err(|_| AuditError::Timeout(self.write_timeout))?;

        // Closed while we were waiting for the lock
        if self.is_closed() {
            return Err(AuditError::Closed);
        }

        let mut timestamp = Utc::now().trunc_subsecs(3);
        if let Some(last) = entries.back() {
            timestamp = timestamp.max(last.timestamp);
        }

        let entry = ActivityLogEntry::record(activity, Uuid::now_v7(), timestamp);
        entries.push_back(entry.clone());

        let evicted = self.enforce_retention(&mut entries);
        if evicted > 0 {
            tracing::debug!(evicted, retention = self.retention, "Evicted oldest audit entries");
        }

        Ok(entry)
    }

    /// Entries matching `filter`, most recent first.
    pub async fn query(&self, filter: &AuditFilter) -> Vec<ActivityLogEntry> {
        self.query_at(filter, Utc::now()).await
    }

    /// [`query`](Self::query) with an explicit evaluation time for date ranges.
    pub async fn query_at(&self, filter: &AuditFilter, now: DateTime<Utc>) -> Vec<ActivityLogEntry> {
        let entries = self.entries.read().await;
        entries
            .iter()
            .rev()
            .filter(|e| filter.matches(e, now))
            .cloned()
            .collect()
    }

    /// Summary counts over every retained entry.
    pub async fn stats(&self) -> AuditStats {
        let entries = self.entries.read().await;
        AuditStats::compute(entries.iter(), Utc::now())
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    /// Merge previously recorded entries (e.g. a JSON export read back).
    ///
    /// Entries whose id is already present are skipped. Timestamps later than
    /// now are clamped to now. The result is re-ordered by timestamp and
    /// trimmed to the retention cap. Returns the number of entries merged in
    /// before trimming.
    pub async fn restore(&self, imported: impl IntoIterator<Item = ActivityLogEntry>) -> usize {
        let mut entries = self.entries.write().await;
        let mut known: HashSet<Uuid> = entries.iter().map(|e| e.id).collect();
        let now = Utc::now().trunc_subsecs(3);

        let mut merged = 0;
        for mut entry in imported {
            if known.insert(entry.id) {
                if entry.timestamp > now {
                    tracing::warn!(
                        entry_id = %entry.id,
                        timestamp = %entry.timestamp,
                        "Clamped future audit timestamp"
                    );
                    entry.timestamp = now;
                }
                entries.push_back(entry);
                merged += 1;
            }
        }

        entries.make_contiguous().sort_by_key(|e| e.timestamp);
        let evicted = self.enforce_retention(&mut entries);

        tracing::info!(merged, evicted, total = entries.len(), "Restored audit entries");
        merged
    }

    /// Pop from the front until within the cap. Returns the eviction count.
    fn enforce_retention(&self, entries: &mut VecDeque<ActivityLogEntry>) -> usize {
        let excess = entries.len().saturating_sub(self.retention);
        entries.drain(..excess);
        excess
    }
}
