//! Audit Log Error Types

use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum AuditError {
    #[error("Audit log store is closed")]
    Closed,

    #[error("Timed out after {0:?} waiting for the audit log")]
    Timeout(Duration),

    #[error("Failed to encode audit export: {0}")]
    Encode(#[from] serde_json::Error),
}

impl AuditError {
    /// The entry could not be durably appended.
    #[must_use]
    pub const fn is_persistence_failure(&self) -> bool {
        matches!(self, Self::Closed | Self::Timeout(_))
    }

    /// Stable error code for the UI.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Closed | Self::Timeout(_) => "log_persistence_failure",
            Self::Encode(_) => "export_failed",
        }
    }
}
