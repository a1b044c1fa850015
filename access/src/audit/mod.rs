//! Audit trail.
//!
//! An append-only, size-bounded store of [`ActivityLogEntry`] records with
//! filtered queries, CSV and JSON export, and a best-effort logger used by
//! business actions.
//!
//! [`ActivityLogEntry`]: fd_common::ActivityLogEntry

mod error;
pub mod export;
mod filter;
mod logger;
mod stats;
mod store;

pub use error::AuditError;
pub use export::{export_csv, export_json, ExportFormat, CSV_HEADER};
pub use filter::{AuditFilter, DateRange, UnknownDateRange};
pub use logger::{ActivityLogger, ActivityRecord, ClientInfo};
pub use stats::AuditStats;
pub use store::AuditLogStore;
