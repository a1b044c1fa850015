//! Flowdesk Access
//!
//! Access control and audit trail for the Flowdesk automation dashboard:
//! roles and permission checks, an append-only activity log with export,
//! team membership and invitations.

pub mod audit;
pub mod config;
pub mod invitations;
pub mod permissions;
pub mod session;
pub mod team;
pub mod telemetry;

mod state;

pub use state::AccessState;
