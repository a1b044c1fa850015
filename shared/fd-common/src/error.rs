//! Parse errors for the shared types.

/// Errors raised when converting external strings into typed values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("Unknown action: {0}")]
    UnknownAction(String),

    #[error("Unknown severity: {0}")]
    UnknownSeverity(String),

    #[error("Unknown user status: {0}")]
    UnknownUserStatus(String),

    #[error("Unknown invitation status: {0}")]
    UnknownInvitationStatus(String),
}

pub type Result<T> = std::result::Result<T, Error>;
