//! Team Directory Error Types

use uuid::Uuid;

use crate::permissions::PermissionError;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DirectoryError {
    #[error("Member not found: {0}")]
    NotFound(Uuid),

    #[error("Email already belongs to a member: {0}")]
    EmailTaken(String),

    #[error("Invalid email address: {0}")]
    InvalidEmail(String),

    #[error("You cannot remove yourself from the team")]
    CannotRemoveSelf,

    #[error(transparent)]
    PermissionDenied(#[from] PermissionError),
}

impl DirectoryError {
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "not_found",
            Self::EmailTaken(_) => "email_taken",
            Self::InvalidEmail(_) => "invalid_email",
            Self::CannotRemoveSelf => "cannot_remove_self",
            Self::PermissionDenied(e) => e.code(),
        }
    }
}
