//! Invitation Error Types

use fd_common::InvitationStatus;
use uuid::Uuid;

use crate::permissions::PermissionError;
use crate::team::DirectoryError;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvitationError {
    #[error("Invitation not found: {0}")]
    NotFound(Uuid),

    #[error("Invitation has expired")]
    Expired,

    #[error("Invitation is already {0}")]
    AlreadyResolved(InvitationStatus),

    #[error("{0} is already a team member")]
    AlreadyMember(String),

    #[error("{0} already has a pending invitation")]
    AlreadyInvited(String),

    #[error("Invalid email address: {0}")]
    InvalidEmail(String),

    #[error(transparent)]
    PermissionDenied(#[from] PermissionError),

    #[error(transparent)]
    Directory(#[from] DirectoryError),
}

impl InvitationError {
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "not_found",
            Self::Expired => "invitation_expired",
            Self::AlreadyResolved(_) => "invitation_already_resolved",
            Self::AlreadyMember(_) => "already_member",
            Self::AlreadyInvited(_) => "already_invited",
            Self::InvalidEmail(_) => "invalid_email",
            Self::PermissionDenied(e) => e.code(),
            Self::Directory(e) => e.code(),
        }
    }
}
