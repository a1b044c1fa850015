//! Team membership.

mod directory;
mod error;

pub(crate) use directory::normalize_email;
pub use directory::{NewMember, TeamDirectory, TeamSummary};
pub use error::DirectoryError;
