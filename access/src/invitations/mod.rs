//! Team invitations.

mod error;
mod registry;
mod sweep;

pub use error::InvitationError;
pub use registry::{InvitationRegistry, INVITATION_TTL_DAYS};
pub use sweep::spawn_expiry_sweep;
