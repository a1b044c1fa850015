//! Shared types.

pub mod activity;
pub mod invitation;
pub mod permission;
pub mod role;
pub mod user;

pub use activity::*;
pub use invitation::*;
pub use permission::*;
pub use role::*;
pub use user::*;
