//! Flowdesk Common Library
//!
//! Access-control and audit types shared between the access core and the
//! dashboard screens that consume it.

pub mod error;
pub mod types;

pub use error::{Error, Result};
pub use types::*;
