//! Tracing setup for hosts embedding the access core.

use anyhow::{anyhow, Result};
use tracing_subscriber::EnvFilter;

/// Default filter when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "fd_access=debug";

/// Install a JSON `tracing` subscriber filtered by `RUST_LOG`.
///
/// Returns an error instead of panicking if a global subscriber is already set.
pub fn init_tracing() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_FILTER.into()),
        )
        .json()
        .try_init()
        .map_err(|e| anyhow!("failed to install tracing subscriber: {e}"))
}
