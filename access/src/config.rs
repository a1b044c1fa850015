//! Access Configuration
//!
//! Loads configuration from environment variables. Every value has a default,
//! so an empty environment yields a working setup.

use std::env;
use std::time::Duration;

/// Default audit retention cap (the dashboard kept the last 1000 entries).
pub const DEFAULT_AUDIT_RETENTION: usize = 1000;

/// Default soft timeout for acquiring the audit append lock.
pub const DEFAULT_AUDIT_WRITE_TIMEOUT_MS: u64 = 250;

/// Access subsystem configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Maximum number of audit entries retained; oldest are evicted first.
    pub audit_retention: usize,

    /// Soft timeout for an audit append. Expiry counts as a persistence
    /// failure and is swallowed by the activity logger.
    pub audit_write_timeout: Duration,

    /// Interval of the invitation expiry sweep. `None` keeps expiry lazy.
    pub invitation_sweep_interval: Option<Duration>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            audit_retention: DEFAULT_AUDIT_RETENTION,
            audit_write_timeout: Duration::from_millis(DEFAULT_AUDIT_WRITE_TIMEOUT_MS),
            invitation_sweep_interval: None,
        }
    }
}

impl Config {
    /// Read `.env` (if present) and then the process environment.
    pub fn load() -> Self {
        dotenvy::dotenv().ok();
        Self::from_env()
    }

    /// Creates configuration from environment variables.
    ///
    /// Environment variables:
    /// - `AUDIT_LOG_RETENTION`: Retention cap (default: 1000, must be > 0)
    /// - `AUDIT_WRITE_TIMEOUT_MS`: Append lock timeout in milliseconds (default: 250)
    /// - `INVITATION_SWEEP_INTERVAL_SECS`: Expiry sweep interval; unset or 0 disables it
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(retention) = parse_positive::<usize>("AUDIT_LOG_RETENTION") {
            config.audit_retention = retention;
        }
        if let Some(ms) = parse_positive::<u64>("AUDIT_WRITE_TIMEOUT_MS") {
            config.audit_write_timeout = Duration::from_millis(ms);
        }
        config.invitation_sweep_interval =
            parse_positive::<u64>("INVITATION_SWEEP_INTERVAL_SECS").map(Duration::from_secs);

        config
    }

    /// Create a default configuration for testing.
    ///
    /// Small retention cap so eviction is easy to exercise.
    #[must_use]
    pub const fn default_for_test() -> Self {
        Self {
            audit_retention: 50,
            audit_write_timeout: Duration::from_millis(100),
            invitation_sweep_interval: None,
        }
    }
}

/// Parse a strictly positive number, ignoring unset or malformed values.
fn parse_positive<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr + PartialOrd + Default,
{
    env::var(key)
        .ok()
        .and_then(|v| v.trim().parse::<T>().ok())
        .filter(|v| *v > T::default())
}
