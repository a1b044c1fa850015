//! Shared access state.

use std::sync::Arc;

use tokio::task::JoinHandle;

use crate::audit::{ActivityLogger, AuditLogStore, ClientInfo};
use crate::config::Config;
use crate::invitations::{spawn_expiry_sweep, InvitationRegistry};
use crate::permissions::RoleRegistry;
use crate::session::{Session, SessionError};
use crate::team::TeamDirectory;

/// Everything the access subsystem needs, wired together once.
#[derive(Debug, Clone)]
pub struct AccessState {
    /// Loaded configuration
    pub config: Arc<Config>,
    /// Seeded role set
    pub roles: Arc<RoleRegistry>,
    /// Organization members
    pub directory: Arc<TeamDirectory>,
    /// Activity log
    pub audit: Arc<AuditLogStore>,
    /// Best-effort writer into `audit`
    pub logger: ActivityLogger,
    /// Pending invitations
    pub invitations: Arc<InvitationRegistry>,
}

impl AccessState {
    /// Create new access state with the seeded roles.
    #[must_use]
    pub fn new(config: Config) -> Self {
        let roles = Arc::new(RoleRegistry::seeded());
        let audit = Arc::new(AuditLogStore::from_config(&config));
        let logger = ActivityLogger::new(Arc::clone(&audit));
        let directory = Arc::new(TeamDirectory::new(Arc::clone(&roles), logger.clone()));
        let invitations = Arc::new(InvitationRegistry::new(
            Arc::clone(&roles),
            Arc::clone(&directory),
            logger.clone(),
        ));

        Self {
            config: Arc::new(config),
            roles,
            directory,
            audit,
            logger,
            invitations,
        }
    }

    /// Start configured background tasks. Must be called inside a runtime.
    ///
    /// The returned handles should be kept alongside the host's other tasks.
    pub fn spawn_background_tasks(&self) -> Vec<JoinHandle<()>> {
        let mut handles = Vec::new();
        if let Some(every) = self.config.invitation_sweep_interval {
            tracing::info!(interval_secs = every.as_secs(), "Starting invitation expiry sweep");
            handles.push(spawn_expiry_sweep(Arc::clone(&self.invitations), every));
        }
        handles
    }

    /// Sign in a member by email.
    pub async fn sign_in(&self, email: &str, client: ClientInfo) -> Result<Session, SessionError> {
        Session::sign_in(&self.directory, self.logger.clone(), email, client).await
    }
}
