use std::sync::Arc;

use polizas_core::{CredentialVerifier, StatsService};
use polizas_db::PolicyRepository;

use crate::auth::TokenIssuer;

/// Shared application state for all handlers.
///
/// This is wrapped in Arc internally by Axum when using `with_state()`,
/// so all fields must implement Clone (which they do via internal `Arc<Pool>`).
#[derive(Clone)]
pub struct AppState {
    /// Policy repository for CRUD queries
    pub policy_repo: PolicyRepository,

    /// Statistics service for the dashboard facets
    pub stats_service: StatsService<PolicyRepository>,

    /// Signs and verifies session tokens
    pub tokens: TokenIssuer,

    /// Checks login credentials
    pub credentials: Arc<dyn CredentialVerifier>,

    /// Whether the session cookie carries the Secure attribute
    pub cookie_secure: bool,
}

impl AppState {
    /// Creates a new application state with all services initialized.
    pub fn new(
        pool: sqlx::PgPool,
        tokens: TokenIssuer,
        credentials: Arc<dyn CredentialVerifier>,
        cookie_secure: bool,
    ) -> Self {
        let policy_repo = PolicyRepository::new(pool);

        Self {
            stats_service: StatsService::new(policy_repo.clone()),
            policy_repo,
            tokens,
            credentials,
            cookie_secure,
        }
    }
}
