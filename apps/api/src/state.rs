use pcs_application::RoundAuditService;
use sqlx::PgPool;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub round_audit_service: RoundAuditService,
    pub postgres_pool: PgPool,
    pub frontend_url: String,
}
