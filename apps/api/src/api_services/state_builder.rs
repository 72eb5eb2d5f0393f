use std::sync::Arc;

use pcs_application::{AuthorizationService, RoundAuditService};
use pcs_domain::ClassificationRules;
use pcs_infrastructure::{
    PostgresAuditRepository, PostgresAuthorizationRepository, PostgresSchoolRoundRepository,
};
use sqlx::PgPool;

use crate::api_config::ApiConfig;
use crate::state::AppState;

pub fn build_app_state(pool: PgPool, config: &ApiConfig) -> AppState {
    let authorization_service =
        AuthorizationService::new(Arc::new(PostgresAuthorizationRepository::new(pool.clone())));

    let round_audit_service = RoundAuditService::new(
        authorization_service,
        Arc::new(PostgresSchoolRoundRepository::new(pool.clone())),
        Arc::new(PostgresAuditRepository::new(pool.clone())),
        ClassificationRules::new(config.rule_set),
    )
    .with_stage_requirements(config.stage_requirements);

    AppState {
        round_audit_service,
        postgres_pool: pool,
        frontend_url: config.frontend_url.clone(),
    }
}
