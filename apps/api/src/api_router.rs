use axum::Router;
use axum::middleware::{from_fn, from_fn_with_state};
use axum::routing::{get, post};
use pcs_core::AppError;
use tower_http::trace::TraceLayer;

use crate::state::AppState;
use crate::{handlers, middleware};

mod cors;

/// Builds the HTTP router. The caller layers the session manager on top.
pub fn build_router(app_state: AppState, frontend_url: &str) -> Result<Router, AppError> {
    let protected_routes = Router::new()
        .route(
            "/api/admin/migration/audit-school-rounds",
            post(handlers::migration::audit_school_rounds_handler),
        )
        .route(
            "/api/admin/migration/fix-school-rounds",
            post(handlers::migration::fix_school_rounds_handler),
        )
        .route(
            "/api/admin/migration/recalculate-round-progress",
            post(handlers::migration::recalculate_round_progress_handler),
        )
        .route_layer(from_fn(middleware::require_admin_session));

    Ok(Router::new()
        .route("/health", get(handlers::health::health_handler))
        .merge(protected_routes)
        .route_layer(from_fn_with_state(
            app_state.clone(),
            middleware::require_same_origin_for_mutations,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(cors::build_cors_layer(frontend_url)?)
        .with_state(app_state))
}

#[cfg(test)]
mod tests;
