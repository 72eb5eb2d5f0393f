use super::checks::check_database;
use super::*;

pub async fn health_handler(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let database = check_database(&state.postgres_pool).await;
    let ready = database.dependency.status == "ok";

    let response = HealthResponse {
        status: if ready { "ok" } else { "degraded" },
        ready,
        database: database.dependency,
        school_count: database.school_count,
        rule_set: state.round_audit_service.rule_set().as_str(),
    };

    if ready {
        (StatusCode::OK, Json(response))
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, Json(response))
    }
}
