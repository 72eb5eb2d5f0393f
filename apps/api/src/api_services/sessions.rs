use pcs_core::AppError;
use sqlx::PgPool;
use tower_sessions::cookie::SameSite;
use tower_sessions::cookie::time::Duration;
use tower_sessions::{Expiry, SessionManagerLayer};
use tower_sessions_sqlx_store::PostgresStore;

/// Table the console's auth service writes sessions into.
const SESSION_TABLE: &str = "tower_sessions";

/// Cookie settings shared with the console's auth service.
#[derive(Debug, Clone)]
pub struct SessionSettings {
    pub cookie_name: String,
    pub cookie_secure: bool,
    pub idle_minutes: i64,
}

/// Reads operator sessions issued by the console's auth service.
pub async fn build_postgres_session_layer(
    pool: PgPool,
    settings: &SessionSettings,
) -> Result<SessionManagerLayer<PostgresStore>, AppError> {
    let store = PostgresStore::new(pool)
        .with_table_name(SESSION_TABLE)
        .map_err(|error| {
            AppError::Validation(format!("invalid session table '{SESSION_TABLE}': {error}"))
        })?;

    store.migrate().await.map_err(|error| {
        AppError::Internal(format!("failed to prepare admin session table: {error}"))
    })?;

    Ok(SessionManagerLayer::new(store)
        .with_name(settings.cookie_name.clone())
        .with_secure(settings.cookie_secure)
        .with_http_only(true)
        .with_same_site(SameSite::Lax)
        .with_expiry(Expiry::OnInactivity(Duration::minutes(settings.idle_minutes))))
}
