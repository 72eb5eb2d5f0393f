use std::time::Duration;

use pcs_core::AppError;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use tracing::info;

/// Opens the school database and brings its schema up to date.
pub async fn connect_and_migrate(
    database_url: &str,
    max_connections: u32,
) -> Result<PgPool, AppError> {
    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to connect to school database: {error}"))
        })?;

    let migrator = sqlx::migrate!("../../crates/infrastructure/migrations");
    migrator
        .run(&pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to migrate school database: {error}"))
        })?;

    info!(
        max_connections,
        migrations = migrator.iter().count(),
        "school database ready"
    );

    Ok(pool)
}
