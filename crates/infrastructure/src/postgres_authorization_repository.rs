use std::str::FromStr;

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::warn;

use pcs_application::AuthorizationRepository;
use pcs_core::{AppError, AppResult};
use pcs_domain::Permission;

/// PostgreSQL-backed repository for operator permission lookups.
#[derive(Clone)]
pub struct PostgresAuthorizationRepository {
    pool: PgPool,
}

impl PostgresAuthorizationRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AuthorizationRepository for PostgresAuthorizationRepository {
    async fn list_permissions_for_subject(&self, subject: &str) -> AppResult<Vec<Permission>> {
        let stored = sqlx::query_scalar::<_, String>(
            r#"
            SELECT permission
            FROM admin_permission_grants
            WHERE subject = $1
            ORDER BY permission
            "#,
        )
        .bind(subject)
        .fetch_all(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to list operator permissions: {error}"))
        })?;

        Ok(stored
            .into_iter()
            .filter_map(|value| match Permission::from_str(value.as_str()) {
                Ok(permission) => Some(permission),
                Err(error) => {
                    warn!(subject, error = %error, "ignoring unknown stored permission");
                    None
                }
            })
            .collect())
    }
}
