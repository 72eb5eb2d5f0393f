use async_trait::async_trait;
use sqlx::PgPool;
use tracing::debug;

use pcs_application::{AuditEvent, AuditRepository};
use pcs_core::{AppError, AppResult};

/// Operator audit trail in `admin_audit_log_entries`. Rows are never updated.
#[derive(Clone)]
pub struct PostgresAuditRepository {
    pool: PgPool,
}

impl PostgresAuditRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AuditRepository for PostgresAuditRepository {
    async fn append_event(&self, event: AuditEvent) -> AppResult<()> {
        let AuditEvent {
            subject,
            action,
            resource_type,
            resource_id,
            detail,
        } = event;

        let entry_id = sqlx::query_scalar::<_, uuid::Uuid>(
            r#"
            INSERT INTO admin_audit_log_entries (subject, action, resource_type, resource_id, detail)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(subject.as_str())
        .bind(action.as_str())
        .bind(resource_type.as_str())
        .bind(resource_id.as_str())
        .bind(detail.as_deref())
        .fetch_one(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!(
                "failed to record '{}' for subject '{subject}': {error}",
                action.as_str()
            ))
        })?;

        debug!(
            %entry_id,
            %subject,
            action = action.as_str(),
            %resource_id,
            "audit entry recorded"
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests;
