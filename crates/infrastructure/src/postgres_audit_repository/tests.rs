use pcs_application::{AuditEvent, AuditRepository};
use pcs_domain::AuditAction;
use sqlx::PgPool;
use sqlx::migrate::Migrator;
use sqlx::postgres::PgPoolOptions;

use super::PostgresAuditRepository;

static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

async fn test_pool() -> Option<PgPool> {
    let Ok(database_url) = std::env::var("DATABASE_URL") else {
        return None;
    };

    let pool = match PgPoolOptions::new()
        .max_connections(2)
        .connect(database_url.as_str())
        .await
    {
        Ok(pool) => pool,
        Err(error) => panic!("failed to connect to DATABASE_URL in test: {error}"),
    };

    if let Err(error) = MIGRATOR.run(&pool).await {
        panic!("failed to run migrations for audit trail tests: {error}");
    }

    Some(pool)
}

#[tokio::test]
async fn appended_event_is_stored_with_its_action_value() {
    let Some(pool) = test_pool().await else {
        return;
    };
    let repository = PostgresAuditRepository::new(pool.clone());
    let subject = format!("operator-{}", uuid::Uuid::new_v4());

    let appended = repository
        .append_event(AuditEvent {
            subject: subject.clone(),
            action: AuditAction::RoundProgressRecalculated,
            resource_type: "school_rounds".to_owned(),
            resource_id: "all".to_owned(),
            detail: None,
        })
        .await;
    assert!(appended.is_ok());

    let stored = sqlx::query_as::<_, (String, String, Option<String>)>(
        "SELECT action, resource_id, detail FROM admin_audit_log_entries WHERE subject = $1",
    )
    .bind(subject.as_str())
    .fetch_all(&pool)
    .await
    .unwrap_or_else(|error| panic!("failed to read audit entries: {error}"));

    assert_eq!(
        stored,
        vec![(
            "migration.round_progress.recalculated".to_owned(),
            "all".to_owned(),
            None
        )]
    );
}
