use pcs_application::SchoolRoundRepository;
use pcs_core::{AppError, SchoolId};
use pcs_domain::{SchoolProgress, Stage};
use sqlx::PgPool;
use sqlx::migrate::Migrator;
use sqlx::postgres::PgPoolOptions;

use super::PostgresSchoolRoundRepository;

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
        panic!("failed to run migrations for school round tests: {error}");
    }

    Some(pool)
}

async fn insert_school(
    pool: &PgPool,
    school_id: SchoolId,
    name: &str,
    current_round: i32,
    progress_percentage: i32,
    legacy_evidence_count: i32,
) {
    let insert = sqlx::query(
        r#"
            INSERT INTO schools (
                id,
                name,
                current_round,
                rounds_completed,
                progress_percentage,
                legacy_evidence_count
            )
            VALUES ($1, $2, $3, $3 - 1, $4, $5)
            "#,
    )
    .bind(school_id.as_uuid())
    .bind(name)
    .bind(current_round)
    .bind(progress_percentage)
    .bind(legacy_evidence_count)
    .execute(pool)
    .await;

    assert!(insert.is_ok());
}

async fn insert_evidence(pool: &PgPool, school_id: SchoolId, stage: &str, round: i32, status: &str) {
    let insert = sqlx::query(
        r#"
            INSERT INTO evidence (school_id, stage, round, status)
            VALUES ($1, $2, $3, $4)
            "#,
    )
    .bind(school_id.as_uuid())
    .bind(stage)
    .bind(round)
    .bind(status)
    .execute(pool)
    .await;

    assert!(insert.is_ok());
}

#[tokio::test]
async fn snapshot_counts_legacy_and_non_rejected_evidence() {
    let Some(pool) = test_pool().await else {
        return;
    };

    let repository = PostgresSchoolRoundRepository::new(pool.clone());
    let school_id = SchoolId::new();
    insert_school(&pool, school_id, "Snapshot School", 2, 153, 3).await;
    insert_evidence(&pool, school_id, "inspire", 2, "approved").await;
    insert_evidence(&pool, school_id, "investigate", 2, "pending").await;
    insert_evidence(&pool, school_id, "act", 2, "rejected").await;

    let found = repository.find_school_snapshot(school_id).await;
    let Ok(Some(snapshot)) = found else {
        panic!("inserted school should be found");
    };

    assert_eq!(snapshot.name, "Snapshot School");
    assert_eq!(snapshot.progress.current_round, 2);
    assert_eq!(snapshot.progress.progress_percentage, 153);
    assert_eq!(snapshot.evidence.legacy, 3);
    assert_eq!(snapshot.evidence.new, 2);

    let listed = repository.list_school_snapshots().await;
    assert!(listed.is_ok());
    assert!(
        listed
            .unwrap_or_default()
            .iter()
            .any(|snapshot| snapshot.school_id == school_id)
    );
}

#[tokio::test]
async fn missing_school_snapshot_is_none() {
    let Some(pool) = test_pool().await else {
        return;
    };

    let repository = PostgresSchoolRoundRepository::new(pool);
    let found = repository.find_school_snapshot(SchoolId::new()).await;

    assert!(matches!(found, Ok(None)));
}

#[tokio::test]
async fn update_overwrites_progression_fields() {
    let Some(pool) = test_pool().await else {
        return;
    };

    let repository = PostgresSchoolRoundRepository::new(pool.clone());
    let school_id = SchoolId::new();
    insert_school(&pool, school_id, "Update School", 3, 120, 0).await;

    let mut progress = SchoolProgress::initial();
    progress.current_round = 3;
    progress.rounds_completed = 2;
    progress.stages.inspire = true;
    progress.progress_percentage = 33;
    progress.current_stage = Stage::Investigate;

    let updated = repository.update_school_progress(school_id, &progress).await;
    assert!(updated.is_ok());

    let found = repository.find_school_snapshot(school_id).await;
    let Ok(Some(snapshot)) = found else {
        panic!("updated school should be found");
    };
    assert_eq!(snapshot.progress, progress);

    let missing = repository
        .update_school_progress(SchoolId::new(), &progress)
        .await;
    assert!(matches!(missing, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn round_inputs_only_count_approved_evidence_in_current_round() {
    let Some(pool) = test_pool().await else {
        return;
    };

    let repository = PostgresSchoolRoundRepository::new(pool.clone());
    let school_id = SchoolId::new();
    insert_school(&pool, school_id, "Recalculation School", 2, 0, 0).await;
    insert_evidence(&pool, school_id, "inspire", 2, "approved").await;
    insert_evidence(&pool, school_id, "inspire", 2, "approved").await;
    insert_evidence(&pool, school_id, "investigate", 1, "approved").await;
    insert_evidence(&pool, school_id, "act", 2, "pending").await;

    let listed = repository.list_round_progress_inputs().await;
    let Ok(inputs) = listed else {
        panic!("listing round inputs should succeed");
    };
    let Some(input) = inputs.iter().find(|input| input.school_id == school_id) else {
        panic!("inserted school should be listed");
    };

    assert_eq!(input.approved_in_round.inspire, 2);
    assert_eq!(input.approved_in_round.investigate, 0);
    assert_eq!(input.approved_in_round.act, 0);
}
