use std::str::FromStr;

use async_trait::async_trait;
use sqlx::{FromRow, PgPool};

use pcs_application::{RoundProgressInput, SchoolRoundRepository};
use pcs_core::{AppError, AppResult, SchoolId};
use pcs_domain::{
    EvidenceCounts, SchoolProgress, SchoolSnapshot, Stage, StageCompletion, StageTally,
};

/// PostgreSQL-backed repository over school and evidence tables.
///
/// Writes are single unconditional updates; concurrent operators race with
/// last-write-wins semantics.
#[derive(Clone)]
pub struct PostgresSchoolRoundRepository {
    pool: PgPool,
}

impl PostgresSchoolRoundRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct SchoolProgressRow {
    current_round: i32,
    rounds_completed: i32,
    inspire_completed: bool,
    investigate_completed: bool,
    act_completed: bool,
    progress_percentage: i32,
    current_stage: String,
}

impl SchoolProgressRow {
    fn into_progress(self) -> AppResult<SchoolProgress> {
        let current_stage = Stage::from_str(self.current_stage.as_str()).map_err(|error| {
            AppError::Internal(format!("invalid stored school stage: {error}"))
        })?;

        Ok(SchoolProgress {
            current_round: self.current_round,
            rounds_completed: self.rounds_completed,
            stages: StageCompletion {
                inspire: self.inspire_completed,
                investigate: self.investigate_completed,
                act: self.act_completed,
            },
            progress_percentage: self.progress_percentage,
            current_stage,
        })
    }
}

#[derive(Debug, FromRow)]
struct SchoolSnapshotRow {
    id: uuid::Uuid,
    name: String,
    country: Option<String>,
    #[sqlx(flatten)]
    progress: SchoolProgressRow,
    legacy_evidence_count: i32,
    new_evidence_count: i64,
}

impl SchoolSnapshotRow {
    fn into_snapshot(self) -> AppResult<SchoolSnapshot> {
        Ok(SchoolSnapshot {
            school_id: SchoolId::from_uuid(self.id),
            name: self.name,
            country: self.country,
            progress: self.progress.into_progress()?,
            evidence: EvidenceCounts::new(
                count_to_u32(i64::from(self.legacy_evidence_count)),
                count_to_u32(self.new_evidence_count),
            ),
        })
    }
}

#[derive(Debug, FromRow)]
struct RoundProgressRow {
    id: uuid::Uuid,
    name: String,
    #[sqlx(flatten)]
    progress: SchoolProgressRow,
    approved_inspire: i64,
    approved_investigate: i64,
    approved_act: i64,
}

fn count_to_u32(value: i64) -> u32 {
    u32::try_from(value.max(0)).unwrap_or(u32::MAX)
}

const SNAPSHOT_SELECT: &str = r#"
    SELECT
        schools.id,
        schools.name,
        schools.country,
        schools.current_round,
        schools.rounds_completed,
        schools.inspire_completed,
        schools.investigate_completed,
        schools.act_completed,
        schools.progress_percentage,
        schools.current_stage,
        schools.legacy_evidence_count,
        COUNT(evidence.id) FILTER (WHERE evidence.status <> 'rejected') AS new_evidence_count
    FROM schools
    LEFT JOIN evidence
        ON evidence.school_id = schools.id
"#;

#[async_trait]
impl SchoolRoundRepository for PostgresSchoolRoundRepository {
    async fn list_school_snapshots(&self) -> AppResult<Vec<SchoolSnapshot>> {
        let query = format!("{SNAPSHOT_SELECT} GROUP BY schools.id ORDER BY schools.name");
        let rows = sqlx::query_as::<_, SchoolSnapshotRow>(query.as_str())
            .fetch_all(&self.pool)
            .await
            .map_err(|error| {
                AppError::Internal(format!("failed to list school snapshots: {error}"))
            })?;

        rows.into_iter()
            .map(SchoolSnapshotRow::into_snapshot)
            .collect()
    }

    async fn find_school_snapshot(&self, school_id: SchoolId) -> AppResult<Option<SchoolSnapshot>> {
        let query = format!("{SNAPSHOT_SELECT} WHERE schools.id = $1 GROUP BY schools.id");
        let row = sqlx::query_as::<_, SchoolSnapshotRow>(query.as_str())
            .bind(school_id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|error| {
                AppError::Internal(format!(
                    "failed to load school snapshot '{school_id}': {error}"
                ))
            })?;

        row.map(SchoolSnapshotRow::into_snapshot).transpose()
    }

    async fn update_school_progress(
        &self,
        school_id: SchoolId,
        progress: &SchoolProgress,
    ) -> AppResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE schools
            SET
                current_round = $2,
                rounds_completed = $3,
                inspire_completed = $4,
                investigate_completed = $5,
                act_completed = $6,
                progress_percentage = $7,
                current_stage = $8,
                updated_at = now()
            WHERE id = $1
            "#,
        )
        .bind(school_id.as_uuid())
        .bind(progress.current_round)
        .bind(progress.rounds_completed)
        .bind(progress.stages.inspire)
        .bind(progress.stages.investigate)
        .bind(progress.stages.act)
        .bind(progress.progress_percentage)
        .bind(progress.current_stage.as_str())
        .execute(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!(
                "failed to update school progress '{school_id}': {error}"
            ))
        })?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "school '{school_id}' does not exist"
            )));
        }

        Ok(())
    }

    async fn list_round_progress_inputs(&self) -> AppResult<Vec<RoundProgressInput>> {
        let rows = sqlx::query_as::<_, RoundProgressRow>(
            r#"
            SELECT
                schools.id,
                schools.name,
                schools.current_round,
                schools.rounds_completed,
                schools.inspire_completed,
                schools.investigate_completed,
                schools.act_completed,
                schools.progress_percentage,
                schools.current_stage,
                COUNT(evidence.id) FILTER (WHERE evidence.stage = 'inspire') AS approved_inspire,
                COUNT(evidence.id) FILTER (WHERE evidence.stage = 'investigate') AS approved_investigate,
                COUNT(evidence.id) FILTER (WHERE evidence.stage = 'act') AS approved_act
            FROM schools
            LEFT JOIN evidence
                ON evidence.school_id = schools.id
                AND evidence.status = 'approved'
                AND evidence.round = schools.current_round
            GROUP BY schools.id
            ORDER BY schools.name
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to list round progress inputs: {error}"))
        })?;

        rows.into_iter()
            .map(|row| {
                Ok(RoundProgressInput {
                    school_id: SchoolId::from_uuid(row.id),
                    school_name: row.name,
                    progress: row.progress.into_progress()?,
                    approved_in_round: StageTally {
                        inspire: count_to_u32(row.approved_inspire),
                        investigate: count_to_u32(row.approved_investigate),
                        act: count_to_u32(row.approved_act),
                    },
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests;
