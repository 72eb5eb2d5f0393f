use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use pcs_application::{RoundProgressInput, SchoolRoundRepository};
use pcs_core::{AppError, AppResult, SchoolId};
use pcs_domain::{EvidenceCounts, EvidenceRecord, SchoolProgress, SchoolSnapshot, Stage, StageTally};
use tokio::sync::RwLock;

#[derive(Debug, Clone)]
struct StoredSchool {
    name: String,
    country: Option<String>,
    progress: SchoolProgress,
    legacy_evidence: u32,
}

/// In-memory school round repository.
///
/// Writes for schools registered through [`Self::fail_writes_for`] return an
/// internal error, which lets batch callers exercise partial failures.
#[derive(Debug, Default)]
pub struct InMemorySchoolRoundRepository {
    schools: RwLock<HashMap<SchoolId, StoredSchool>>,
    evidence: RwLock<HashMap<SchoolId, Vec<EvidenceRecord>>>,
    failing_writes: RwLock<HashSet<SchoolId>>,
}

impl InMemorySchoolRoundRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces one school.
    pub async fn insert_school(
        &self,
        school_id: SchoolId,
        name: impl Into<String>,
        country: Option<String>,
        progress: SchoolProgress,
        legacy_evidence: u32,
    ) {
        self.schools.write().await.insert(
            school_id,
            StoredSchool {
                name: name.into(),
                country,
                progress,
                legacy_evidence,
            },
        );
    }

    /// Attaches one evidence submission to a school.
    pub async fn add_evidence(&self, school_id: SchoolId, record: EvidenceRecord) -> AppResult<()> {
        if !self.schools.read().await.contains_key(&school_id) {
            return Err(AppError::NotFound(format!(
                "school '{school_id}' does not exist"
            )));
        }

        self.evidence
            .write()
            .await
            .entry(school_id)
            .or_default()
            .push(record);
        Ok(())
    }

    /// Makes every later progress write for the school fail.
    pub async fn fail_writes_for(&self, school_id: SchoolId) {
        self.failing_writes.write().await.insert(school_id);
    }

    /// Returns the stored progression of one school.
    pub async fn stored_progress(&self, school_id: SchoolId) -> Option<SchoolProgress> {
        self.schools
            .read()
            .await
            .get(&school_id)
            .map(|school| school.progress)
    }

    fn snapshot(
        school_id: SchoolId,
        school: &StoredSchool,
        records: Option<&Vec<EvidenceRecord>>,
    ) -> SchoolSnapshot {
        let supporting = records
            .map(|records| records.iter().filter(|record| record.is_supporting()).count())
            .unwrap_or_default();

        SchoolSnapshot {
            school_id,
            name: school.name.clone(),
            country: school.country.clone(),
            progress: school.progress,
            evidence: EvidenceCounts::new(
                school.legacy_evidence,
                u32::try_from(supporting).unwrap_or(u32::MAX),
            ),
        }
    }
}

#[async_trait]
impl SchoolRoundRepository for InMemorySchoolRoundRepository {
    async fn list_school_snapshots(&self) -> AppResult<Vec<SchoolSnapshot>> {
        let schools = self.schools.read().await;
        let evidence = self.evidence.read().await;

        let mut snapshots: Vec<SchoolSnapshot> = schools
            .iter()
            .map(|(school_id, school)| Self::snapshot(*school_id, school, evidence.get(school_id)))
            .collect();
        snapshots.sort_by(|left, right| left.name.cmp(&right.name));

        Ok(snapshots)
    }

    async fn find_school_snapshot(&self, school_id: SchoolId) -> AppResult<Option<SchoolSnapshot>> {
        let schools = self.schools.read().await;
        let evidence = self.evidence.read().await;

        Ok(schools
            .get(&school_id)
            .map(|school| Self::snapshot(school_id, school, evidence.get(&school_id))))
    }

    async fn update_school_progress(
        &self,
        school_id: SchoolId,
        progress: &SchoolProgress,
    ) -> AppResult<()> {
        if self.failing_writes.read().await.contains(&school_id) {
            return Err(AppError::Internal(format!(
                "failed to update school progress '{school_id}': write rejected"
            )));
        }

        let mut schools = self.schools.write().await;
        let Some(school) = schools.get_mut(&school_id) else {
            return Err(AppError::NotFound(format!(
                "school '{school_id}' does not exist"
            )));
        };

        school.progress = *progress;
        Ok(())
    }

    async fn list_round_progress_inputs(&self) -> AppResult<Vec<RoundProgressInput>> {
        let schools = self.schools.read().await;
        let evidence = self.evidence.read().await;

        let mut inputs: Vec<RoundProgressInput> = schools
            .iter()
            .map(|(school_id, school)| {
                let mut approved_in_round = StageTally::default();
                for record in evidence.get(school_id).into_iter().flatten() {
                    if !record.is_approved_in(school.progress.current_round) {
                        continue;
                    }
                    match record.stage {
                        Stage::Inspire => approved_in_round.inspire += 1,
                        Stage::Investigate => approved_in_round.investigate += 1,
                        Stage::Act => approved_in_round.act += 1,
                    }
                }

                RoundProgressInput {
                    school_id: *school_id,
                    school_name: school.name.clone(),
                    progress: school.progress,
                    approved_in_round,
                }
            })
            .collect();
        inputs.sort_by(|left, right| left.school_name.cmp(&right.school_name));

        Ok(inputs)
    }
}

#[cfg(test)]
mod tests;
