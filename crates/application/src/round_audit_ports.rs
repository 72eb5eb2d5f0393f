use async_trait::async_trait;
use pcs_core::{AppResult, SchoolId};
use pcs_domain::{
    AuditSummary, ResetType, RoundAuditStatus, SchoolAuditResult, SchoolProgress, SchoolSnapshot,
    StageTally,
};

/// Repository port over school and evidence records.
#[async_trait]
pub trait SchoolRoundRepository: Send + Sync {
    /// Lists every school with its evidence counters.
    async fn list_school_snapshots(&self) -> AppResult<Vec<SchoolSnapshot>>;

    /// Finds one school with its evidence counters.
    async fn find_school_snapshot(&self, school_id: SchoolId) -> AppResult<Option<SchoolSnapshot>>;

    /// Overwrites the stored progression fields of one school.
    async fn update_school_progress(
        &self,
        school_id: SchoolId,
        progress: &SchoolProgress,
    ) -> AppResult<()>;

    /// Lists every school with approved evidence per stage in its current round.
    async fn list_round_progress_inputs(&self) -> AppResult<Vec<RoundProgressInput>>;
}

/// Recalculation input for one school.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundProgressInput {
    /// School identifier.
    pub school_id: SchoolId,
    /// School display name.
    pub school_name: String,
    /// Stored progression.
    pub progress: SchoolProgress,
    /// Approved evidence per stage in the current round.
    pub approved_in_round: StageTally,
}

/// Result of one audit run.
#[derive(Debug, Clone, PartialEq)]
pub struct RoundAuditReport {
    /// Aggregate counts.
    pub summary: AuditSummary,
    /// Per-school results, illogical schools first.
    pub schools: Vec<SchoolAuditResult>,
}

/// Input payload for a repair request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixSchoolRoundsInput {
    /// School identifiers as received from the caller.
    pub school_ids: Vec<String>,
    /// When set, nothing is written.
    pub dry_run: bool,
}

/// Before/after values of one repaired school.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchoolFixDetail {
    /// School identifier.
    pub school_id: SchoolId,
    /// School display name.
    pub school_name: String,
    /// Status that triggered the repair.
    pub status: RoundAuditStatus,
    /// Whether the round was reset or preserved.
    pub reset_type: ResetType,
    /// Stored values before the repair.
    pub before: SchoolProgress,
    /// Values after the repair.
    pub after: SchoolProgress,
}

/// Per-school failure collected during a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchoolFixError {
    /// School identifier exactly as requested.
    pub school_id: String,
    /// Failure message.
    pub message: String,
}

/// Outcome of a repair request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixSchoolRoundsOutcome {
    /// Whether this was a dry run.
    pub dry_run: bool,
    /// Applied repairs, or planned repairs for a dry run.
    pub details: Vec<SchoolFixDetail>,
    /// Schools already logical.
    pub skipped: usize,
    /// Per-school failures.
    pub errors: Vec<SchoolFixError>,
}

impl FixSchoolRoundsOutcome {
    /// Returns the number of schools repaired, or that would be repaired.
    #[must_use]
    pub fn fixed(&self) -> usize {
        self.details.len()
    }
}

/// Progress change applied to one school during recalculation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressChange {
    /// School identifier.
    pub school_id: SchoolId,
    /// School display name.
    pub school_name: String,
    /// Stored percentage before recalculation.
    pub old_progress: i32,
    /// Stored percentage after recalculation.
    pub new_progress: i32,
    /// Whether the school moved to its next round.
    pub round_advanced: bool,
}

/// Outcome of a round progress recalculation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecalculationReport {
    /// Schools inspected.
    pub total: usize,
    /// Schools whose progression changed.
    pub updated: usize,
    /// Schools left unchanged.
    pub skipped: usize,
    /// Schools advanced to their next round.
    pub rounds_advanced: usize,
    /// Per-school changes.
    pub progress_changes: Vec<ProgressChange>,
    /// Per-school write failures.
    pub errors: Vec<SchoolFixError>,
}
