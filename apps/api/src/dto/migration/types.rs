use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Response of one school round audit run.
#[derive(Debug, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/round-audit-response.ts"
)]
pub struct RoundAuditResponse {
    pub summary: AuditSummaryResponse,
    pub schools: Vec<SchoolAuditResultResponse>,
}

/// Aggregate counts of one audit run.
#[derive(Debug, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/audit-summary-response.ts"
)]
pub struct AuditSummaryResponse {
    pub total_schools: usize,
    pub logical_schools: usize,
    pub illogical_schools: usize,
    pub issues: IssueCountsResponse,
    pub rounds: Vec<RoundBreakdownResponse>,
}

/// Illogical schools per issue type.
#[derive(Debug, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/issue-counts-response.ts"
)]
pub struct IssueCountsResponse {
    pub excessive_progress: usize,
    pub round_mismatch: usize,
    pub no_evidence: usize,
}

/// Per-round slice of an audit summary.
#[derive(Debug, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/round-breakdown-response.ts"
)]
pub struct RoundBreakdownResponse {
    pub round: i32,
    pub schools: usize,
    pub logical: usize,
    pub illogical: usize,
    pub average_progress: f64,
}

/// Audit row for one school.
#[derive(Debug, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/school-audit-result-response.ts"
)]
pub struct SchoolAuditResultResponse {
    pub id: String,
    pub name: String,
    pub country: Option<String>,
    pub current_round: i32,
    pub rounds_completed: i32,
    pub inspire_completed: bool,
    pub investigate_completed: bool,
    pub act_completed: bool,
    pub progress_percentage: i32,
    pub current_stage: String,
    pub legacy_evidence_count: u32,
    pub new_evidence_count: u32,
    pub total_evidence_count: u32,
    pub status: String,
    pub issue: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub recommended_fix: Option<RecommendedFixResponse>,
}

/// Target state recommended for an illogical school.
#[derive(Debug, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/recommended-fix-response.ts"
)]
pub struct RecommendedFixResponse {
    pub current_round: i32,
    pub progress_percentage: i32,
    pub current_stage: String,
    pub reset_type: String,
}

/// Incoming payload for school round repairs.
#[derive(Debug, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/fix-school-rounds-request.ts"
)]
pub struct FixSchoolRoundsRequest {
    pub school_ids: Vec<String>,
    #[serde(default)]
    pub dry_run: bool,
}

/// Outcome of a repair request.
///
/// A dry run reports `wouldFix`; a real run reports `fixed`.
#[derive(Debug, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/fix-school-rounds-response.ts"
)]
pub struct FixSchoolRoundsResponse {
    pub dry_run: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub would_fix: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub fixed: Option<usize>,
    pub skipped: usize,
    pub errors: Vec<SchoolFixErrorResponse>,
    pub details: Vec<SchoolFixDetailResponse>,
}

/// Per-school failure during a repair request.
#[derive(Debug, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/school-fix-error-response.ts"
)]
pub struct SchoolFixErrorResponse {
    pub school_id: String,
    pub message: String,
}

/// Before/after values of one repaired school.
#[derive(Debug, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/school-fix-detail-response.ts"
)]
pub struct SchoolFixDetailResponse {
    pub school_id: String,
    pub school_name: String,
    pub status: String,
    pub reset_type: String,
    pub before: ProgressSnapshotResponse,
    pub after: ProgressSnapshotResponse,
}

/// Progression fields shown in repair diffs.
#[derive(Debug, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/progress-snapshot-response.ts"
)]
pub struct ProgressSnapshotResponse {
    pub current_round: i32,
    pub rounds_completed: i32,
    pub progress_percentage: i32,
    pub current_stage: String,
    pub inspire_completed: bool,
    pub investigate_completed: bool,
    pub act_completed: bool,
}

/// Outcome of a round progress recalculation.
#[derive(Debug, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/recalculate-round-progress-response.ts"
)]
pub struct RecalculateRoundProgressResponse {
    pub total: usize,
    pub updated: usize,
    pub skipped: usize,
    pub rounds_advanced: usize,
    pub progress_changes: Vec<ProgressChangeResponse>,
    pub errors: Vec<SchoolFixErrorResponse>,
}

/// One school's recalculated progress.
#[derive(Debug, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/progress-change-response.ts"
)]
pub struct ProgressChangeResponse {
    pub school_id: String,
    pub school_name: String,
    pub old_progress: i32,
    pub new_progress: i32,
    pub round_advanced: bool,
}
