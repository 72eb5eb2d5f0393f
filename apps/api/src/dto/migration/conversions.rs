use pcs_application::{
    FixSchoolRoundsOutcome, ProgressChange, RecalculationReport, RoundAuditReport,
    SchoolFixDetail, SchoolFixError,
};
use pcs_domain::{
    AuditSummary, IssueCounts, RecommendedFix, RoundBreakdown, SchoolAuditResult, SchoolProgress,
};

use super::types::{
    AuditSummaryResponse, FixSchoolRoundsResponse, IssueCountsResponse, ProgressChangeResponse,
    ProgressSnapshotResponse, RecalculateRoundProgressResponse, RecommendedFixResponse,
    RoundAuditResponse, RoundBreakdownResponse, SchoolAuditResultResponse,
    SchoolFixDetailResponse, SchoolFixErrorResponse,
};

impl From<RoundAuditReport> for RoundAuditResponse {
    fn from(value: RoundAuditReport) -> Self {
        Self {
            summary: AuditSummaryResponse::from(value.summary),
            schools: value
                .schools
                .into_iter()
                .map(SchoolAuditResultResponse::from)
                .collect(),
        }
    }
}

impl From<AuditSummary> for AuditSummaryResponse {
    fn from(value: AuditSummary) -> Self {
        Self {
            total_schools: value.total_schools,
            logical_schools: value.logical_schools,
            illogical_schools: value.illogical_schools,
            issues: IssueCountsResponse::from(value.issues),
            rounds: value
                .rounds
                .into_iter()
                .map(RoundBreakdownResponse::from)
                .collect(),
        }
    }
}

impl From<IssueCounts> for IssueCountsResponse {
    fn from(value: IssueCounts) -> Self {
        Self {
            excessive_progress: value.excessive_progress,
            round_mismatch: value.round_mismatch,
            no_evidence: value.no_evidence,
        }
    }
}

impl From<RoundBreakdown> for RoundBreakdownResponse {
    fn from(value: RoundBreakdown) -> Self {
        Self {
            round: value.round,
            schools: value.schools,
            logical: value.logical,
            illogical: value.illogical,
            average_progress: value.average_progress,
        }
    }
}

impl From<SchoolAuditResult> for SchoolAuditResultResponse {
    fn from(value: SchoolAuditResult) -> Self {
        let total_evidence_count = value.total_evidence_count();
        let progress = value.progress;

        Self {
            id: value.school_id.to_string(),
            name: value.name,
            country: value.country,
            current_round: progress.current_round,
            rounds_completed: progress.rounds_completed,
            inspire_completed: progress.stages.inspire,
            investigate_completed: progress.stages.investigate,
            act_completed: progress.stages.act,
            progress_percentage: progress.progress_percentage,
            current_stage: progress.current_stage.as_str().to_owned(),
            legacy_evidence_count: value.evidence.legacy,
            new_evidence_count: value.evidence.new,
            total_evidence_count,
            status: value.status.as_str().to_owned(),
            issue: value.issue,
            recommended_fix: value.recommended_fix.map(RecommendedFixResponse::from),
        }
    }
}

impl From<RecommendedFix> for RecommendedFixResponse {
    fn from(value: RecommendedFix) -> Self {
        Self {
            current_round: value.current_round,
            progress_percentage: value.progress_percentage,
            current_stage: value.current_stage.as_str().to_owned(),
            reset_type: value.reset_type.as_str().to_owned(),
        }
    }
}

impl From<FixSchoolRoundsOutcome> for FixSchoolRoundsResponse {
    fn from(value: FixSchoolRoundsOutcome) -> Self {
        let count = value.fixed();
        let (would_fix, fixed) = if value.dry_run {
            (Some(count), None)
        } else {
            (None, Some(count))
        };

        Self {
            dry_run: value.dry_run,
            would_fix,
            fixed,
            skipped: value.skipped,
            errors: value
                .errors
                .into_iter()
                .map(SchoolFixErrorResponse::from)
                .collect(),
            details: value
                .details
                .into_iter()
                .map(SchoolFixDetailResponse::from)
                .collect(),
        }
    }
}

impl From<SchoolFixError> for SchoolFixErrorResponse {
    fn from(value: SchoolFixError) -> Self {
        Self {
            school_id: value.school_id,
            message: value.message,
        }
    }
}

impl From<SchoolFixDetail> for SchoolFixDetailResponse {
    fn from(value: SchoolFixDetail) -> Self {
        Self {
            school_id: value.school_id.to_string(),
            school_name: value.school_name,
            status: value.status.as_str().to_owned(),
            reset_type: value.reset_type.as_str().to_owned(),
            before: ProgressSnapshotResponse::from(value.before),
            after: ProgressSnapshotResponse::from(value.after),
        }
    }
}

impl From<SchoolProgress> for ProgressSnapshotResponse {
    fn from(value: SchoolProgress) -> Self {
        Self {
            current_round: value.current_round,
            rounds_completed: value.rounds_completed,
            progress_percentage: value.progress_percentage,
            current_stage: value.current_stage.as_str().to_owned(),
            inspire_completed: value.stages.inspire,
            investigate_completed: value.stages.investigate,
            act_completed: value.stages.act,
        }
    }
}

impl From<RecalculationReport> for RecalculateRoundProgressResponse {
    fn from(value: RecalculationReport) -> Self {
        Self {
            total: value.total,
            updated: value.updated,
            skipped: value.skipped,
            rounds_advanced: value.rounds_advanced,
            progress_changes: value
                .progress_changes
                .into_iter()
                .map(ProgressChangeResponse::from)
                .collect(),
            errors: value
                .errors
                .into_iter()
                .map(SchoolFixErrorResponse::from)
                .collect(),
        }
    }
}

impl From<ProgressChange> for ProgressChangeResponse {
    fn from(value: ProgressChange) -> Self {
        Self {
            school_id: value.school_id.to_string(),
            school_name: value.school_name,
            old_progress: value.old_progress,
            new_progress: value.new_progress,
            round_advanced: value.round_advanced,
        }
    }
}
