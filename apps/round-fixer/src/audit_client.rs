use async_trait::async_trait;
use pcs_core::AppResult;
use serde::Deserialize;

/// Transport for the three migration endpoints.
#[async_trait]
pub trait RoundAuditClient: Send + Sync {
    /// Runs a full audit.
    async fn audit(&self) -> AppResult<AuditView>;

    /// Repairs or plans repairs for the given schools.
    async fn fix(&self, school_ids: Vec<String>, dry_run: bool) -> AppResult<FixOutcomeView>;

    /// Recomputes stored round progress from approved evidence.
    async fn recalculate(&self) -> AppResult<RecalculationView>;
}

/// Audit response as rendered by the console.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditView {
    pub summary: AuditSummaryView,
    pub schools: Vec<SchoolAuditRow>,
}

impl AuditView {
    /// Identifiers of every school the audit flagged.
    #[must_use]
    pub fn illogical_school_ids(&self) -> Vec<String> {
        self.schools
            .iter()
            .filter(|school| school.is_illogical())
            .map(|school| school.id.clone())
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditSummaryView {
    pub total_schools: usize,
    pub logical_schools: usize,
    pub illogical_schools: usize,
    pub issues: IssueCountsView,
    #[serde(default)]
    pub rounds: Vec<RoundBreakdownView>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueCountsView {
    pub excessive_progress: usize,
    pub round_mismatch: usize,
    pub no_evidence: usize,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundBreakdownView {
    pub round: i32,
    pub schools: usize,
    pub logical: usize,
    pub illogical: usize,
    pub average_progress: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchoolAuditRow {
    pub id: String,
    pub name: String,
    pub country: Option<String>,
    pub current_round: i32,
    pub progress_percentage: i32,
    pub current_stage: String,
    pub total_evidence_count: u32,
    pub status: String,
    pub issue: Option<String>,
    #[serde(default)]
    pub recommended_fix: Option<RecommendedFixView>,
}

impl SchoolAuditRow {
    #[must_use]
    pub fn is_illogical(&self) -> bool {
        self.status != LOGICAL_STATUS
    }
}

pub(crate) const LOGICAL_STATUS: &str = "logical";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendedFixView {
    pub current_round: i32,
    pub progress_percentage: i32,
    pub current_stage: String,
    pub reset_type: String,
}

/// Repair response. Dry runs carry `would_fix`, real runs carry `fixed`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FixOutcomeView {
    pub dry_run: bool,
    #[serde(default)]
    pub would_fix: Option<usize>,
    #[serde(default)]
    pub fixed: Option<usize>,
    #[serde(default)]
    pub skipped: usize,
    #[serde(default)]
    pub errors: Vec<FixErrorView>,
    #[serde(default)]
    pub details: Vec<FixDetailView>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FixErrorView {
    pub school_id: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FixDetailView {
    pub school_id: String,
    pub school_name: String,
    pub status: String,
    pub reset_type: String,
    pub before: ProgressView,
    pub after: ProgressView,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressView {
    pub current_round: i32,
    pub progress_percentage: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecalculationView {
    pub total: usize,
    pub updated: usize,
    pub skipped: usize,
    #[serde(default)]
    pub rounds_advanced: usize,
    #[serde(default)]
    pub progress_changes: Vec<ProgressChangeView>,
    #[serde(default)]
    pub errors: Vec<FixErrorView>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressChangeView {
    pub school_name: String,
    pub old_progress: i32,
    pub new_progress: i32,
    #[serde(default)]
    pub round_advanced: bool,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{AuditView, FixOutcomeView};

    #[test]
    fn audit_view_reads_camel_case_payload() {
        let payload = json!({
            "summary": {
                "totalSchools": 2,
                "logicalSchools": 1,
                "illogicalSchools": 1,
                "issues": { "excessiveProgress": 0, "roundMismatch": 0, "noEvidence": 1 },
                "rounds": []
            },
            "schools": [
                {
                    "id": "a",
                    "name": "Acorn",
                    "country": null,
                    "currentRound": 3,
                    "progressPercentage": 0,
                    "currentStage": "inspire",
                    "totalEvidenceCount": 0,
                    "status": "illogical_no_evidence",
                    "issue": "no evidence",
                    "recommendedFix": {
                        "currentRound": 1,
                        "progressPercentage": 0,
                        "currentStage": "inspire",
                        "resetType": "complete"
                    }
                },
                {
                    "id": "b",
                    "name": "Birch",
                    "country": "Wales",
                    "currentRound": 1,
                    "progressPercentage": 33,
                    "currentStage": "investigate",
                    "totalEvidenceCount": 1,
                    "status": "logical",
                    "issue": null
                }
            ]
        });

        let parsed = serde_json::from_value::<AuditView>(payload);
        let Ok(view) = parsed else {
            panic!("audit payload should parse");
        };

        assert_eq!(view.illogical_school_ids(), vec!["a".to_owned()]);
        assert!(view.schools[1].recommended_fix.is_none());
    }

    #[test]
    fn fix_outcome_tolerates_missing_optional_fields() {
        let parsed = serde_json::from_value::<FixOutcomeView>(json!({
            "dryRun": true,
            "wouldFix": 4
        }));

        assert!(matches!(
            parsed,
            Ok(outcome) if outcome.would_fix == Some(4) && outcome.fixed.is_none() && outcome.errors.is_empty()
        ));
    }
}
