//! Round/progress classification and repair planning.
//!
//! Classification is a pure function of a school's stored progression and its
//! evidence counters. Boundary values resolve toward the illogical branch: a
//! stored progress of exactly 100% is already flagged.

use std::str::FromStr;

use pcs_core::{AppError, SchoolId};
use serde::{Deserialize, Serialize};

use crate::school::{EvidenceCounts, SchoolProgress, SchoolSnapshot, Stage, StageCompletion};

/// Stored progress at or above this value is flagged.
const EXCESSIVE_PROGRESS_THRESHOLD: i32 = 100;

/// Schools at or beyond this round must have supporting evidence.
const EVIDENCE_REQUIRED_FROM_ROUND: i32 = 2;

/// Classification assigned to one school.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundAuditStatus {
    /// Round, stage and progress fields agree with each other.
    Logical,
    /// Stored progress is at or above 100%.
    IllogicalExcessiveProgress,
    /// Round and stage completion fields contradict each other.
    IllogicalRoundMismatch,
    /// School advanced past round one without any evidence.
    IllogicalNoEvidence,
}

impl RoundAuditStatus {
    /// Returns a stable transport value for this status.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Logical => "logical",
            Self::IllogicalExcessiveProgress => "illogical_excessive_progress",
            Self::IllogicalRoundMismatch => "illogical_round_mismatch",
            Self::IllogicalNoEvidence => "illogical_no_evidence",
        }
    }

    /// Returns whether the status needs a repair.
    #[must_use]
    pub fn is_illogical(&self) -> bool {
        !matches!(self, Self::Logical)
    }
}

/// Rule set used to classify schools.
///
/// Two generations of the audit tool disagreed on evidence counting. The
/// current rules count legacy plus new evidence and flag schools with none.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassificationRuleSet {
    /// Legacy and new evidence count; the no-evidence class is active.
    #[default]
    Current,
    /// Only legacy evidence counts; the no-evidence class does not exist.
    LegacyOnly,
}

impl ClassificationRuleSet {
    /// Returns a stable configuration value for this rule set.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Current => "current",
            Self::LegacyOnly => "legacy_only",
        }
    }

    fn counted_evidence(self, evidence: EvidenceCounts) -> u32 {
        match self {
            Self::Current => evidence.total(),
            Self::LegacyOnly => evidence.legacy,
        }
    }

    fn flags_missing_evidence(self) -> bool {
        matches!(self, Self::Current)
    }
}

impl FromStr for ClassificationRuleSet {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "current" => Ok(Self::Current),
            "legacy_only" => Ok(Self::LegacyOnly),
            _ => Err(AppError::Validation(format!(
                "unknown classification rule set '{value}'"
            ))),
        }
    }
}

/// Outcome of classifying one school.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    /// Assigned status.
    pub status: RoundAuditStatus,
    /// Human-readable description of the problem, absent for logical schools.
    pub issue: Option<String>,
}

/// Classifier configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClassificationRules {
    rule_set: ClassificationRuleSet,
}

impl ClassificationRules {
    /// Creates classifier rules for the given rule set.
    #[must_use]
    pub fn new(rule_set: ClassificationRuleSet) -> Self {
        Self { rule_set }
    }

    /// Returns the configured rule set.
    #[must_use]
    pub fn rule_set(&self) -> ClassificationRuleSet {
        self.rule_set
    }

    /// Assigns exactly one status to a school snapshot.
    #[must_use]
    pub fn classify(&self, progress: &SchoolProgress, evidence: EvidenceCounts) -> Classification {
        let counted_evidence = self.rule_set.counted_evidence(evidence);

        if self.rule_set.flags_missing_evidence()
            && progress.current_round >= EVIDENCE_REQUIRED_FROM_ROUND
            && counted_evidence == 0
        {
            return Classification {
                status: RoundAuditStatus::IllogicalNoEvidence,
                issue: Some(format!(
                    "school is in round {} without any submitted evidence",
                    progress.current_round
                )),
            };
        }

        if progress.progress_percentage >= EXCESSIVE_PROGRESS_THRESHOLD {
            return Classification {
                status: RoundAuditStatus::IllogicalExcessiveProgress,
                issue: Some(format!(
                    "progress is {}% in round {} ({} evidence items)",
                    progress.progress_percentage, progress.current_round, counted_evidence
                )),
            };
        }

        if let Some(issue) = progress.stage_inconsistency() {
            return Classification {
                status: RoundAuditStatus::IllogicalRoundMismatch,
                issue: Some(issue),
            };
        }

        Classification {
            status: RoundAuditStatus::Logical,
            issue: None,
        }
    }
}

/// Whether a repair keeps the school's round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResetType {
    /// Round is reset to one.
    Complete,
    /// Round is preserved; only progress and stages reset.
    Preserved,
}

impl ResetType {
    /// Returns a stable transport value for this reset type.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Complete => "complete",
            Self::Preserved => "preserved",
        }
    }
}

/// Corrected target state recommended for an illogical school.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendedFix {
    /// Target round.
    pub current_round: i32,
    /// Target progress percentage.
    pub progress_percentage: i32,
    /// Target stage.
    pub current_stage: Stage,
    /// Whether the round was reset or preserved.
    pub reset_type: ResetType,
}

impl RecommendedFix {
    /// Returns the corrected progression for the school.
    ///
    /// Stage flags are cleared and `rounds_completed` is kept even when the
    /// round itself resets.
    #[must_use]
    pub fn apply(&self, progress: &SchoolProgress) -> SchoolProgress {
        SchoolProgress {
            current_round: self.current_round,
            rounds_completed: progress.rounds_completed,
            stages: StageCompletion::cleared(),
            progress_percentage: self.progress_percentage,
            current_stage: self.current_stage,
        }
    }
}

/// Plans the repair for a classified school. Returns `None` for logical schools.
#[must_use]
pub fn plan_fix(status: RoundAuditStatus, progress: &SchoolProgress) -> Option<RecommendedFix> {
    let (current_round, reset_type) = match status {
        RoundAuditStatus::Logical => return None,
        RoundAuditStatus::IllogicalNoEvidence => (1, ResetType::Complete),
        RoundAuditStatus::IllogicalExcessiveProgress | RoundAuditStatus::IllogicalRoundMismatch
            if progress.current_round < 1 =>
        {
            (1, ResetType::Complete)
        }
        RoundAuditStatus::IllogicalExcessiveProgress | RoundAuditStatus::IllogicalRoundMismatch => {
            (progress.current_round, ResetType::Preserved)
        }
    };

    Some(RecommendedFix {
        current_round,
        progress_percentage: 0,
        current_stage: Stage::first(),
        reset_type,
    })
}

/// Transient audit view of one school.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchoolAuditResult {
    /// School identifier.
    pub school_id: SchoolId,
    /// School display name.
    pub name: String,
    /// Country, when recorded.
    pub country: Option<String>,
    /// Stored progression fields.
    pub progress: SchoolProgress,
    /// Evidence counters.
    pub evidence: EvidenceCounts,
    /// Assigned status.
    pub status: RoundAuditStatus,
    /// Human-readable issue, absent for logical schools.
    pub issue: Option<String>,
    /// Planned repair, present exactly when the status is illogical.
    pub recommended_fix: Option<RecommendedFix>,
}

impl SchoolAuditResult {
    /// Classifies a snapshot and plans its repair.
    #[must_use]
    pub fn evaluate(snapshot: SchoolSnapshot, rules: &ClassificationRules) -> Self {
        let Classification { status, issue } = rules.classify(&snapshot.progress, snapshot.evidence);
        let recommended_fix = plan_fix(status, &snapshot.progress);

        Self {
            school_id: snapshot.school_id,
            name: snapshot.name,
            country: snapshot.country,
            progress: snapshot.progress,
            evidence: snapshot.evidence,
            status,
            issue,
            recommended_fix,
        }
    }

    /// Returns legacy plus new evidence.
    #[must_use]
    pub fn total_evidence_count(&self) -> u32 {
        self.evidence.total()
    }
}
