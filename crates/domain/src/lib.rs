//! Domain entities and invariants for school round auditing.

#![forbid(unsafe_code)]

mod audit_summary;
mod evidence;
mod round_audit;
mod round_progress;
mod school;
mod security;

pub use audit_summary::{AuditSummary, IssueCounts, RoundBreakdown};
pub use evidence::{EvidenceRecord, EvidenceStatus};
pub use round_audit::{
    Classification, ClassificationRuleSet, ClassificationRules, RecommendedFix, ResetType,
    RoundAuditStatus, SchoolAuditResult, plan_fix,
};
pub use round_progress::{
    MAX_STAGE_REQUIREMENT, RecalculatedProgress, StageRequirements, StageTally,
    recalculate_round_progress,
};
pub use school::{EvidenceCounts, SchoolProgress, SchoolSnapshot, Stage, StageCompletion};
pub use security::{AuditAction, Permission};
