use std::collections::BTreeMap;

use crate::round_audit::{RoundAuditStatus, SchoolAuditResult};

/// Number of schools per illogical class.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IssueCounts {
    /// Schools with progress at or above 100%.
    pub excessive_progress: usize,
    /// Schools whose round and stage fields disagree.
    pub round_mismatch: usize,
    /// Schools past round one without evidence.
    pub no_evidence: usize,
}

/// Aggregate for all schools sharing one current round.
#[derive(Debug, Clone, PartialEq)]
pub struct RoundBreakdown {
    /// Current round value.
    pub round: i32,
    /// Schools in this round.
    pub schools: usize,
    /// Logical schools in this round.
    pub logical: usize,
    /// Illogical schools in this round.
    pub illogical: usize,
    /// Mean stored progress, rounded to one decimal.
    pub average_progress: f64,
}

/// Roll-up of one audit run.
#[derive(Debug, Clone, PartialEq)]
pub struct AuditSummary {
    /// Schools audited.
    pub total_schools: usize,
    /// Schools classified logical.
    pub logical_schools: usize,
    /// Schools classified illogical.
    pub illogical_schools: usize,
    /// Per-class counts.
    pub issues: IssueCounts,
    /// Per-round breakdown ordered by round.
    pub rounds: Vec<RoundBreakdown>,
}

#[derive(Default)]
struct RoundAccumulator {
    schools: usize,
    logical: usize,
    progress_sum: i64,
}

impl AuditSummary {
    /// Builds the summary for one set of audit results.
    #[must_use]
    pub fn from_results(results: &[SchoolAuditResult]) -> Self {
        let mut issues = IssueCounts::default();
        let mut rounds: BTreeMap<i32, RoundAccumulator> = BTreeMap::new();

        for result in results {
            match result.status {
                RoundAuditStatus::Logical => {}
                RoundAuditStatus::IllogicalExcessiveProgress => issues.excessive_progress += 1,
                RoundAuditStatus::IllogicalRoundMismatch => issues.round_mismatch += 1,
                RoundAuditStatus::IllogicalNoEvidence => issues.no_evidence += 1,
            }

            let accumulator = rounds.entry(result.progress.current_round).or_default();
            accumulator.schools += 1;
            accumulator.progress_sum += i64::from(result.progress.progress_percentage);
            if !result.status.is_illogical() {
                accumulator.logical += 1;
            }
        }

        let logical_schools = results
            .iter()
            .filter(|result| !result.status.is_illogical())
            .count();

        Self {
            total_schools: results.len(),
            logical_schools,
            illogical_schools: results.len() - logical_schools,
            issues,
            rounds: rounds
                .into_iter()
                .map(|(round, accumulator)| RoundBreakdown {
                    round,
                    schools: accumulator.schools,
                    logical: accumulator.logical,
                    illogical: accumulator.schools - accumulator.logical,
                    average_progress: average(accumulator.progress_sum, accumulator.schools),
                })
                .collect(),
        }
    }
}

fn average(sum: i64, count: usize) -> f64 {
    if count == 0 {
        return 0.0;
    }

    let mean = sum as f64 / count as f64;
    (mean * 10.0).round() / 10.0
}
