use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use pcs_core::{AppError, AppResult};
use tracing::{info, warn};

use crate::audit_client::{
    AuditView, FixOutcomeView, LOGICAL_STATUS, RecalculationView, RoundAuditClient,
    RoundBreakdownView, SchoolAuditRow,
};

/// Request currently in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerPhase {
    Idle,
    Auditing,
    Fixing,
}

#[derive(Debug)]
struct ControllerState {
    phase: ControllerPhase,
    view: Option<AuditView>,
}

/// Drives the audit, dry-run, fix and re-audit cycle for one operator.
///
/// Only one request runs at a time; a trigger while another is in flight is
/// rejected with a conflict.
pub struct RoundFixController {
    client: Arc<dyn RoundAuditClient>,
    state: Mutex<ControllerState>,
}

impl RoundFixController {
    #[must_use]
    pub fn new(client: Arc<dyn RoundAuditClient>) -> Self {
        Self {
            client,
            state: Mutex::new(ControllerState {
                phase: ControllerPhase::Idle,
                view: None,
            }),
        }
    }

    #[must_use]
    pub fn phase(&self) -> ControllerPhase {
        self.lock_state().phase
    }

    /// Returns the last audit view, including any speculative repair.
    #[must_use]
    pub fn view(&self) -> Option<AuditView> {
        self.lock_state().view.clone()
    }

    pub async fn run_audit(&self) -> AppResult<AuditView> {
        self.begin(ControllerPhase::Auditing)?;
        let result = self.refresh_view().await;
        self.finish();
        result
    }

    pub async fn run_dry_run(&self, school_ids: Vec<String>) -> AppResult<FixOutcomeView> {
        self.begin(ControllerPhase::Fixing)?;
        let result = self.client.fix(school_ids, true).await;
        self.finish();
        result
    }

    /// Applies repairs with an optimistic view update.
    ///
    /// The cached view marks the targets logical before the request is sent.
    /// A failed request restores the previous view. Either way the audit runs
    /// again afterwards so the cached view reflects the server.
    pub async fn run_fix(&self, school_ids: Vec<String>) -> AppResult<FixOutcomeView> {
        self.begin(ControllerPhase::Fixing)?;

        let snapshot = {
            let mut state = self.lock_state();
            let snapshot = state.view.clone();
            if let Some(view) = state.view.as_mut() {
                mark_schools_logical(view, &school_ids);
            }
            snapshot
        };

        let result = self.client.fix(school_ids, false).await;
        if let Err(error) = &result {
            warn!(error = %error, "school round repair failed, restoring previous audit view");
            self.lock_state().view = snapshot;
        }

        self.lock_state().phase = ControllerPhase::Auditing;
        if let Err(error) = self.refresh_view().await {
            warn!(error = %error, "re-audit after repair failed");
        }

        self.finish();
        result
    }

    pub async fn run_recalculate(&self) -> AppResult<RecalculationView> {
        self.begin(ControllerPhase::Fixing)?;
        let result = self.client.recalculate().await;
        self.finish();
        result
    }

    async fn refresh_view(&self) -> AppResult<AuditView> {
        let view = self.client.audit().await?;
        info!(
            total_schools = view.summary.total_schools,
            illogical_schools = view.summary.illogical_schools,
            "audit view refreshed"
        );
        self.lock_state().view = Some(view.clone());
        Ok(view)
    }

    fn begin(&self, phase: ControllerPhase) -> AppResult<()> {
        let mut state = self.lock_state();
        if state.phase != ControllerPhase::Idle {
            return Err(AppError::Conflict(format!(
                "another request is in flight ({:?})",
                state.phase
            )));
        }

        state.phase = phase;
        Ok(())
    }

    fn finish(&self) {
        self.lock_state().phase = ControllerPhase::Idle;
    }

    fn lock_state(&self) -> MutexGuard<'_, ControllerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn mark_schools_logical(view: &mut AuditView, school_ids: &[String]) {
    let mut changed = false;
    for school in view
        .schools
        .iter_mut()
        .filter(|school| school.is_illogical() && school_ids.contains(&school.id))
    {
        let issues = &mut view.summary.issues;
        match school.status.as_str() {
            "illogical_excessive_progress" => {
                issues.excessive_progress = issues.excessive_progress.saturating_sub(1);
            }
            "illogical_round_mismatch" => {
                issues.round_mismatch = issues.round_mismatch.saturating_sub(1);
            }
            "illogical_no_evidence" => {
                issues.no_evidence = issues.no_evidence.saturating_sub(1);
            }
            _ => {}
        }

        if let Some(fix) = school.recommended_fix.take() {
            school.current_round = fix.current_round;
            school.progress_percentage = fix.progress_percentage;
            school.current_stage = fix.current_stage;
        }
        school.status = LOGICAL_STATUS.to_owned();
        school.issue = None;

        view.summary.illogical_schools = view.summary.illogical_schools.saturating_sub(1);
        view.summary.logical_schools += 1;
        changed = true;
    }

    // Repaired schools may have moved round.
    if changed {
        view.summary.rounds = round_breakdown(&view.schools);
    }
}

fn round_breakdown(schools: &[SchoolAuditRow]) -> Vec<RoundBreakdownView> {
    let mut by_round: BTreeMap<i32, (usize, usize, i64)> = BTreeMap::new();
    for school in schools {
        let entry = by_round.entry(school.current_round).or_default();
        entry.0 += 1;
        if !school.is_illogical() {
            entry.1 += 1;
        }
        entry.2 += i64::from(school.progress_percentage);
    }

    by_round
        .into_iter()
        .map(|(round, (count, logical, progress_sum))| RoundBreakdownView {
            round,
            schools: count,
            logical,
            illogical: count - logical,
            average_progress: ((progress_sum as f64 / count as f64) * 10.0).round() / 10.0,
        })
        .collect()
}
