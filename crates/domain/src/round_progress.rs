//! Round progress recalculation from approved evidence.

use pcs_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};

use crate::school::{SchoolProgress, Stage, StageCompletion};

/// Per-stage counter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageTally {
    /// Count for the inspire stage.
    pub inspire: u32,
    /// Count for the investigate stage.
    pub investigate: u32,
    /// Count for the act stage.
    pub act: u32,
}

impl StageTally {
    /// Returns the count for one stage.
    #[must_use]
    pub fn get(&self, stage: Stage) -> u32 {
        match stage {
            Stage::Inspire => self.inspire,
            Stage::Investigate => self.investigate,
            Stage::Act => self.act,
        }
    }
}

/// Largest approved evidence count a single stage may require.
pub const MAX_STAGE_REQUIREMENT: u32 = 1_000;

/// Approved evidence needed to complete each stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageRequirements(StageTally);

impl StageRequirements {
    /// Creates validated stage requirements.
    ///
    /// Every stage needs between one and [`MAX_STAGE_REQUIREMENT`] items.
    pub fn new(inspire: u32, investigate: u32, act: u32) -> AppResult<Self> {
        if inspire == 0 || investigate == 0 || act == 0 {
            return Err(AppError::Validation(
                "every stage must require at least one approved evidence item".to_owned(),
            ));
        }

        if [inspire, investigate, act]
            .into_iter()
            .any(|required| required > MAX_STAGE_REQUIREMENT)
        {
            return Err(AppError::Validation(format!(
                "a stage may require at most {MAX_STAGE_REQUIREMENT} approved evidence items"
            )));
        }

        Ok(Self(StageTally {
            inspire,
            investigate,
            act,
        }))
    }

    /// Returns the requirement for one stage.
    #[must_use]
    pub fn get(&self, stage: Stage) -> u32 {
        self.0.get(stage)
    }

    fn total(&self) -> u32 {
        Stage::ALL.into_iter().map(|stage| self.get(stage)).sum()
    }
}

impl Default for StageRequirements {
    fn default() -> Self {
        Self(StageTally {
            inspire: 1,
            investigate: 1,
            act: 1,
        })
    }
}

/// Result of recalculating one school.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecalculatedProgress {
    /// Recomputed progression.
    pub progress: SchoolProgress,
    /// Whether the school finished its round and moved to the next one.
    pub round_advanced: bool,
}

/// Recomputes stage flags and progress from approved evidence in the current round.
///
/// Stages complete in order. A fully satisfied round advances the school, so
/// the stored percentage always stays below 100.
#[must_use]
pub fn recalculate_round_progress(
    current: &SchoolProgress,
    approved_in_round: StageTally,
    requirements: &StageRequirements,
) -> RecalculatedProgress {
    let mut stages = StageCompletion::cleared();
    let mut satisfied = 0_u32;
    let mut prefix_complete = true;

    for stage in Stage::ALL {
        let required = requirements.get(stage);
        let approved = approved_in_round.get(stage).min(required);
        satisfied += approved;

        if prefix_complete && approved >= required {
            stages.set(stage, true);
        } else {
            prefix_complete = false;
        }
    }

    if stages.all_completed() {
        return RecalculatedProgress {
            progress: SchoolProgress {
                current_round: current.current_round.max(1) + 1,
                rounds_completed: current.rounds_completed + 1,
                stages: StageCompletion::cleared(),
                progress_percentage: 0,
                current_stage: Stage::first(),
            },
            round_advanced: true,
        };
    }

    let percentage = satisfied.saturating_mul(100) / requirements.total();

    RecalculatedProgress {
        progress: SchoolProgress {
            current_round: current.current_round.max(1),
            rounds_completed: current.rounds_completed,
            stages,
            progress_percentage: i32::try_from(percentage).unwrap_or_default(),
            current_stage: stages.first_incomplete().unwrap_or(Stage::first()),
        },
        round_advanced: false,
    }
}
