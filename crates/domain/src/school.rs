use std::fmt::{Display, Formatter};
use std::str::FromStr;

use pcs_core::{AppError, SchoolId};
use serde::{Deserialize, Serialize};

/// Sequential phase of one program round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// First stage of a round.
    Inspire,
    /// Second stage of a round.
    Investigate,
    /// Final stage of a round.
    Act,
}

impl Stage {
    /// Every stage in program order.
    pub const ALL: [Self; 3] = [Self::Inspire, Self::Investigate, Self::Act];

    /// Returns the stage a fresh round starts in.
    #[must_use]
    pub fn first() -> Self {
        Self::Inspire
    }

    /// Returns a stable storage value for this stage.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Inspire => "inspire",
            Self::Investigate => "investigate",
            Self::Act => "act",
        }
    }
}

impl Display for Stage {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl FromStr for Stage {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "inspire" => Ok(Self::Inspire),
            "investigate" => Ok(Self::Investigate),
            "act" => Ok(Self::Act),
            _ => Err(AppError::Validation(format!(
                "unknown stage value '{value}'"
            ))),
        }
    }
}

/// Per-stage completion flags for the current round.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageCompletion {
    /// Inspire stage completed.
    pub inspire: bool,
    /// Investigate stage completed.
    pub investigate: bool,
    /// Act stage completed.
    pub act: bool,
}

impl StageCompletion {
    /// Returns flags with no stage completed.
    #[must_use]
    pub fn cleared() -> Self {
        Self::default()
    }

    /// Returns the completion flag for one stage.
    #[must_use]
    pub fn is_completed(&self, stage: Stage) -> bool {
        match stage {
            Stage::Inspire => self.inspire,
            Stage::Investigate => self.investigate,
            Stage::Act => self.act,
        }
    }

    /// Sets the completion flag for one stage.
    pub fn set(&mut self, stage: Stage, completed: bool) {
        match stage {
            Stage::Inspire => self.inspire = completed,
            Stage::Investigate => self.investigate = completed,
            Stage::Act => self.act = completed,
        }
    }

    /// Returns whether no stage is marked complete.
    #[must_use]
    pub fn is_cleared(&self) -> bool {
        !self.inspire && !self.investigate && !self.act
    }

    /// Returns whether every stage is marked complete.
    #[must_use]
    pub fn all_completed(&self) -> bool {
        self.inspire && self.investigate && self.act
    }

    /// Returns whether completed stages form a prefix of the stage order.
    #[must_use]
    pub fn is_sequential(&self) -> bool {
        let mut gap_seen = false;
        for stage in Stage::ALL {
            let completed = self.is_completed(stage);
            if completed && gap_seen {
                return false;
            }
            gap_seen |= !completed;
        }

        true
    }

    /// Returns the first stage that is not complete.
    #[must_use]
    pub fn first_incomplete(&self) -> Option<Stage> {
        Stage::ALL
            .into_iter()
            .find(|stage| !self.is_completed(*stage))
    }
}

/// Stored progression fields of one school.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchoolProgress {
    /// Round the school is currently working through.
    pub current_round: i32,
    /// Number of finished rounds.
    pub rounds_completed: i32,
    /// Stage completion flags within the current round.
    pub stages: StageCompletion,
    /// Stored progress percentage. Legacy records may exceed 100.
    pub progress_percentage: i32,
    /// Stage the school is currently in.
    pub current_stage: Stage,
}

impl SchoolProgress {
    /// Returns the progression of a school that just started round one.
    #[must_use]
    pub fn initial() -> Self {
        Self {
            current_round: 1,
            rounds_completed: 0,
            stages: StageCompletion::cleared(),
            progress_percentage: 0,
            current_stage: Stage::first(),
        }
    }

    /// Describes the first inconsistency between round and stage fields.
    #[must_use]
    pub fn stage_inconsistency(&self) -> Option<String> {
        if self.current_round < 1 {
            return Some(format!(
                "current round {} is below the first round",
                self.current_round
            ));
        }

        if !self.stages.is_sequential() {
            return Some(format!(
                "stage completion flags are out of order in round {} (inspire={}, investigate={}, act={})",
                self.current_round, self.stages.inspire, self.stages.investigate, self.stages.act
            ));
        }

        match self.stages.first_incomplete() {
            None => Some(format!(
                "all stages are complete but round {} was never advanced",
                self.current_round
            )),
            Some(expected) if self.current_stage > expected => Some(format!(
                "current stage '{}' is ahead of incomplete stage '{}'",
                self.current_stage, expected
            )),
            Some(_) => None,
        }
    }
}

/// Evidence counters attached to one school.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvidenceCounts {
    /// Evidence carried over from the prior data migration.
    pub legacy: u32,
    /// Evidence submitted through the current platform.
    pub new: u32,
}

impl EvidenceCounts {
    /// Creates evidence counters.
    #[must_use]
    pub fn new(legacy: u32, new: u32) -> Self {
        Self { legacy, new }
    }

    /// Returns legacy plus newly submitted evidence.
    #[must_use]
    pub fn total(&self) -> u32 {
        self.legacy.saturating_add(self.new)
    }
}

/// Collected state of one school for an audit run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchoolSnapshot {
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
}
