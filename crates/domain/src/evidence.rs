use std::str::FromStr;

use pcs_core::AppError;
use serde::{Deserialize, Serialize};

use crate::school::Stage;

/// Review state of one evidence submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvidenceStatus {
    /// Submitted and awaiting review.
    Pending,
    /// Accepted by a reviewer.
    Approved,
    /// Declined by a reviewer.
    Rejected,
}

impl EvidenceStatus {
    /// Returns a stable storage value for this status.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }
}

impl FromStr for EvidenceStatus {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            _ => Err(AppError::Validation(format!(
                "unknown evidence status '{value}'"
            ))),
        }
    }
}

/// Evidence submitted through the current platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvidenceRecord {
    /// Stage the evidence supports.
    pub stage: Stage,
    /// Round the evidence was submitted in.
    pub round: i32,
    /// Review state.
    pub status: EvidenceStatus,
}

impl EvidenceRecord {
    /// Returns whether the submission counts as supporting evidence.
    ///
    /// Rejected submissions never count.
    #[must_use]
    pub fn is_supporting(&self) -> bool {
        !matches!(self.status, EvidenceStatus::Rejected)
    }

    /// Returns whether the submission is approved evidence for the given round.
    #[must_use]
    pub fn is_approved_in(&self, round: i32) -> bool {
        self.status == EvidenceStatus::Approved && self.round == round
    }
}
