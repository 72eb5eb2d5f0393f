use std::str::FromStr;

use pcs_core::AppError;
use serde::{Deserialize, Serialize};

/// Permissions enforced by application policy checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    /// Allows running school round audits and dry runs.
    MigrationAuditRead,
    /// Allows persisting round repairs and progress recalculations.
    MigrationRepairApply,
}

impl Permission {
    /// Returns a stable storage value for this permission.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MigrationAuditRead => "migration.audit.read",
            Self::MigrationRepairApply => "migration.repair.apply",
        }
    }

    /// Returns all known permissions.
    #[must_use]
    pub fn all() -> &'static [Self] {
        const ALL: &[Permission] = &[
            Permission::MigrationAuditRead,
            Permission::MigrationRepairApply,
        ];

        ALL
    }
}

impl FromStr for Permission {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "migration.audit.read" => Ok(Self::MigrationAuditRead),
            "migration.repair.apply" => Ok(Self::MigrationRepairApply),
            _ => Err(AppError::Validation(format!(
                "unknown permission value '{value}'"
            ))),
        }
    }
}

/// Stable audit actions emitted by application use-cases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    /// Emitted when a non-dry-run school round repair completes.
    SchoolRoundsFixed,
    /// Emitted when round progress is recalculated.
    RoundProgressRecalculated,
}

impl AuditAction {
    /// Returns a stable storage value for this action.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SchoolRoundsFixed => "migration.school_rounds.fixed",
            Self::RoundProgressRecalculated => "migration.round_progress.recalculated",
        }
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::Permission;

    #[test]
    fn permission_roundtrip_storage_value() {
        for permission in Permission::all() {
            let restored = Permission::from_str(permission.as_str());
            assert!(matches!(restored, Ok(value) if value == *permission));
        }
    }

    #[test]
    fn unknown_permission_is_rejected() {
        let parsed = Permission::from_str("migration.audit.delete");
        assert!(parsed.is_err());
    }
}
