use std::collections::HashSet;
use std::sync::Arc;

use pcs_core::{AdminIdentity, AppError, AppResult, SchoolId};
use pcs_domain::{
    AuditAction, AuditSummary, ClassificationRuleSet, ClassificationRules, Permission,
    SchoolAuditResult, StageRequirements, recalculate_round_progress,
};
use tracing::{info, warn};

use crate::round_audit_ports::{
    FixSchoolRoundsInput, FixSchoolRoundsOutcome, ProgressChange, RecalculationReport,
    RoundAuditReport, SchoolFixDetail, SchoolFixError, SchoolRoundRepository,
};
use crate::{AuditEvent, AuditRepository, AuthorizationService};

mod audit;
mod recalculation;
mod repair;

/// Application service for the school round audit-and-repair tool.
#[derive(Clone)]
pub struct RoundAuditService {
    authorization_service: AuthorizationService,
    repository: Arc<dyn SchoolRoundRepository>,
    audit_repository: Arc<dyn AuditRepository>,
    rules: ClassificationRules,
    stage_requirements: StageRequirements,
}

impl RoundAuditService {
    /// Creates a round audit service.
    #[must_use]
    pub fn new(
        authorization_service: AuthorizationService,
        repository: Arc<dyn SchoolRoundRepository>,
        audit_repository: Arc<dyn AuditRepository>,
        rules: ClassificationRules,
    ) -> Self {
        Self {
            authorization_service,
            repository,
            audit_repository,
            rules,
            stage_requirements: StageRequirements::default(),
        }
    }

    /// Overrides the approved evidence required per stage during recalculation.
    #[must_use]
    pub fn with_stage_requirements(mut self, stage_requirements: StageRequirements) -> Self {
        self.stage_requirements = stage_requirements;
        self
    }

    /// Classification rule set used by audits and repairs.
    #[must_use]
    pub fn rule_set(&self) -> ClassificationRuleSet {
        self.rules.rule_set()
    }

    async fn require(&self, actor: &AdminIdentity, permission: Permission) -> AppResult<()> {
        self.authorization_service
            .require_permission(actor.subject(), permission)
            .await
    }

    /// Appends an audit event after writes have landed. A failed append is
    /// logged and does not discard the outcome of those writes.
    async fn record_audit_event(&self, actor: &AdminIdentity, event: AuditEvent) {
        let action = event.action;
        if let Err(error) = self.audit_repository.append_event(event).await {
            warn!(
                subject = %actor.subject(),
                action = action.as_str(),
                error = %error,
                "failed to append audit event"
            );
        }
    }
}
