use super::*;

impl RoundAuditService {
    /// Collects, classifies and summarizes every school.
    pub async fn audit_school_rounds(&self, actor: &AdminIdentity) -> AppResult<RoundAuditReport> {
        self.require(actor, Permission::MigrationAuditRead).await?;

        let snapshots = self.repository.list_school_snapshots().await?;
        let mut schools: Vec<SchoolAuditResult> = snapshots
            .into_iter()
            .map(|snapshot| SchoolAuditResult::evaluate(snapshot, &self.rules))
            .collect();

        schools.sort_by(|left, right| {
            right
                .status
                .is_illogical()
                .cmp(&left.status.is_illogical())
                .then_with(|| left.name.cmp(&right.name))
        });

        let summary = AuditSummary::from_results(&schools);

        info!(
            subject = %actor.subject(),
            rule_set = self.rules.rule_set().as_str(),
            total_schools = summary.total_schools,
            illogical_schools = summary.illogical_schools,
            "school round audit completed"
        );

        Ok(RoundAuditReport { summary, schools })
    }
}
