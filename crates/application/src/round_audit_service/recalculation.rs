use super::*;

impl RoundAuditService {
    /// Recomputes stored round progress for every school from approved evidence.
    pub async fn recalculate_round_progress(
        &self,
        actor: &AdminIdentity,
    ) -> AppResult<RecalculationReport> {
        self.require(actor, Permission::MigrationRepairApply).await?;

        let inputs = self.repository.list_round_progress_inputs().await?;
        let mut report = RecalculationReport {
            total: inputs.len(),
            updated: 0,
            skipped: 0,
            rounds_advanced: 0,
            progress_changes: Vec::new(),
            errors: Vec::new(),
        };

        for input in inputs {
            let recalculated = recalculate_round_progress(
                &input.progress,
                input.approved_in_round,
                &self.stage_requirements,
            );

            if recalculated.progress == input.progress {
                report.skipped += 1;
                continue;
            }

            if let Err(error) = self
                .repository
                .update_school_progress(input.school_id, &recalculated.progress)
                .await
            {
                warn!(
                    subject = %actor.subject(),
                    school_id = %input.school_id,
                    error = %error,
                    "round progress update failed"
                );
                report.errors.push(SchoolFixError {
                    school_id: input.school_id.to_string(),
                    message: error.to_string(),
                });
                continue;
            }

            report.updated += 1;
            if recalculated.round_advanced {
                report.rounds_advanced += 1;
            }
            report.progress_changes.push(ProgressChange {
                school_id: input.school_id,
                school_name: input.school_name,
                old_progress: input.progress.progress_percentage,
                new_progress: recalculated.progress.progress_percentage,
                round_advanced: recalculated.round_advanced,
            });
        }

        self.record_audit_event(
            actor,
            AuditEvent {
                subject: actor.subject().to_owned(),
                action: AuditAction::RoundProgressRecalculated,
                resource_type: "school_rounds".to_owned(),
                resource_id: "all".to_owned(),
                detail: Some(format!(
                    "recalculated {} school(s): {} updated, {} advanced, {} unchanged, {} error(s)",
                    report.total,
                    report.updated,
                    report.rounds_advanced,
                    report.skipped,
                    report.errors.len()
                )),
            },
        )
        .await;

        info!(
            subject = %actor.subject(),
            total = report.total,
            updated = report.updated,
            rounds_advanced = report.rounds_advanced,
            "round progress recalculated"
        );

        Ok(report)
    }
}
