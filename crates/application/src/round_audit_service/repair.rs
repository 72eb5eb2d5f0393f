use super::*;

impl RoundAuditService {
    /// Repairs the requested schools, or plans the repairs when `dry_run` is set.
    ///
    /// Every school is re-classified before it is touched. Schools that are
    /// already logical are skipped. A failure on one school is recorded and the
    /// batch continues.
    pub async fn fix_school_rounds(
        &self,
        actor: &AdminIdentity,
        input: FixSchoolRoundsInput,
    ) -> AppResult<FixSchoolRoundsOutcome> {
        let permission = if input.dry_run {
            Permission::MigrationAuditRead
        } else {
            Permission::MigrationRepairApply
        };
        self.require(actor, permission).await?;

        if input.school_ids.is_empty() {
            return Err(AppError::Validation(
                "at least one school id is required".to_owned(),
            ));
        }

        let mut outcome = FixSchoolRoundsOutcome {
            dry_run: input.dry_run,
            details: Vec::new(),
            skipped: 0,
            errors: Vec::new(),
        };
        let mut seen = HashSet::new();

        for requested_id in input.school_ids {
            let repaired = match SchoolId::parse(requested_id.as_str()) {
                Ok(school_id) if !seen.insert(school_id) => continue,
                Ok(school_id) => self.repair_school(school_id, input.dry_run).await,
                Err(error) => Err(error),
            };

            match repaired {
                Ok(Some(detail)) => outcome.details.push(detail),
                Ok(None) => outcome.skipped += 1,
                Err(error) => {
                    warn!(
                        subject = %actor.subject(),
                        school_id = %requested_id,
                        dry_run = input.dry_run,
                        error = %error,
                        "school round repair failed"
                    );
                    outcome.errors.push(SchoolFixError {
                        school_id: requested_id,
                        message: error.to_string(),
                    });
                }
            }
        }

        if !outcome.dry_run {
            self.record_audit_event(
                actor,
                AuditEvent {
                    subject: actor.subject().to_owned(),
                    action: AuditAction::SchoolRoundsFixed,
                    resource_type: "school_rounds".to_owned(),
                    resource_id: "batch".to_owned(),
                    detail: Some(format!(
                        "fixed {} school(s), skipped {}, {} error(s)",
                        outcome.fixed(),
                        outcome.skipped,
                        outcome.errors.len()
                    )),
                },
            )
            .await;
        }

        info!(
            subject = %actor.subject(),
            dry_run = outcome.dry_run,
            fixed = outcome.fixed(),
            skipped = outcome.skipped,
            errors = outcome.errors.len(),
            "school round repair finished"
        );

        Ok(outcome)
    }

    async fn repair_school(
        &self,
        school_id: SchoolId,
        dry_run: bool,
    ) -> AppResult<Option<SchoolFixDetail>> {
        let snapshot = self
            .repository
            .find_school_snapshot(school_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("school '{school_id}' does not exist")))?;

        let result = SchoolAuditResult::evaluate(snapshot, &self.rules);
        let Some(fix) = result.recommended_fix else {
            return Ok(None);
        };

        let after = fix.apply(&result.progress);
        if !dry_run {
            self.repository
                .update_school_progress(school_id, &after)
                .await?;
        }

        Ok(Some(SchoolFixDetail {
            school_id,
            school_name: result.name,
            status: result.status,
            reset_type: fix.reset_type,
            before: result.progress,
            after,
        }))
    }
}
