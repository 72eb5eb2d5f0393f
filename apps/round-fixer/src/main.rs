//! Operator CLI for the school round audit-and-repair endpoints.

#![forbid(unsafe_code)]

mod audit_client;
mod controller;
mod fixer_config;
mod http_audit_client;

use std::sync::Arc;

use clap::{Parser, Subcommand};
use pcs_core::AppError;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::audit_client::{AuditView, FixOutcomeView};
use crate::controller::RoundFixController;
use crate::fixer_config::FixerConfig;
use crate::http_audit_client::HttpRoundAuditClient;

#[derive(Parser, Debug)]
#[command(name = "pcs-round-fixer")]
#[command(about = "Audit and repair school round progress through the migration API")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Classify every school and print the summary.
    Audit,
    /// Plan repairs without writing anything.
    DryRun {
        /// School to repair. Defaults to every illogical school.
        #[arg(long = "school-id")]
        school_ids: Vec<String>,
    },
    /// Apply repairs and re-audit.
    Fix {
        /// School to repair. Defaults to every illogical school.
        #[arg(long = "school-id")]
        school_ids: Vec<String>,
    },
    /// Recompute stored progress from approved evidence.
    Recalculate,
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();
    let config = FixerConfig::load()?;
    let controller = RoundFixController::new(Arc::new(HttpRoundAuditClient::new(&config)?));

    info!(api_base_url = %config.api_base_url, "pcs-round-fixer started");

    match cli.command {
        Command::Audit => {
            let view = controller.run_audit().await?;
            report_audit(&view);
        }
        Command::DryRun { school_ids } => {
            let view = controller.run_audit().await?;
            let targets = resolve_targets(&view, school_ids);
            if targets.is_empty() {
                info!("no illogical schools to repair");
                return Ok(());
            }

            let outcome = controller.run_dry_run(targets).await?;
            report_fix(&outcome);
        }
        Command::Fix { school_ids } => {
            let view = controller.run_audit().await?;
            let targets = resolve_targets(&view, school_ids);
            if targets.is_empty() {
                info!("no illogical schools to repair");
                return Ok(());
            }

            let outcome = controller.run_fix(targets).await?;
            report_fix(&outcome);
            if let Some(view) = controller.view() {
                report_audit(&view);
            }
        }
        Command::Recalculate => {
            let report = controller.run_recalculate().await?;
            for change in &report.progress_changes {
                info!(
                    school = %change.school_name,
                    old_progress = change.old_progress,
                    new_progress = change.new_progress,
                    round_advanced = change.round_advanced,
                    "progress recalculated"
                );
            }
            for error in &report.errors {
                warn!(school_id = %error.school_id, message = %error.message, "recalculation failed");
            }
            info!(
                total = report.total,
                updated = report.updated,
                skipped = report.skipped,
                rounds_advanced = report.rounds_advanced,
                "recalculation finished"
            );
        }
    }

    Ok(())
}

fn resolve_targets(view: &AuditView, requested: Vec<String>) -> Vec<String> {
    if requested.is_empty() {
        view.illogical_school_ids()
    } else {
        requested
    }
}

fn report_audit(view: &AuditView) {
    for school in view.schools.iter().filter(|school| school.is_illogical()) {
        info!(
            school_id = %school.id,
            school = %school.name,
            country = school.country.as_deref().unwrap_or("-"),
            round = school.current_round,
            progress = school.progress_percentage,
            stage = %school.current_stage,
            evidence = school.total_evidence_count,
            status = %school.status,
            issue = school.issue.as_deref().unwrap_or_default(),
            reset_type = school
                .recommended_fix
                .as_ref()
                .map(|fix| fix.reset_type.as_str())
                .unwrap_or("-"),
            "illogical school"
        );
    }

    for round in &view.summary.rounds {
        info!(
            round = round.round,
            schools = round.schools,
            logical = round.logical,
            illogical = round.illogical,
            average_progress = round.average_progress,
            "round breakdown"
        );
    }

    info!(
        total_schools = view.summary.total_schools,
        logical_schools = view.summary.logical_schools,
        illogical_schools = view.summary.illogical_schools,
        excessive_progress = view.summary.issues.excessive_progress,
        round_mismatch = view.summary.issues.round_mismatch,
        no_evidence = view.summary.issues.no_evidence,
        "audit summary"
    );
}

fn report_fix(outcome: &FixOutcomeView) {
    for detail in &outcome.details {
        info!(
            school_id = %detail.school_id,
            school = %detail.school_name,
            status = %detail.status,
            reset_type = %detail.reset_type,
            round_before = detail.before.current_round,
            round_after = detail.after.current_round,
            progress_before = detail.before.progress_percentage,
            progress_after = detail.after.progress_percentage,
            "school repair"
        );
    }

    for error in &outcome.errors {
        warn!(school_id = %error.school_id, message = %error.message, "school repair failed");
    }

    info!(
        dry_run = outcome.dry_run,
        would_fix = outcome.would_fix.unwrap_or_default(),
        fixed = outcome.fixed.unwrap_or_default(),
        skipped = outcome.skipped,
        errors = outcome.errors.len(),
        "repair finished"
    );
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}
