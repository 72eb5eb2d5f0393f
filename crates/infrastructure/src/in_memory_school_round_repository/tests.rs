use pcs_application::SchoolRoundRepository;
use pcs_core::{AppError, SchoolId};
use pcs_domain::{EvidenceRecord, EvidenceStatus, SchoolProgress, Stage};

use super::InMemorySchoolRoundRepository;

fn evidence(stage: Stage, round: i32, status: EvidenceStatus) -> EvidenceRecord {
    EvidenceRecord {
        stage,
        round,
        status,
    }
}

#[tokio::test]
async fn snapshots_count_only_supporting_evidence_and_sort_by_name() {
    let repository = InMemorySchoolRoundRepository::new();
    let zephyr = SchoolId::new();
    let acorn = SchoolId::new();
    repository
        .insert_school(zephyr, "Zephyr Primary", None, SchoolProgress::initial(), 0)
        .await;
    repository
        .insert_school(
            acorn,
            "Acorn Academy",
            Some("Ireland".to_owned()),
            SchoolProgress::initial(),
            4,
        )
        .await;

    for status in [
        EvidenceStatus::Pending,
        EvidenceStatus::Approved,
        EvidenceStatus::Rejected,
    ] {
        let added = repository
            .add_evidence(acorn, evidence(Stage::Inspire, 1, status))
            .await;
        assert!(added.is_ok());
    }

    let listed = repository.list_school_snapshots().await;
    let Ok(snapshots) = listed else {
        panic!("listing snapshots should succeed");
    };

    assert_eq!(snapshots.len(), 2);
    assert_eq!(snapshots[0].name, "Acorn Academy");
    assert_eq!(snapshots[0].evidence.legacy, 4);
    assert_eq!(snapshots[0].evidence.new, 2);
    assert_eq!(snapshots[1].evidence.total(), 0);
}

#[tokio::test]
async fn evidence_for_unknown_school_is_rejected() {
    let repository = InMemorySchoolRoundRepository::new();

    let added = repository
        .add_evidence(
            SchoolId::new(),
            evidence(Stage::Act, 1, EvidenceStatus::Approved),
        )
        .await;

    assert!(matches!(added, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn update_overwrites_progress_and_reports_missing_school() {
    let repository = InMemorySchoolRoundRepository::new();
    let school_id = SchoolId::new();
    repository
        .insert_school(school_id, "Harbour School", None, SchoolProgress::initial(), 0)
        .await;

    let mut progress = SchoolProgress::initial();
    progress.current_round = 2;
    progress.rounds_completed = 1;

    assert!(
        repository
            .update_school_progress(school_id, &progress)
            .await
            .is_ok()
    );
    assert_eq!(repository.stored_progress(school_id).await, Some(progress));

    let missing = repository
        .update_school_progress(SchoolId::new(), &progress)
        .await;
    assert!(matches!(missing, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn injected_write_failure_leaves_progress_untouched() {
    let repository = InMemorySchoolRoundRepository::new();
    let school_id = SchoolId::new();
    repository
        .insert_school(school_id, "Harbour School", None, SchoolProgress::initial(), 0)
        .await;
    repository.fail_writes_for(school_id).await;

    let mut progress = SchoolProgress::initial();
    progress.progress_percentage = 66;

    let updated = repository
        .update_school_progress(school_id, &progress)
        .await;

    assert!(matches!(updated, Err(AppError::Internal(_))));
    assert_eq!(
        repository.stored_progress(school_id).await,
        Some(SchoolProgress::initial())
    );
}

#[tokio::test]
async fn round_inputs_tally_approved_evidence_in_current_round_only() {
    let repository = InMemorySchoolRoundRepository::new();
    let school_id = SchoolId::new();
    let mut progress = SchoolProgress::initial();
    progress.current_round = 2;
    progress.rounds_completed = 1;
    repository
        .insert_school(school_id, "Harbour School", None, progress, 0)
        .await;

    for record in [
        evidence(Stage::Inspire, 2, EvidenceStatus::Approved),
        evidence(Stage::Inspire, 2, EvidenceStatus::Approved),
        evidence(Stage::Investigate, 2, EvidenceStatus::Pending),
        evidence(Stage::Act, 1, EvidenceStatus::Approved),
        evidence(Stage::Act, 2, EvidenceStatus::Rejected),
    ] {
        assert!(repository.add_evidence(school_id, record).await.is_ok());
    }

    let listed = repository.list_round_progress_inputs().await;
    let Ok(inputs) = listed else {
        panic!("listing round inputs should succeed");
    };

    assert_eq!(inputs.len(), 1);
    assert_eq!(inputs[0].approved_in_round.inspire, 2);
    assert_eq!(inputs[0].approved_in_round.investigate, 0);
    assert_eq!(inputs[0].approved_in_round.act, 0);
}
