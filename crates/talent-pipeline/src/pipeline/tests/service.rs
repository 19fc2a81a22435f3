use super::common::*;
use crate::pipeline::domain::{ActivityKind, ApplicationId, ChangeOrigin};
use crate::pipeline::repository::{ApplicationRepository, RepositoryError};
use crate::pipeline::{ActionKind, ApplicationStatus, PipelineService, PipelineServiceError};
use std::sync::Arc;

#[test]
fn create_starts_submitted_or_invited() {
    let (service, _) = build_service();

    let submitted = service.create(intake()).expect("create submitted");
    assert_eq!(submitted.status, ApplicationStatus::Submitted);
    assert!(submitted.reviewed_at.is_none());
    assert!(submitted.timeline.is_empty());

    let invited = service.create(invited_intake()).expect("create invited");
    assert_eq!(invited.status, ApplicationStatus::Invited);
    assert_ne!(submitted.id, invited.id);
}

#[test]
fn create_propagates_conflicts() {
    let service = PipelineService::new(Arc::new(ConflictRepository));
    match service.create(intake()) {
        Err(PipelineServiceError::Repository(RepositoryError::Conflict)) => {}
        other => panic!("expected conflict, got {other:?}"),
    }
}

#[test]
fn review_then_shortlist_walks_forward_and_stamps_review() {
    let (service, repository) = build_service();
    let created = service.create(intake()).expect("create");

    let reviewed = service
        .apply_action(&created.id, ActionKind::Review, "rec-ana")
        .expect("review is offered for submitted");
    assert_eq!(reviewed.status, ApplicationStatus::UnderReview);
    assert_eq!(reviewed.reviewed_by.as_deref(), Some("rec-ana"));
    assert!(reviewed.reviewed_at.is_some());

    let shortlisted = service
        .apply_action(&created.id, ActionKind::Shortlist, "rec-ana")
        .expect("shortlist is offered for under_review");
    assert_eq!(shortlisted.status, ApplicationStatus::Shortlisted);

    let stored = repository
        .fetch(&created.id)
        .expect("fetch succeeds")
        .expect("record present");
    assert_eq!(stored.status, ApplicationStatus::Shortlisted);
    let changes: Vec<_> = stored
        .timeline
        .iter()
        .map(|entry| entry.kind.clone())
        .collect();
    assert_eq!(
        changes,
        vec![
            ActivityKind::StatusChanged {
                from: ApplicationStatus::Submitted,
                to: ApplicationStatus::UnderReview,
            },
            ActivityKind::StatusChanged {
                from: ApplicationStatus::UnderReview,
                to: ApplicationStatus::Shortlisted,
            },
        ]
    );
}

#[test]
fn actions_outside_the_rule_table_are_refused() {
    let (service, repository) = build_service();
    let created = service.create(intake()).expect("create");

    match service.apply_action(&created.id, ActionKind::Shortlist, "rec-ana") {
        Err(PipelineServiceError::ActionNotAllowed { action, status }) => {
            assert_eq!(action, ActionKind::Shortlist);
            assert_eq!(status, ApplicationStatus::Submitted);
        }
        other => panic!("expected action refusal, got {other:?}"),
    }

    let stored = repository.fetch(&created.id).unwrap().unwrap();
    assert_eq!(stored.status, ApplicationStatus::Submitted);
}

#[test]
fn navigational_actions_do_not_write_status() {
    let (service, _) = build_service();
    let created = service.create(intake()).expect("create");
    service
        .apply_action(&created.id, ActionKind::Review, "rec-ana")
        .expect("review");

    match service.apply_action(&created.id, ActionKind::ScheduleInterview, "rec-ana") {
        Err(PipelineServiceError::HandledElsewhere { action }) => {
            assert_eq!(action, ActionKind::ScheduleInterview)
        }
        other => panic!("expected hand-off error, got {other:?}"),
    }
}

#[test]
fn reject_action_without_reason_is_refused() {
    let (service, _) = build_service();
    let created = service.create(intake()).expect("create");

    assert!(matches!(
        service.apply_action(&created.id, ActionKind::Reject, "rec-ana"),
        Err(PipelineServiceError::RejectionReasonRequired)
    ));
    assert!(matches!(
        service.reject(&created.id, "   ", "rec-ana"),
        Err(PipelineServiceError::RejectionReasonRequired)
    ));
}

#[test]
fn reject_records_reason_and_is_terminal() {
    let (service, _) = build_service();
    let created = service.create(invited_intake()).expect("create");

    let rejected = service
        .reject(&created.id, "  Did not meet typing speed  ", "rec-ana")
        .expect("reject is offered for invited");
    assert_eq!(rejected.status, ApplicationStatus::Rejected);
    let rejection = rejected.rejection.expect("rejection stored");
    assert_eq!(rejection.reason, "Did not meet typing speed");
    assert_eq!(rejection.rejected_by, "rec-ana");

    assert!(matches!(
        service.reject(&created.id, "again", "rec-ana"),
        Err(PipelineServiceError::ActionNotAllowed {
            status: ApplicationStatus::Rejected,
            ..
        })
    ));
    assert!(matches!(
        service.sync_external_status(&created.id, ApplicationStatus::OfferSent),
        Err(PipelineServiceError::TerminalStatus(ApplicationStatus::Rejected))
    ));
}

#[test]
fn external_updates_move_status_without_review_stamp() {
    let (service, _) = build_service();
    let created = service.create(intake()).expect("create");

    let scheduled = service
        .sync_external_status(&created.id, ApplicationStatus::InterviewScheduled)
        .expect("external update");
    assert_eq!(scheduled.status, ApplicationStatus::InterviewScheduled);
    assert!(scheduled.reviewed_at.is_none());
    assert_eq!(scheduled.timeline[0].origin, ChangeOrigin::External);

    let unchanged = service
        .sync_external_status(&created.id, ApplicationStatus::InterviewScheduled)
        .expect("same status is a no-op");
    assert_eq!(unchanged.timeline.len(), 1);

    let hired = service
        .sync_external_raw(&created.id, "hired")
        .expect("hired via webhook");
    assert_eq!(hired.status, ApplicationStatus::Hired);
    assert_eq!(hired.legal_actions(), vec![ActionKind::ViewPlacement]);
}

#[test]
fn external_updates_use_strict_parsing() {
    let (service, _) = build_service();
    let created = service.create(intake()).expect("create");

    match service.sync_external_raw(&created.id, "promoted") {
        Err(PipelineServiceError::UnknownStatus(err)) => assert_eq!(err.0, "promoted"),
        other => panic!("expected unknown status, got {other:?}"),
    }
}

#[test]
fn notes_stamp_review_without_changing_status() {
    let (service, _) = build_service();
    let created = service.create(intake()).expect("create");

    let noted = service
        .update_notes(&created.id, "Strong voice sample", "rec-ben")
        .expect("notes saved");
    assert_eq!(noted.status, ApplicationStatus::Submitted);
    assert_eq!(noted.recruiter_notes.as_deref(), Some("Strong voice sample"));
    assert_eq!(noted.reviewed_by.as_deref(), Some("rec-ben"));
    assert_eq!(noted.timeline[0].kind, ActivityKind::NoteAdded);
}

#[test]
fn release_requires_shortlist_and_keeps_first_timestamp() {
    let (service, repository) = build_service();
    let created = service.create(intake()).expect("create");

    assert!(matches!(
        service.release_to_client(&created.id, "rec-ana"),
        Err(PipelineServiceError::ReleaseNotAllowed(
            ApplicationStatus::Submitted
        ))
    ));

    repository.force_status(&created.id, ApplicationStatus::Shortlisted);
    let released = service
        .release_to_client(&created.id, "rec-ana")
        .expect("release after shortlist");
    let first = released.released_at.expect("released");

    let again = service
        .release_to_client(&created.id, "rec-ana")
        .expect("repeat release");
    assert_eq!(again.released_at, Some(first));
    assert_eq!(again.timeline.len(), 1);
}

#[test]
fn summary_groups_statuses_like_the_dashboard() {
    let (service, repository) = build_service();
    let statuses = [
        ApplicationStatus::Invited,
        ApplicationStatus::Submitted,
        ApplicationStatus::UnderReview,
        ApplicationStatus::Shortlisted,
        ApplicationStatus::InterviewScheduled,
        ApplicationStatus::Interviewed,
        ApplicationStatus::OfferSent,
        ApplicationStatus::Hired,
        ApplicationStatus::Rejected,
    ];
    for status in statuses {
        let created = service.create(intake()).expect("create");
        repository.force_status(&created.id, status);
    }

    let summary = service.summary().expect("summary");
    assert_eq!(summary.total, 9);
    assert_eq!(summary.invited, 1);
    assert_eq!(summary.new, 1);
    assert_eq!(summary.reviewing, 2);
    assert_eq!(summary.interviewing, 2);
    assert_eq!(summary.offered, 1);
    assert_eq!(summary.hired, 1);
    assert_eq!(summary.rejected, 1);

    let hired = service
        .list(Some(ApplicationStatus::Hired))
        .expect("filtered list");
    assert_eq!(hired.len(), 1);
}

#[test]
fn get_propagates_not_found() {
    let (service, _) = build_service();
    match service.get(&ApplicationId("missing".to_string())) {
        Err(PipelineServiceError::Repository(RepositoryError::NotFound)) => {}
        other => panic!("expected not found error, got {other:?}"),
    }
}

#[test]
fn repository_outages_surface_as_repository_errors() {
    let service = PipelineService::new(Arc::new(UnavailableRepository));
    assert!(matches!(
        service.summary(),
        Err(PipelineServiceError::Repository(RepositoryError::Unavailable(_)))
    ));
}

#[test]
fn concurrent_transitions_from_the_same_snapshot_do_not_both_land() {
    let repository = Arc::new(GatedRepository::new(MemoryRepository::default(), 2));
    let service = PipelineService::new(repository.clone());
    let created = service.create(intake()).expect("create");
    service
        .apply_action(&created.id, ActionKind::Review, "rec-ana")
        .expect("review");

    repository.arm();
    let (rejected, shortlisted) = std::thread::scope(|scope| {
        let reject = scope.spawn(|| service.reject(&created.id, "not a fit", "rec-ana"));
        let shortlist =
            scope.spawn(|| service.apply_action(&created.id, ActionKind::Shortlist, "rec-ben"));
        (
            reject.join().expect("reject thread"),
            shortlist.join().expect("shortlist thread"),
        )
    });
    repository.disarm();

    assert_eq!(
        rejected.is_ok() as u8 + shortlisted.is_ok() as u8,
        1,
        "exactly one transition wins: {rejected:?} / {shortlisted:?}"
    );
    let loser = if rejected.is_ok() {
        &shortlisted
    } else {
        &rejected
    };
    assert!(matches!(
        loser,
        Err(PipelineServiceError::Repository(RepositoryError::Stale))
    ));

    let stored = service.get(&created.id).expect("stored record");
    if rejected.is_ok() {
        assert_eq!(stored.status, ApplicationStatus::Rejected);
        assert!(stored.rejection.is_some());
    } else {
        assert_eq!(stored.status, ApplicationStatus::Shortlisted);
        assert!(stored.rejection.is_none());
    }
}

#[test]
fn writes_bump_the_record_version() {
    let (service, _) = build_service();
    let created = service.create(intake()).expect("create");
    assert_eq!(created.version, 0);

    let reviewed = service
        .apply_action(&created.id, ActionKind::Review, "rec-ana")
        .expect("review");
    let noted = service
        .update_notes(&created.id, "Call back Monday", "rec-ana")
        .expect("notes");
    assert_eq!(reviewed.version, 1);
    assert_eq!(noted.version, 2);
}

#[test]
fn stale_writes_are_refused_by_the_store() {
    let (service, repository) = build_service();
    let created = service.create(intake()).expect("create");
    service
        .apply_action(&created.id, ActionKind::Review, "rec-ana")
        .expect("review");

    let mut snapshot = created.clone();
    snapshot.status = ApplicationStatus::Rejected;
    assert!(matches!(
        repository.update(snapshot, created.version),
        Err(RepositoryError::Stale)
    ));
    let stored = service.get(&created.id).expect("stored record");
    assert_eq!(stored.status, ApplicationStatus::UnderReview);
}
