use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info};

use super::actions::{is_legal, ActionKind};
use super::domain::{
    ActivityKind, Application, ApplicationId, ChangeOrigin, NewApplication, Rejection,
};
use super::repository::{ApplicationRepository, RepositoryError};
use super::status::{ApplicationStatus, UnknownStatus};
use super::view::PipelineSummary;

/// Authority over status mutations. The pipeline model decides what the UI
/// may offer; this service re-checks the same rules against the stored status
/// before persisting anything.
pub struct PipelineService<R> {
    repository: Arc<R>,
}

static APPLICATION_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_application_id() -> ApplicationId {
    let id = APPLICATION_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    ApplicationId(format!("app-{id:06}"))
}

impl<R> PipelineService<R>
where
    R: ApplicationRepository + 'static,
{
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Register an application created by the intake side.
    pub fn create(&self, intake: NewApplication) -> Result<Application, PipelineServiceError> {
        let application = Application::from_intake(next_application_id(), intake, Utc::now());
        let stored = self.repository.insert(application)?;
        info!(
            application_id = %stored.id.0,
            status = %stored.status,
            "application registered"
        );
        Ok(stored)
    }

    pub fn get(&self, id: &ApplicationId) -> Result<Application, PipelineServiceError> {
        let application = self
            .repository
            .fetch(id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(application)
    }

    pub fn list(
        &self,
        status: Option<ApplicationStatus>,
    ) -> Result<Vec<Application>, PipelineServiceError> {
        Ok(self.repository.list(status)?)
    }

    /// Apply a recruiter action that originates a transition (review or
    /// shortlist). Rejection carries a reason and goes through [`Self::reject`].
    pub fn apply_action(
        &self,
        id: &ApplicationId,
        action: ActionKind,
        actor: &str,
    ) -> Result<Application, PipelineServiceError> {
        let mut application = self.get(id)?;
        ensure_offered(&application, action)?;

        let target = match action.target_status() {
            Some(ApplicationStatus::Rejected) => {
                return Err(PipelineServiceError::RejectionReasonRequired)
            }
            Some(target) => target,
            None => return Err(PipelineServiceError::HandledElsewhere { action }),
        };

        transition(&mut application, target, ChangeOrigin::Recruiter, Some(actor));
        self.persist(application)
    }

    pub fn reject(
        &self,
        id: &ApplicationId,
        reason: &str,
        actor: &str,
    ) -> Result<Application, PipelineServiceError> {
        let reason = reason.trim();
        if reason.is_empty() {
            return Err(PipelineServiceError::RejectionReasonRequired);
        }

        let mut application = self.get(id)?;
        ensure_offered(&application, ActionKind::Reject)?;

        let now = Utc::now();
        application.rejection = Some(Rejection {
            reason: reason.to_string(),
            rejected_by: actor.to_string(),
            rejected_at: now,
        });
        transition(
            &mut application,
            ApplicationStatus::Rejected,
            ChangeOrigin::Recruiter,
            Some(actor),
        );
        self.persist(application)
    }

    /// Notes-only update; counts as recruiter review.
    pub fn update_notes(
        &self,
        id: &ApplicationId,
        notes: &str,
        actor: &str,
    ) -> Result<Application, PipelineServiceError> {
        let mut application = self.get(id)?;
        let now = Utc::now();
        application.recruiter_notes = Some(notes.to_string());
        application.stamp_review(actor, now);
        application.record(
            ActivityKind::NoteAdded,
            ChangeOrigin::Recruiter,
            Some(actor),
            now,
        );
        self.persist(application)
    }

    /// Status change pushed by another subsystem (offers, contracts,
    /// interview completion). Terminal states are never left.
    pub fn sync_external_status(
        &self,
        id: &ApplicationId,
        status: ApplicationStatus,
    ) -> Result<Application, PipelineServiceError> {
        let mut application = self.get(id)?;
        if application.status == status {
            debug!(application_id = %id.0, %status, "external status unchanged");
            return Ok(application);
        }
        if application.status.is_terminal() {
            return Err(PipelineServiceError::TerminalStatus(application.status));
        }

        transition(&mut application, status, ChangeOrigin::External, None);
        self.persist(application)
    }

    /// [`Self::sync_external_status`] for a raw value; out-of-band writers
    /// get the strict parse, not the display fallback.
    pub fn sync_external_raw(
        &self,
        id: &ApplicationId,
        raw: &str,
    ) -> Result<Application, PipelineServiceError> {
        let status = raw.parse::<ApplicationStatus>()?;
        self.sync_external_status(id, status)
    }

    /// Share the candidate with the client. Allowed once the application is
    /// shortlisted and not rejected; repeated calls keep the first timestamp.
    pub fn release_to_client(
        &self,
        id: &ApplicationId,
        actor: &str,
    ) -> Result<Application, PipelineServiceError> {
        let mut application = self.get(id)?;
        if application.released_at.is_some() {
            return Ok(application);
        }
        if !releasable(application.status) {
            return Err(PipelineServiceError::ReleaseNotAllowed(application.status));
        }

        let now = Utc::now();
        application.released_at = Some(now);
        application.record(
            ActivityKind::ReleasedToClient,
            ChangeOrigin::Recruiter,
            Some(actor),
            now,
        );
        let application = self.persist(application)?;
        info!(application_id = %id.0, actor, "application released to client");
        Ok(application)
    }

    /// Write back a record read earlier in the same call. The store refuses
    /// the write if another update landed in between, so a legality check
    /// made against the read snapshot still holds when the write succeeds.
    fn persist(
        &self,
        mut application: Application,
    ) -> Result<Application, PipelineServiceError> {
        let expected_version = application.version;
        application.version += 1;
        self.repository.update(application.clone(), expected_version)?;
        Ok(application)
    }

    pub fn summary(&self) -> Result<PipelineSummary, PipelineServiceError> {
        let applications = self.repository.list(None)?;
        Ok(PipelineSummary::tally(&applications))
    }
}

fn ensure_offered(
    application: &Application,
    action: ActionKind,
) -> Result<(), PipelineServiceError> {
    if is_legal(application.status, action) {
        Ok(())
    } else {
        Err(PipelineServiceError::ActionNotAllowed {
            action,
            status: application.status,
        })
    }
}

fn releasable(status: ApplicationStatus) -> bool {
    matches!(
        status,
        ApplicationStatus::Shortlisted
            | ApplicationStatus::InterviewScheduled
            | ApplicationStatus::Interviewed
            | ApplicationStatus::OfferSent
            | ApplicationStatus::Hired
    )
}

fn transition(
    application: &mut Application,
    target: ApplicationStatus,
    origin: ChangeOrigin,
    actor: Option<&str>,
) {
    let from = application.status;
    let now = Utc::now();
    application.status = target;

    if let (ChangeOrigin::Recruiter, Some(actor)) = (origin, actor) {
        if target.counts_as_reviewed() {
            application.stamp_review(actor, now);
        }
    }

    application.record(
        ActivityKind::StatusChanged { from, to: target },
        origin,
        actor,
        now,
    );
    info!(
        application_id = %application.id.0,
        %from,
        to = %target,
        ?origin,
        "application status changed"
    );
}

#[derive(Debug, thiserror::Error)]
pub enum PipelineServiceError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error("action '{}' is not offered while the application is {status}", .action.label())]
    ActionNotAllowed {
        action: ActionKind,
        status: ApplicationStatus,
    },
    #[error("action '{}' is handled outside the pipeline", .action.label())]
    HandledElsewhere { action: ActionKind },
    #[error("rejection reason is required")]
    RejectionReasonRequired,
    #[error(transparent)]
    UnknownStatus(#[from] UnknownStatus),
    #[error("application is {0} and can no longer change status")]
    TerminalStatus(ApplicationStatus),
    #[error("application cannot be released to the client while {0}")]
    ReleaseNotAllowed(ApplicationStatus),
}
