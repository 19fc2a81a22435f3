use crate::infra::InMemoryApplicationRepository;
use clap::Args;
use std::sync::Arc;
use talent_pipeline::error::AppError;
use talent_pipeline::pipeline::{
    ActionKind, Application, ApplicationId, ApplicationProjection, ApplicationRepository,
    ApplicationStatus, CandidateId, JobId, NewApplication, PipelineService, PipelineServiceError,
    PipelineSummary, RepositoryError,
};

const DEMO_RECRUITER: &str = "demo-recruiter";

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Stop after this many lifecycle steps.
    #[arg(long)]
    pub(crate) steps: Option<usize>,
    /// Print the final application records as JSON.
    #[arg(long)]
    pub(crate) json: bool,
}

/// Which of the two demo applications a step targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Subject {
    Applicant,
    Invitee,
}

#[derive(Debug, Clone, Copy)]
enum DemoStep {
    Apply,
    Invite,
    Recruiter(ActionKind),
    Release,
    External(ApplicationStatus),
    RejectInvitee(&'static str),
}

const LIFECYCLE: [(&str, DemoStep); 10] = [
    ("Candidate applies to the job", DemoStep::Apply),
    ("Agency invites a second candidate", DemoStep::Invite),
    (
        "Recruiter opens the application",
        DemoStep::Recruiter(ActionKind::Review),
    ),
    (
        "Recruiter shortlists the candidate",
        DemoStep::Recruiter(ActionKind::Shortlist),
    ),
    ("Recruiter releases the candidate to the client", DemoStep::Release),
    (
        "Interview booked by the scheduling system",
        DemoStep::External(ApplicationStatus::InterviewScheduled),
    ),
    (
        "Interview completion webhook arrives",
        DemoStep::External(ApplicationStatus::Interviewed),
    ),
    (
        "Offer sent from offer management",
        DemoStep::External(ApplicationStatus::OfferSent),
    ),
    (
        "Contract signed, candidate hired",
        DemoStep::External(ApplicationStatus::Hired),
    ),
    (
        "Recruiter declines the invitee",
        DemoStep::RejectInvitee("Role filled by another candidate"),
    ),
];

#[derive(Debug, Clone)]
pub(crate) struct StepOutcome {
    pub(crate) description: &'static str,
    pub(crate) application: Application,
}

#[derive(Default)]
struct DemoSubjects {
    applicant: Option<ApplicationId>,
    invitee: Option<ApplicationId>,
}

impl DemoSubjects {
    fn id(&self, subject: Subject) -> Result<&ApplicationId, AppError> {
        let id = match subject {
            Subject::Applicant => self.applicant.as_ref(),
            Subject::Invitee => self.invitee.as_ref(),
        };
        id.ok_or(AppError::Pipeline(PipelineServiceError::Repository(
            RepositoryError::NotFound,
        )))
    }
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let repository = Arc::new(InMemoryApplicationRepository::default());
    let service = PipelineService::new(repository.clone());

    println!("Application pipeline demo");
    let limit = args.steps.unwrap_or(LIFECYCLE.len());
    if let Err(err) = walk(&service, limit, print_outcome) {
        println!("Demo stopped: {err}");
        return Err(err);
    }

    let summary = service.summary()?;
    print_summary(&summary);

    if args.json {
        let applications = repository.list(None).map_err(PipelineServiceError::from)?;
        match serde_json::to_string_pretty(&applications) {
            Ok(json) => println!("\nFinal records:\n{json}"),
            Err(err) => println!("\nFinal records unavailable: {err}"),
        }
    }

    Ok(())
}

/// Run the first `limit` lifecycle steps in order, reporting each one as it
/// completes. The walk stops at the first failing step.
pub(crate) fn walk<R, F>(
    service: &PipelineService<R>,
    limit: usize,
    mut report: F,
) -> Result<Vec<StepOutcome>, AppError>
where
    R: ApplicationRepository + 'static,
    F: FnMut(usize, &StepOutcome),
{
    let mut subjects = DemoSubjects::default();
    let mut outcomes = Vec::new();

    for &(description, step) in LIFECYCLE.iter().take(limit) {
        let application = match step {
            DemoStep::Apply => {
                let created = service.create(demo_intake("cand-demo-01", false))?;
                subjects.applicant = Some(created.id.clone());
                created
            }
            DemoStep::Invite => {
                let created = service.create(demo_intake("cand-demo-02", true))?;
                subjects.invitee = Some(created.id.clone());
                created
            }
            DemoStep::Recruiter(action) => {
                let id = subjects.id(Subject::Applicant)?;
                service.apply_action(id, action, DEMO_RECRUITER)?
            }
            DemoStep::Release => {
                let id = subjects.id(Subject::Applicant)?;
                service.release_to_client(id, DEMO_RECRUITER)?
            }
            DemoStep::External(status) => {
                let id = subjects.id(Subject::Applicant)?;
                service.sync_external_status(id, status)?
            }
            DemoStep::RejectInvitee(reason) => {
                let id = subjects.id(Subject::Invitee)?;
                service.reject(id, reason, DEMO_RECRUITER)?
            }
        };

        let outcome = StepOutcome {
            description,
            application,
        };
        report(outcomes.len() + 1, &outcome);
        outcomes.push(outcome);
    }

    Ok(outcomes)
}

fn demo_intake(candidate: &str, agency_initiated: bool) -> NewApplication {
    NewApplication {
        candidate_id: CandidateId(candidate.to_string()),
        job_id: JobId("job-demo-csr".to_string()),
        agency_initiated,
        projection: ApplicationProjection {
            candidate_name: "Demo Candidate".to_string(),
            candidate_email: "redacted@example.com".to_string(),
            has_resume: true,
            ai_score: Some(78),
            skills: vec!["Customer Service".to_string(), "Email Support".to_string()],
        },
    }
}

fn print_outcome(number: usize, outcome: &StepOutcome) {
    let application = &outcome.application;
    let stage = match application.stage().index() {
        Some(index) => format!("step {}/7", index + 1),
        None => "declined".to_string(),
    };
    let actions: Vec<&str> = application
        .legal_actions()
        .into_iter()
        .map(ActionKind::label)
        .collect();
    let offered = if actions.is_empty() {
        "none".to_string()
    } else {
        actions.join(", ")
    };

    println!("{number:>2}. {}", outcome.description);
    println!(
        "    {} -> {} ({}) | next: {}",
        application.id.0,
        application.style().label,
        stage,
        offered
    );
}

fn print_summary(summary: &PipelineSummary) {
    println!("\nPipeline summary");
    println!(
        "- {} total | {} invited | {} new | {} reviewing | {} interviewing",
        summary.total, summary.invited, summary.new, summary.reviewing, summary.interviewing
    );
    println!(
        "- {} offered | {} hired | {} declined",
        summary.offered, summary.hired, summary.rejected
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> PipelineService<InMemoryApplicationRepository> {
        PipelineService::new(Arc::new(InMemoryApplicationRepository::default()))
    }

    #[test]
    fn full_walk_ends_hired_and_declined() {
        let service = service();
        let outcomes =
            walk(&service, LIFECYCLE.len(), |_, _| {}).expect("demo walk succeeds");
        assert_eq!(outcomes.len(), LIFECYCLE.len());

        let hired_step = &outcomes[8];
        assert_eq!(hired_step.application.status, ApplicationStatus::Hired);
        assert_eq!(
            hired_step.application.legal_actions(),
            vec![ActionKind::ViewPlacement]
        );

        let last = outcomes.last().expect("final step");
        assert_eq!(last.application.status, ApplicationStatus::Rejected);

        let summary = service.summary().expect("summary");
        assert_eq!(summary.total, 2);
        assert_eq!(summary.hired, 1);
        assert_eq!(summary.rejected, 1);
    }

    #[test]
    fn partial_walk_stops_early() {
        let service = service();
        let outcomes = walk(&service, 3, |_, _| {}).expect("demo walk succeeds");
        assert_eq!(outcomes.len(), 3);
        assert_eq!(
            outcomes[2].application.status,
            ApplicationStatus::UnderReview
        );
    }
}
