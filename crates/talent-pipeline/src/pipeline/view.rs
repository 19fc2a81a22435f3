use serde::Serialize;

use super::actions::{legal_actions, ActionKind};
use super::domain::Application;
use super::stage::{stage_index, stepper, StagePosition, StepView};
use super::status::ApplicationStatus;
use super::style::{style_for, StatusStyle};

#[derive(Debug, Clone, Serialize)]
pub struct ActionView {
    pub action: ActionKind,
    pub label: &'static str,
}

/// Everything the pipeline model derives from a single status value.
#[derive(Debug, Clone, Serialize)]
pub struct StatusOverview {
    pub status: ApplicationStatus,
    pub position: StagePosition,
    pub terminal: bool,
    pub actions: Vec<ActionView>,
    pub style: StatusStyle,
    pub stepper: Vec<StepView>,
}

impl StatusOverview {
    pub fn for_status(status: ApplicationStatus) -> Self {
        Self {
            status,
            position: stage_index(status),
            terminal: status.is_terminal(),
            actions: legal_actions(status)
                .into_iter()
                .map(|action| ActionView {
                    action,
                    label: action.label(),
                })
                .collect(),
            style: style_for(status),
            stepper: stepper(status),
        }
    }

    /// Fail-open lookup for values read from an external projection.
    pub fn for_raw(raw: &str) -> Self {
        Self::for_status(ApplicationStatus::normalize(raw))
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ApplicationView {
    pub application: Application,
    pub pipeline: StatusOverview,
}

impl From<Application> for ApplicationView {
    fn from(application: Application) -> Self {
        let pipeline = StatusOverview::for_status(application.status);
        Self {
            application,
            pipeline,
        }
    }
}

/// Dashboard counters across every application.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PipelineSummary {
    pub total: usize,
    pub invited: usize,
    pub new: usize,
    pub reviewing: usize,
    pub interviewing: usize,
    pub offered: usize,
    pub hired: usize,
    pub rejected: usize,
}

impl PipelineSummary {
    pub fn tally<'a>(applications: impl IntoIterator<Item = &'a Application>) -> Self {
        applications
            .into_iter()
            .fold(Self::default(), |mut summary, application| {
                summary.total += 1;
                match application.status {
                    ApplicationStatus::Invited => summary.invited += 1,
                    ApplicationStatus::Submitted => summary.new += 1,
                    ApplicationStatus::UnderReview | ApplicationStatus::Shortlisted => {
                        summary.reviewing += 1
                    }
                    ApplicationStatus::InterviewScheduled | ApplicationStatus::Interviewed => {
                        summary.interviewing += 1
                    }
                    ApplicationStatus::OfferSent => summary.offered += 1,
                    ApplicationStatus::Hired => summary.hired += 1,
                    ApplicationStatus::Rejected => summary.rejected += 1,
                }
                summary
            })
    }
}
