use serde::{Deserialize, Serialize};

use super::status::ApplicationStatus;

/// Recruiter-facing operations the pipeline can offer next to an application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Review,
    Shortlist,
    Call,
    ScheduleInterview,
    Reject,
    ViewInterview,
    ViewPlacement,
}

impl ActionKind {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Review => "Review",
            Self::Shortlist => "Shortlist",
            Self::Call => "Call",
            Self::ScheduleInterview => "Schedule Interview",
            Self::Reject => "Reject",
            Self::ViewInterview => "View Interview",
            Self::ViewPlacement => "View Placement",
        }
    }

    /// Status this action writes when it originates a transition. Calls,
    /// scheduling and the view actions hand off to other subsystems, which
    /// update the status out-of-band.
    pub const fn target_status(self) -> Option<ApplicationStatus> {
        match self {
            Self::Review => Some(ApplicationStatus::UnderReview),
            Self::Shortlist => Some(ApplicationStatus::Shortlisted),
            Self::Reject => Some(ApplicationStatus::Rejected),
            Self::Call | Self::ScheduleInterview | Self::ViewInterview | Self::ViewPlacement => {
                None
            }
        }
    }
}

/// Actions offered for `status`, in display order.
pub fn legal_actions(status: ApplicationStatus) -> Vec<ActionKind> {
    use ActionKind::*;

    match status {
        ApplicationStatus::Submitted => vec![Review, Reject],
        ApplicationStatus::UnderReview => vec![Shortlist, Call, ScheduleInterview, Reject],
        ApplicationStatus::Shortlisted => vec![Call, ScheduleInterview, Reject],
        ApplicationStatus::InterviewScheduled => vec![ViewInterview, Reject],
        ApplicationStatus::Hired => vec![ViewPlacement],
        ApplicationStatus::Rejected => Vec::new(),
        ApplicationStatus::Invited | ApplicationStatus::Interviewed | ApplicationStatus::OfferSent => {
            vec![Reject]
        }
    }
}

pub fn is_legal(status: ApplicationStatus, action: ActionKind) -> bool {
    legal_actions(status).contains(&action)
}
