use serde::Serialize;

use super::status::ApplicationStatus;

/// Where a status sits on the progress bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "index", rename_all = "snake_case")]
pub enum StagePosition {
    Step(usize),
    /// The rejected branch has no position and is drawn as an error state.
    Rejected,
}

impl StagePosition {
    pub const fn index(self) -> Option<usize> {
        match self {
            Self::Step(index) => Some(index),
            Self::Rejected => None,
        }
    }
}

/// Zero-based position of `status` in [`ApplicationStatus::stepper_order`].
pub fn stage_index(status: ApplicationStatus) -> StagePosition {
    match status {
        ApplicationStatus::Invited => StagePosition::Step(0),
        ApplicationStatus::Submitted => StagePosition::Step(1),
        ApplicationStatus::UnderReview => StagePosition::Step(2),
        ApplicationStatus::Shortlisted => StagePosition::Step(3),
        // Interviewed shares the interview step.
        ApplicationStatus::InterviewScheduled | ApplicationStatus::Interviewed => {
            StagePosition::Step(4)
        }
        ApplicationStatus::OfferSent => StagePosition::Step(5),
        ApplicationStatus::Hired => StagePosition::Step(6),
        ApplicationStatus::Rejected => StagePosition::Rejected,
    }
}

/// [`stage_index`] for raw input, with the fail-open normalization applied.
pub fn stage_index_raw(raw: &str) -> StagePosition {
    stage_index(ApplicationStatus::normalize(raw))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StepState {
    Completed,
    Current,
    Upcoming,
    Rejected,
}

#[derive(Debug, Clone, Serialize)]
pub struct StepView {
    pub status: ApplicationStatus,
    pub label: &'static str,
    pub icon: &'static str,
    pub state: StepState,
}

/// Per-step rendering state for the pipeline stepper.
pub fn stepper(status: ApplicationStatus) -> Vec<StepView> {
    let position = stage_index(status);
    ApplicationStatus::stepper_order()
        .into_iter()
        .enumerate()
        .map(|(index, step)| {
            let state = match position {
                StagePosition::Rejected => StepState::Rejected,
                StagePosition::Step(current) if index < current => StepState::Completed,
                StagePosition::Step(current) if index == current => StepState::Current,
                StagePosition::Step(_) => StepState::Upcoming,
            };
            let (label, icon) = step_caption(step);
            StepView {
                status: step,
                label,
                icon,
                state,
            }
        })
        .collect()
}

fn step_caption(step: ApplicationStatus) -> (&'static str, &'static str) {
    match step {
        ApplicationStatus::Invited => ("Invited", "gift"),
        ApplicationStatus::Submitted => ("Applied", "file-text"),
        ApplicationStatus::UnderReview => ("Reviewing", "eye"),
        ApplicationStatus::Shortlisted => ("Shortlisted", "star"),
        ApplicationStatus::InterviewScheduled | ApplicationStatus::Interviewed => {
            ("Interview", "video")
        }
        ApplicationStatus::OfferSent => ("Offer", "sparkles"),
        ApplicationStatus::Hired => ("Hired", "award"),
        ApplicationStatus::Rejected => ("Declined", "x-circle"),
    }
}
