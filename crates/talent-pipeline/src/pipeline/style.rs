use serde::Serialize;

use super::status::ApplicationStatus;

/// Visual and semantic treatment for a status badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatusStyle {
    pub color_token: &'static str,
    pub background_token: &'static str,
    pub icon: &'static str,
    pub label: &'static str,
}

const fn style(
    color_token: &'static str,
    background_token: &'static str,
    icon: &'static str,
    label: &'static str,
) -> StatusStyle {
    StatusStyle {
        color_token,
        background_token,
        icon,
        label,
    }
}

pub fn style_for(status: ApplicationStatus) -> StatusStyle {
    match status {
        ApplicationStatus::Invited => style("indigo-400", "indigo-500/10", "gift", "Invited"),
        ApplicationStatus::Submitted => style("blue-400", "blue-500/10", "file-text", "New"),
        ApplicationStatus::UnderReview => style("cyan-400", "cyan-500/10", "eye", "Reviewing"),
        ApplicationStatus::Shortlisted => {
            style("purple-400", "purple-500/10", "star", "Shortlisted")
        }
        ApplicationStatus::InterviewScheduled => {
            style("orange-400", "orange-500/10", "video", "Interview")
        }
        ApplicationStatus::Interviewed => {
            style("amber-400", "amber-500/10", "check-circle", "Interviewed")
        }
        ApplicationStatus::OfferSent => style("pink-400", "pink-500/10", "sparkles", "Offer Sent"),
        ApplicationStatus::Hired => style("emerald-400", "emerald-500/10", "award", "Hired"),
        ApplicationStatus::Rejected => style("red-400", "red-500/10", "x-circle", "Declined"),
    }
}

/// Style lookup for raw input; unknown values get the `submitted` entry.
pub fn style_for_raw(raw: &str) -> StatusStyle {
    style_for(ApplicationStatus::normalize(raw))
}
