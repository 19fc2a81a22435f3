use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Closed set of lifecycle values an application can carry.
///
/// Declaration order follows the pipeline, but only [`ApplicationStatus::stepper_order`]
/// is meaningful for progress rendering. Legality of transitions lives in
/// [`super::actions`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    Invited,
    Submitted,
    UnderReview,
    Shortlisted,
    InterviewScheduled,
    Interviewed,
    OfferSent,
    Hired,
    Rejected,
}

impl ApplicationStatus {
    pub const ALL: [Self; 9] = [
        Self::Invited,
        Self::Submitted,
        Self::UnderReview,
        Self::Shortlisted,
        Self::InterviewScheduled,
        Self::Interviewed,
        Self::OfferSent,
        Self::Hired,
        Self::Rejected,
    ];

    /// The seven steps drawn on the progress bar.
    pub const fn stepper_order() -> [Self; 7] {
        [
            Self::Invited,
            Self::Submitted,
            Self::UnderReview,
            Self::Shortlisted,
            Self::InterviewScheduled,
            Self::OfferSent,
            Self::Hired,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Invited => "invited",
            Self::Submitted => "submitted",
            Self::UnderReview => "under_review",
            Self::Shortlisted => "shortlisted",
            Self::InterviewScheduled => "interview_scheduled",
            Self::Interviewed => "interviewed",
            Self::OfferSent => "offer_sent",
            Self::Hired => "hired",
            Self::Rejected => "rejected",
        }
    }

    /// No further transitions are offered from these.
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Hired | Self::Rejected)
    }

    /// Statuses reached through recruiter actions rather than intake.
    pub const fn counts_as_reviewed(self) -> bool {
        !matches!(self, Self::Invited | Self::Submitted)
    }

    /// Lenient parse used for rendering: anything outside the closed set
    /// becomes `Submitted`, and the occurrence is logged.
    pub fn normalize(raw: &str) -> Self {
        match raw.parse() {
            Ok(status) => status,
            Err(UnknownStatus(value)) => {
                tracing::warn!(
                    status = %value,
                    "unrecognized application status, rendering as submitted"
                );
                Self::Submitted
            }
        }
    }

    /// [`Self::normalize`] over an optional value; a missing status is treated
    /// the same as an unknown one.
    pub fn normalize_opt(raw: Option<&str>) -> Self {
        match raw {
            Some(value) => Self::normalize(value),
            None => {
                tracing::warn!("missing application status, rendering as submitted");
                Self::Submitted
            }
        }
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Returned by the strict parser when a value is outside the closed set.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown application status '{0}'")]
pub struct UnknownStatus(pub String);

fn canonical_key(raw: &str) -> String {
    raw.trim()
        .chars()
        .map(|ch| match ch {
            '-' | ' ' => '_',
            other => other.to_ascii_lowercase(),
        })
        .collect()
}

impl FromStr for ApplicationStatus {
    type Err = UnknownStatus;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let status = match canonical_key(raw).as_str() {
            "invited" => Self::Invited,
            "submitted" | "applied" => Self::Submitted,
            "under_review" | "reviewing" | "screening" => Self::UnderReview,
            "shortlisted" | "shortlist" => Self::Shortlisted,
            "interview_scheduled" | "interview" => Self::InterviewScheduled,
            "interviewed" => Self::Interviewed,
            "offer_sent" | "offer" => Self::OfferSent,
            "hired" => Self::Hired,
            "rejected" | "declined" => Self::Rejected,
            _ => return Err(UnknownStatus(raw.to_string())),
        };
        Ok(status)
    }
}
