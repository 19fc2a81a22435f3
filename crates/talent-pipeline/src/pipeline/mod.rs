//! Application pipeline: the status model that drives the recruiter stepper
//! and action buttons, plus the service that enforces it on writes.
//!
//! The model half (`status`, `stage`, `actions`, `style`) is pure and owns no
//! state. The status field itself is owned by whoever stores the
//! application; offers, contracts and interview completion move it
//! out-of-band through [`PipelineService::sync_external_status`].

pub mod actions;
pub mod domain;
pub mod repository;
pub mod router;
pub mod service;
pub mod stage;
pub mod status;
pub mod style;
pub mod view;

#[cfg(test)]
mod tests;

pub use actions::{is_legal, legal_actions, ActionKind};
pub use domain::{
    ActivityEntry, ActivityKind, Application, ApplicationId, ApplicationProjection, CandidateId,
    ChangeOrigin, JobId, NewApplication, Rejection,
};
pub use repository::{ApplicationRepository, RepositoryError};
pub use router::application_router;
pub use service::{PipelineService, PipelineServiceError};
pub use stage::{stage_index, stage_index_raw, stepper, StagePosition, StepState, StepView};
pub use status::{ApplicationStatus, UnknownStatus};
pub use style::{style_for, style_for_raw, StatusStyle};
pub use view::{ActionView, ApplicationView, PipelineSummary, StatusOverview};
