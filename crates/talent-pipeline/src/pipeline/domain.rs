use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::actions::{legal_actions, ActionKind};
use super::stage::{stage_index, StagePosition};
use super::status::ApplicationStatus;
use super::style::{style_for, StatusStyle};

/// Identifier wrapper for candidate applications.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ApplicationId(pub String);

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CandidateId(pub String);

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JobId(pub String);

/// Denormalized display data supplied by the read side. Treated as opaque:
/// nothing in the pipeline writes to it after intake.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApplicationProjection {
    pub candidate_name: String,
    pub candidate_email: String,
    #[serde(default)]
    pub has_resume: bool,
    #[serde(default)]
    pub ai_score: Option<u8>,
    #[serde(default)]
    pub skills: Vec<String>,
}

/// Intake payload from the system that owns candidate submissions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewApplication {
    pub candidate_id: CandidateId,
    pub job_id: JobId,
    /// Agency-initiated applications start as `invited` instead of `submitted`.
    #[serde(default)]
    pub agency_initiated: bool,
    #[serde(default)]
    pub projection: ApplicationProjection,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeOrigin {
    Recruiter,
    /// Offer, contract and interview subsystems updating status out-of-band.
    External,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ActivityKind {
    StatusChanged {
        from: ApplicationStatus,
        to: ApplicationStatus,
    },
    NoteAdded,
    ReleasedToClient,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityEntry {
    pub kind: ActivityKind,
    pub origin: ChangeOrigin,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actor: Option<String>,
    pub at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rejection {
    pub reason: String,
    pub rejected_by: String,
    pub rejected_at: DateTime<Utc>,
}

/// One candidate's submission against one job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Application {
    pub id: ApplicationId,
    pub candidate_id: CandidateId,
    pub job_id: JobId,
    pub status: ApplicationStatus,
    pub applied_at: DateTime<Utc>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub reviewed_by: Option<String>,
    pub released_at: Option<DateTime<Utc>>,
    pub recruiter_notes: Option<String>,
    pub rejection: Option<Rejection>,
    pub projection: ApplicationProjection,
    #[serde(default)]
    pub timeline: Vec<ActivityEntry>,
    /// Bumped on every write; guards against lost updates.
    #[serde(default)]
    pub version: u64,
}

impl Application {
    pub fn from_intake(
        id: ApplicationId,
        intake: NewApplication,
        applied_at: DateTime<Utc>,
    ) -> Self {
        let status = if intake.agency_initiated {
            ApplicationStatus::Invited
        } else {
            ApplicationStatus::Submitted
        };

        Self {
            id,
            candidate_id: intake.candidate_id,
            job_id: intake.job_id,
            status,
            applied_at,
            reviewed_at: None,
            reviewed_by: None,
            released_at: None,
            recruiter_notes: None,
            rejection: None,
            projection: intake.projection,
            timeline: Vec::new(),
            version: 0,
        }
    }

    pub fn stage(&self) -> StagePosition {
        stage_index(self.status)
    }

    pub fn legal_actions(&self) -> Vec<ActionKind> {
        legal_actions(self.status)
    }

    pub fn style(&self) -> StatusStyle {
        style_for(self.status)
    }

    pub(crate) fn record(
        &mut self,
        kind: ActivityKind,
        origin: ChangeOrigin,
        actor: Option<&str>,
        at: DateTime<Utc>,
    ) {
        self.timeline.push(ActivityEntry {
            kind,
            origin,
            actor: actor.map(str::to_string),
            at,
        });
    }

    pub(crate) fn stamp_review(&mut self, actor: &str, at: DateTime<Utc>) {
        self.reviewed_at = Some(at);
        self.reviewed_by = Some(actor.to_string());
    }
}
