use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, patch, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;
use tracing::warn;

use super::actions::ActionKind;
use super::domain::{Application, ApplicationId, NewApplication};
use super::repository::{ApplicationRepository, RepositoryError};
use super::service::{PipelineService, PipelineServiceError};
use super::status::ApplicationStatus;
use super::view::{ApplicationView, StatusOverview};

const DEFAULT_ACTOR: &str = "recruiter";

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ListQuery {
    #[serde(default)]
    pub(crate) status: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ActionRequest {
    pub(crate) action: ActionKind,
    #[serde(default)]
    pub(crate) actor: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RejectRequest {
    #[serde(default)]
    pub(crate) reason: String,
    #[serde(default)]
    pub(crate) rejected_by: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct NotesRequest {
    pub(crate) notes: String,
    #[serde(default)]
    pub(crate) actor: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ExternalStatusRequest {
    pub(crate) status: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ReleaseRequest {
    #[serde(default)]
    pub(crate) actor: Option<String>,
}

/// Router exposing the pipeline model and the recruiter action endpoints.
pub fn application_router<R>(service: Arc<PipelineService<R>>) -> Router
where
    R: ApplicationRepository + 'static,
{
    Router::new()
        .route(
            "/api/v1/pipeline/statuses/:status",
            get(status_overview_handler),
        )
        .route("/api/v1/pipeline/summary", get(summary_handler::<R>))
        .route(
            "/api/v1/applications",
            post(create_handler::<R>).get(list_handler::<R>),
        )
        .route(
            "/api/v1/applications/:application_id",
            get(get_handler::<R>),
        )
        .route(
            "/api/v1/applications/:application_id/actions",
            post(action_handler::<R>),
        )
        .route(
            "/api/v1/applications/:application_id/reject",
            post(reject_handler::<R>),
        )
        .route(
            "/api/v1/applications/:application_id/notes",
            patch(notes_handler::<R>),
        )
        .route(
            "/api/v1/applications/:application_id/status",
            post(external_status_handler::<R>),
        )
        .route(
            "/api/v1/applications/:application_id/release",
            post(release_handler::<R>),
        )
        .with_state(service)
}

pub(crate) async fn status_overview_handler(Path(status): Path<String>) -> Response {
    let overview = StatusOverview::for_raw(&status);
    (StatusCode::OK, axum::Json(overview)).into_response()
}

pub(crate) async fn summary_handler<R>(
    State(service): State<Arc<PipelineService<R>>>,
) -> Response
where
    R: ApplicationRepository + 'static,
{
    match service.summary() {
        Ok(summary) => (StatusCode::OK, axum::Json(summary)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn create_handler<R>(
    State(service): State<Arc<PipelineService<R>>>,
    axum::Json(intake): axum::Json<NewApplication>,
) -> Response
where
    R: ApplicationRepository + 'static,
{
    match service.create(intake) {
        Ok(application) => (
            StatusCode::CREATED,
            axum::Json(ApplicationView::from(application)),
        )
            .into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn list_handler<R>(
    State(service): State<Arc<PipelineService<R>>>,
    Query(query): Query<ListQuery>,
) -> Response
where
    R: ApplicationRepository + 'static,
{
    let filter = match query.status.as_deref() {
        None | Some("all") => None,
        Some(raw) => match raw.parse::<ApplicationStatus>() {
            Ok(status) => Some(status),
            Err(err) => return error_response(err.into()),
        },
    };

    match service.list(filter) {
        Ok(applications) => {
            let views: Vec<ApplicationView> =
                applications.into_iter().map(ApplicationView::from).collect();
            (StatusCode::OK, axum::Json(views)).into_response()
        }
        Err(err) => error_response(err),
    }
}

pub(crate) async fn get_handler<R>(
    State(service): State<Arc<PipelineService<R>>>,
    Path(application_id): Path<String>,
) -> Response
where
    R: ApplicationRepository + 'static,
{
    respond_with_view(service.get(&ApplicationId(application_id)))
}

pub(crate) async fn action_handler<R>(
    State(service): State<Arc<PipelineService<R>>>,
    Path(application_id): Path<String>,
    axum::Json(request): axum::Json<ActionRequest>,
) -> Response
where
    R: ApplicationRepository + 'static,
{
    let actor = request.actor.as_deref().unwrap_or(DEFAULT_ACTOR);
    let id = ApplicationId(application_id);
    respond_with_view(service.apply_action(&id, request.action, actor))
}

pub(crate) async fn reject_handler<R>(
    State(service): State<Arc<PipelineService<R>>>,
    Path(application_id): Path<String>,
    axum::Json(request): axum::Json<RejectRequest>,
) -> Response
where
    R: ApplicationRepository + 'static,
{
    let actor = request.rejected_by.as_deref().unwrap_or(DEFAULT_ACTOR);
    let id = ApplicationId(application_id);
    respond_with_view(service.reject(&id, &request.reason, actor))
}

pub(crate) async fn notes_handler<R>(
    State(service): State<Arc<PipelineService<R>>>,
    Path(application_id): Path<String>,
    axum::Json(request): axum::Json<NotesRequest>,
) -> Response
where
    R: ApplicationRepository + 'static,
{
    let actor = request.actor.as_deref().unwrap_or(DEFAULT_ACTOR);
    let id = ApplicationId(application_id);
    respond_with_view(service.update_notes(&id, &request.notes, actor))
}

pub(crate) async fn external_status_handler<R>(
    State(service): State<Arc<PipelineService<R>>>,
    Path(application_id): Path<String>,
    axum::Json(request): axum::Json<ExternalStatusRequest>,
) -> Response
where
    R: ApplicationRepository + 'static,
{
    let id = ApplicationId(application_id);
    respond_with_view(service.sync_external_raw(&id, &request.status))
}

pub(crate) async fn release_handler<R>(
    State(service): State<Arc<PipelineService<R>>>,
    Path(application_id): Path<String>,
    request: Option<axum::Json<ReleaseRequest>>,
) -> Response
where
    R: ApplicationRepository + 'static,
{
    let actor = request
        .and_then(|axum::Json(body)| body.actor)
        .unwrap_or_else(|| DEFAULT_ACTOR.to_string());
    let id = ApplicationId(application_id);
    respond_with_view(service.release_to_client(&id, &actor))
}

fn respond_with_view(result: Result<Application, PipelineServiceError>) -> Response {
    match result {
        Ok(application) => {
            let view = ApplicationView::from(application);
            (StatusCode::OK, axum::Json(view)).into_response()
        }
        Err(err) => error_response(err),
    }
}

pub(crate) fn error_response(err: PipelineServiceError) -> Response {
    let status = match &err {
        PipelineServiceError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        PipelineServiceError::Repository(RepositoryError::Conflict | RepositoryError::Stale)
        | PipelineServiceError::ActionNotAllowed { .. }
        | PipelineServiceError::HandledElsewhere { .. }
        | PipelineServiceError::TerminalStatus(_)
        | PipelineServiceError::ReleaseNotAllowed(_) => StatusCode::CONFLICT,
        PipelineServiceError::RejectionReasonRequired => StatusCode::UNPROCESSABLE_ENTITY,
        PipelineServiceError::UnknownStatus(_) => StatusCode::BAD_REQUEST,
        PipelineServiceError::Repository(RepositoryError::Unavailable(_)) => {
            warn!(error = %err, "pipeline repository unavailable");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };

    let payload = json!({ "error": err.to_string() });
    (status, axum::Json(payload)).into_response()
}
