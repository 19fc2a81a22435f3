use std::sync::Arc;

use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use super::{DraftSession, DraftStore};
use crate::error::AppError;

#[derive(Debug, Serialize)]
pub(crate) struct DraftResponse {
    pub(crate) key: String,
    pub(crate) value: Value,
    pub(crate) dirty: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) last_saved: Option<DateTime<Utc>>,
}

impl DraftResponse {
    fn from_session(session: &DraftSession<Value>) -> Self {
        Self {
            key: session.key().to_string(),
            value: session.value().clone(),
            dirty: session.is_dirty(),
            last_saved: session.last_saved(),
        }
    }
}

/// Router persisting editor drafts through `store`.
pub fn draft_router<S>(store: Arc<S>) -> Router
where
    S: DraftStore + 'static,
{
    Router::new()
        .route(
            "/api/v1/drafts/:key",
            get(load_draft::<S>).put(save_draft::<S>),
        )
        .with_state(store)
}

pub(crate) async fn load_draft<S>(
    State(store): State<Arc<S>>,
    Path(key): Path<String>,
) -> Result<Json<DraftResponse>, AppError>
where
    S: DraftStore + 'static,
{
    let session = DraftSession::<Value>::load(store.as_ref(), key)?;
    Ok(Json(DraftResponse::from_session(&session)))
}

pub(crate) async fn save_draft<S>(
    State(store): State<Arc<S>>,
    Path(key): Path<String>,
    Json(value): Json<Value>,
) -> Result<Json<DraftResponse>, AppError>
where
    S: DraftStore + 'static,
{
    // A PUT replaces the whole draft, so whatever is stored (even an
    // unreadable payload) is never parsed.
    let mut session = DraftSession::<Value>::new(key)?;
    session.mutate(|current| *current = value);
    session.save(store.as_ref())?;
    debug!(key = session.key(), "draft saved");
    Ok(Json(DraftResponse::from_session(&session)))
}
