use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use serde_json::json;
use std::sync::Arc;
use talent_pipeline::drafts::{draft_router, DraftStore};
use talent_pipeline::pipeline::{application_router, ApplicationRepository, PipelineService};

pub(crate) fn with_pipeline_routes<R, S>(
    service: Arc<PipelineService<R>>,
    drafts: Arc<S>,
) -> axum::Router
where
    R: ApplicationRepository + 'static,
    S: DraftStore + 'static,
{
    application_router(service)
        .merge(draft_router(drafts))
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let (status, label) = if ready {
        (StatusCode::OK, "ready")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "initializing")
    };

    (status, Json(json!({ "status": label })))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::InMemoryApplicationRepository;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use serde_json::Value;
    use talent_pipeline::drafts::MemoryDraftStore;
    use tower::ServiceExt;

    fn router() -> axum::Router {
        let service = Arc::new(PipelineService::new(Arc::new(
            InMemoryApplicationRepository::default(),
        )));
        with_pipeline_routes(service, Arc::new(MemoryDraftStore::default()))
    }

    #[tokio::test]
    async fn healthcheck_reports_ok() {
        let Json(body) = healthcheck().await;
        assert_eq!(body, json!({ "status": "ok" }));
    }

    #[tokio::test]
    async fn pipeline_and_draft_routes_are_mounted() {
        let router = router();

        let response = router
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/api/v1/pipeline/statuses/offer_sent")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("router dispatch");
        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), 64 * 1024)
            .await
            .expect("body");
        let payload: Value = serde_json::from_slice(&body).expect("json");
        assert_eq!(payload["position"]["index"], json!(5));

        let response = router
            .oneshot(
                Request::builder()
                    .uri("/api/v1/drafts/resume-builder")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("router dispatch");
        assert_eq!(response.status(), StatusCode::OK);
    }
}
