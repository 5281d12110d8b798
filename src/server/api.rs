//! Axum handlers for `/api/*` routes.
//!
//! Each handler receives [`AppState`] via [`axum::extract::State`] and
//! returns an axum [`Response`]. Provider errors are surfaced as JSON error
//! bodies with gateway status codes; the session keeps running.

use std::time::Duration;

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::warn;

use crate::annotation::{self, Annotation, Entity, Relation};

use super::AppState;

// ── Request / response types ──────────────────────────────────────────────────

#[derive(Deserialize)]
pub(super) struct AnnotateRequest {
    report: String,
    /// Optional per-request model override; falls back to the configured id.
    model: Option<String>,
}

#[derive(Serialize)]
struct AnnotateResponse {
    model: String,
    raw: Value,
    entities: Vec<Entity>,
    relations: Vec<Relation>,
    entities_csv: String,
    relations_csv: String,
}

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Build a JSON error response body.
fn json_error(code: &str, msg: impl std::fmt::Display) -> Json<Value> {
    Json(json!({ "error": code, "message": format!("{msg}") }))
}

// ── Handlers ──────────────────────────────────────────────────────────────────

/// POST /api/annotate
pub(super) async fn annotate(
    State(state): State<AppState>,
    Json(req): Json<AnnotateRequest>,
) -> Response {
    if req.report.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            json_error("bad_request", "report text is empty"),
        )
            .into_response();
    }

    let model_id = req
        .model
        .as_deref()
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .unwrap_or(&state.model_id)
        .to_string();

    let result = tokio::time::timeout(
        Duration::from_secs(120),
        state.provider.annotate(&req.report, &model_id),
    )
    .await;

    match result {
        Ok(Ok(raw)) => {
            let mut docs = annotation::normalize_outputs(raw);
            if docs.is_empty() {
                return (
                    StatusCode::BAD_GATEWAY,
                    json_error("empty_output", "model returned empty output"),
                )
                    .into_response();
            }
            // one report per request — the first document is the one
            let ann = Annotation::from_output(docs.remove(0));
            let entities_csv = annotation::entities_csv(&ann.entities);
            let relations_csv = annotation::relations_csv(&ann.relations);
            let body = AnnotateResponse {
                model: model_id,
                raw: ann.raw,
                entities: ann.entities,
                relations: ann.relations,
                entities_csv,
                relations_csv,
            };
            (StatusCode::OK, Json(body)).into_response()
        }
        Ok(Err(e)) => {
            warn!(%model_id, "annotation failed: {e}");
            (StatusCode::BAD_GATEWAY, json_error("inference_failed", e)).into_response()
        }
        Err(_) => (
            StatusCode::GATEWAY_TIMEOUT,
            json_error("timeout", "inference request timed out"),
        )
            .into_response(),
    }
}

/// GET /api/health — provider reachability probe.
pub(super) async fn health(State(state): State<AppState>) -> Response {
    match tokio::time::timeout(Duration::from_secs(5), state.provider.ping()).await {
        Ok(Ok(())) => (
            StatusCode::OK,
            Json(json!({
                "status": "ok",
                "provider": state.provider.name(),
                "model": &*state.model_id,
            })),
        )
            .into_response(),
        Ok(Err(e)) => {
            warn!("provider ping failed: {e}");
            degraded(&state, e.to_string())
        }
        Err(_) => degraded(&state, "reachability probe timed out".to_string()),
    }
}

fn degraded(state: &AppState, error: String) -> Response {
    (
        StatusCode::SERVICE_UNAVAILABLE,
        Json(json!({
            "status": "degraded",
            "provider": state.provider.name(),
            "model": &*state.model_id,
            "error": error,
        })),
    )
        .into_response()
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, header};
    use tower::util::ServiceExt;

    use crate::radgraph::AnnotatorProvider;
    use crate::radgraph::providers::dummy::DummyProvider;
    use crate::server::{AppState, build_router};

    fn test_router() -> axum::Router {
        build_router(AppState {
            provider: AnnotatorProvider::Dummy(DummyProvider),
            model_id: Arc::from("test-model"),
        })
    }

    fn post_json(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn annotate_returns_tables() {
        let req = post_json("/api/annotate", r#"{"report":"Small pleural effusion."}"#);
        let res = test_router().oneshot(req).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);

        let v = body_json(res).await;
        assert_eq!(v["model"], "test-model");
        assert_eq!(v["raw"]["text"], "Small pleural effusion.");
        assert_eq!(v["entities"].as_array().unwrap().len(), 3);
        assert_eq!(v["relations"].as_array().unwrap().len(), 2);
        assert!(
            v["entities_csv"]
                .as_str()
                .unwrap()
                .starts_with("id,text,label,start,end\n")
        );
        assert!(
            v["relations_csv"]
                .as_str()
                .unwrap()
                .starts_with("source,target,label\n")
        );
    }

    #[tokio::test]
    async fn annotate_model_override() {
        let req = post_json(
            "/api/annotate",
            r#"{"report":"Heart size normal.","model":"radgraph-base"}"#,
        );
        let res = test_router().oneshot(req).await.unwrap();
        let v = body_json(res).await;
        assert_eq!(v["model"], "radgraph-base");
    }

    #[tokio::test]
    async fn blank_report_rejected() {
        let req = post_json("/api/annotate", r#"{"report":"   "}"#);
        let res = test_router().oneshot(req).await.unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);

        let v = body_json(res).await;
        assert_eq!(v["error"], "bad_request");
    }

    #[tokio::test]
    async fn health_reports_ok_for_dummy() {
        let req = Request::builder()
            .uri("/api/health")
            .body(Body::empty())
            .unwrap();
        let res = test_router().oneshot(req).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);

        let v = body_json(res).await;
        assert_eq!(v["status"], "ok");
        assert_eq!(v["provider"], "dummy");
        assert_eq!(v["model"], "test-model");
    }

    #[tokio::test]
    async fn favicon_is_no_content() {
        let req = Request::builder()
            .uri("/favicon.ico")
            .body(Body::empty())
            .unwrap();
        let res = test_router().oneshot(req).await.unwrap();
        assert_eq!(res.status(), StatusCode::NO_CONTENT);
    }
}
