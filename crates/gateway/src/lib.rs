//! HTTP front door for the history examiner.
//!
//! Two routes:
//! - `GET /health` liveness check
//! - `POST /ask-ai` form-encoded `query` and optional `marks`, answered as
//!   JSON `{answer, marks}`
//!
//! Built on Axum. Generation problems never surface as HTTP errors; the
//! answer text carries them.

pub mod service;

pub use service::{Answer, AnswerService, DEFAULT_MARKS};

use axum::extract::DefaultBodyLimit;
use axum::{
    Form, Router,
    extract::State,
    response::Json,
    routing::{get, post},
};
use examiner_context::SelectionLimits;
use examiner_providers::Dispatcher;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::{Instrument, info, info_span};

type SharedService = Arc<AnswerService>;

/// Request body limit for `/ask-ai`.
const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Build the Axum router around a ready answer service.
///
/// Layers applied:
/// - CORS allowing any origin
/// - Request body size limit (1 MB)
/// - HTTP trace logging
pub fn build_router(service: SharedService) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/ask-ai", post(ask_handler))
        .with_state(service)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(CorsLayer::permissive())
        .layer(tower_http::trace::TraceLayer::new_for_http())
}

/// Start the gateway HTTP server.
///
/// Loads the knowledge store and builds the provider clients once; both are
/// shared read-only by every request.
pub async fn start(config: examiner_config::AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let addr = format!("{}:{}", config.gateway.host, config.gateway.port);

    let store = examiner_context::store::load(&config.knowledge.path)?;
    let dispatcher = Dispatcher::from_config(&config.providers)?;
    if !dispatcher.primary_configured() && !dispatcher.secondary_configured() {
        tracing::warn!("No generation provider has an API key; answers will report offline");
    }

    let service = Arc::new(AnswerService::new(
        Arc::new(store),
        SelectionLimits::from(&config.selection),
        Arc::new(dispatcher),
    ));

    let app = build_router(service);

    info!(addr = %addr, "Gateway starting");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// --- Handlers ---

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

#[derive(Deserialize)]
struct AskForm {
    query: String,
    #[serde(default = "default_marks")]
    marks: i64,
}

fn default_marks() -> i64 {
    DEFAULT_MARKS
}

async fn ask_handler(
    State(service): State<SharedService>,
    Form(form): Form<AskForm>,
) -> Json<Answer> {
    let request_id = uuid::Uuid::new_v4();
    let span = info_span!("ask", %request_id, marks = form.marks);

    async move {
        info!(query_len = form.query.len(), "Question received");
        let answer = service.answer(&form.query, form.marks).await;
        info!(answer_len = answer.answer.len(), "Answer returned");
        Json(answer)
    }
    .instrument(span)
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use examiner_core::knowledge::KnowledgeStore;
    use examiner_providers::OFFLINE_MESSAGE;
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    fn offline_app() -> Router {
        let service = AnswerService::new(
            Arc::new(KnowledgeStore::default()),
            SelectionLimits::default(),
            Arc::new(Dispatcher::new(None, None)),
        );
        build_router(Arc::new(service))
    }

    fn ask(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/ask-ai")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn json_body(response: axum::response::Response) -> serde_json::Value {
        let body = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn health_endpoint() {
        let req = Request::builder()
            .uri("/health")
            .body(Body::empty())
            .unwrap();

        let response = offline_app().oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = json_body(response).await;
        assert_eq!(json["status"], "ok");
        assert!(json["version"].is_string());
    }

    #[tokio::test]
    async fn ask_defaults_marks_to_four() {
        let response = offline_app()
            .oneshot(ask("query=Who+was+Jinnah%3F"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = json_body(response).await;
        assert_eq!(json["marks"], 4);
        assert_eq!(json["answer"], OFFLINE_MESSAGE);
    }

    #[tokio::test]
    async fn ask_echoes_requested_marks() {
        let response = offline_app()
            .oneshot(ask("query=Explain+partition&marks=14"))
            .await
            .unwrap();
        let json = json_body(response).await;
        assert_eq!(json["marks"], 14);
    }

    #[tokio::test]
    async fn negative_marks_pass_through_unvalidated() {
        let response = offline_app()
            .oneshot(ask("query=q&marks=-3"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = json_body(response).await;
        assert_eq!(json["marks"], -3);
    }

    #[tokio::test]
    async fn missing_query_is_rejected() {
        let response = offline_app().oneshot(ask("marks=7")).await.unwrap();
        assert!(response.status().is_client_error());
    }

    #[tokio::test]
    async fn non_numeric_marks_is_rejected() {
        let response = offline_app()
            .oneshot(ask("query=q&marks=lots"))
            .await
            .unwrap();
        assert!(response.status().is_client_error());
    }

    #[tokio::test]
    async fn cors_allows_any_origin() {
        let req = Request::builder()
            .uri("/health")
            .header(header::ORIGIN, "https://example.org")
            .body(Body::empty())
            .unwrap();
        let response = offline_app().oneshot(req).await.unwrap();
        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "*"
        );
    }
}
