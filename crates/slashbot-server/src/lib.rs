//! GitHub webhook receiver.
//!
//! Exposes `POST /webhook` for GitHub deliveries and `GET /health`. Each
//! delivery is decoded from its `X-GitHub-Event` tag and handed to the
//! dispatcher on the blocking thread pool, since handlers call the GitHub
//! API synchronously.

use anyhow::{Result, anyhow};
use axum::{
    Json, Router,
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, post},
};
use serde::Serialize;
use slashbot_core::{CoreError, DispatchReport, Dispatcher, RawEvent};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use uuid::Uuid;

const EVENT_HEADER: &str = "x-github-event";
const DELIVERY_HEADER: &str = "x-github-delivery";

/// Server state shared across handlers.
struct AppState {
    dispatcher: Dispatcher,
}

/// Build the application router.
pub fn router(dispatcher: Dispatcher) -> Router {
    let state = Arc::new(AppState { dispatcher });

    Router::new()
        .route("/health", get(health))
        .route("/webhook", post(webhook))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the webhook receiver.
///
/// # Errors
/// Returns error if binding fails or server encounters an error.
pub async fn serve(dispatcher: Dispatcher, host: &str, port: u16) -> Result<()> {
    let app = router(dispatcher);

    let addr = format!("{host}:{port}");
    info!(address = %addr, "Starting webhook receiver");

    let listener = TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// --- Response types ---

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

#[derive(Debug, Serialize)]
struct WebhookResponse {
    delivery: String,
    event: String,
    report: DispatchReport,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

// --- Handlers ---

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

fn header<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

async fn webhook(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<WebhookResponse>, AppError> {
    let kind = header(&headers, EVENT_HEADER)
        .ok_or_else(|| AppError::bad_request(anyhow!("missing {EVENT_HEADER} header")))?
        .to_string();
    let delivery = header(&headers, DELIVERY_HEADER)
        .map_or_else(|| Uuid::new_v4().to_string(), str::to_string);

    info!(delivery = %delivery, event = %kind, bytes = body.len(), "Webhook received");

    let event = RawEvent::from_webhook(&kind, &body)?;
    let dispatcher = state.dispatcher.clone();
    let report = tokio::task::spawn_blocking(move || dispatcher.dispatch(&event)).await?;

    if !report.is_success() {
        warn!(delivery = %delivery, failed = report.failed.len(), "Some handlers failed");
    }

    Ok(Json(WebhookResponse {
        delivery,
        event: kind,
        report,
    }))
}

// --- Error handling ---

struct AppError {
    status: StatusCode,
    error: anyhow::Error,
}

impl AppError {
    fn bad_request(error: anyhow::Error) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            error,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        warn!(status = self.status.as_u16(), error = %self.error, "Webhook rejected");

        let body = Json(ErrorResponse {
            error: self.error.to_string(),
        });

        (self.status, body).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        let error = err.into();
        let status = if error.downcast_ref::<CoreError>().is_some() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };
        Self { status, error }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{Body, to_bytes};
    use axum::http::Request;
    use serde_json::{Value, json};
    use slashbot_core::{ActorOptions, Gateway, GatewayResult, RepoRef};
    use std::collections::BTreeSet;
    use std::sync::Mutex;
    use tower::ServiceExt;

    /// Knows every label and records added ones.
    #[derive(Default)]
    struct RecordingGateway {
        added: Mutex<Vec<String>>,
    }

    impl Gateway for RecordingGateway {
        fn list_repository_labels(&self, _repo: &RepoRef) -> GatewayResult<BTreeSet<String>> {
            Ok(BTreeSet::from(["area/bugfix".to_string(), "area/enhancement".to_string()]))
        }

        fn list_item_labels(
            &self,
            _repo: &RepoRef,
            _number: u64,
        ) -> GatewayResult<BTreeSet<String>> {
            Ok(BTreeSet::new())
        }

        fn add_label(&self, _repo: &RepoRef, _number: u64, label: &str) -> GatewayResult<()> {
            self.added.lock().unwrap().push(label.to_string());
            Ok(())
        }

        fn remove_label(&self, _repo: &RepoRef, _number: u64, _label: &str) -> GatewayResult<()> {
            Ok(())
        }

        fn request_reviewers(
            &self,
            _repo: &RepoRef,
            _number: u64,
            _reviewers: &[String],
        ) -> GatewayResult<u16> {
            Ok(201)
        }

        fn remove_reviewers(
            &self,
            _repo: &RepoRef,
            _number: u64,
            _reviewers: &[String],
        ) -> GatewayResult<()> {
            Ok(())
        }

        fn post_comment(&self, _repo: &RepoRef, _number: u64, _body: &str) -> GatewayResult<()> {
            Ok(())
        }
    }

    fn app(gateway: &Arc<RecordingGateway>) -> Router {
        router(Dispatcher::new(gateway.clone(), ActorOptions::default()))
    }

    fn pull_request_comment(body: &str) -> Value {
        json!({
            "action": "created",
            "issue": {
                "id": 9001,
                "number": 7,
                "title": "Add retry budget",
                "state": "open",
                "labels": [],
                "pull_request": { "url": "https://api.github.com/repos/acme/widgets/pulls/7" }
            },
            "comment": { "id": 1, "body": body, "user": { "login": "alice" } },
            "repository": { "full_name": "acme/widgets", "name": "widgets" }
        })
    }

    fn delivery(kind: Option<&str>, body: &Value) -> Request<Body> {
        let mut request = Request::builder()
            .method("POST")
            .uri("/webhook")
            .header("content-type", "application/json")
            .header(DELIVERY_HEADER, "d-123");
        if let Some(kind) = kind {
            request = request.header(EVENT_HEADER, kind);
        }
        request.body(Body::from(body.to_string())).unwrap()
    }

    async fn json_body(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let gateway = Arc::new(RecordingGateway::default());
        let response = app(&gateway)
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["status"], "ok");
    }

    #[tokio::test]
    async fn test_area_comment_is_dispatched() {
        let gateway = Arc::new(RecordingGateway::default());
        let response = app(&gateway)
            .oneshot(delivery(
                Some("issue_comment"),
                &pull_request_comment("/area bugfix enhancement"),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["delivery"], "d-123");
        assert_eq!(body["event"], "issue_comment");
        assert_eq!(body["report"]["captured"], json!(["area"]));
        assert_eq!(
            *gateway.added.lock().unwrap(),
            vec!["area/bugfix".to_string(), "area/enhancement".to_string()]
        );
    }

    #[tokio::test]
    async fn test_missing_event_header() {
        let gateway = Arc::new(RecordingGateway::default());
        let response = app(&gateway)
            .oneshot(delivery(None, &pull_request_comment("/area bugfix")))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(gateway.added.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_malformed_payload() {
        let gateway = Arc::new(RecordingGateway::default());
        let response = app(&gateway)
            .oneshot(delivery(Some("issue_comment"), &json!({ "action": "created" })))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert!(body["error"].as_str().unwrap().contains("issue_comment"));
    }

    #[tokio::test]
    async fn test_unsupported_event_is_acknowledged() {
        let gateway = Arc::new(RecordingGateway::default());
        let response = app(&gateway)
            .oneshot(delivery(Some("push"), &json!({ "ref": "refs/heads/main" })))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["report"]["captured"], json!([]));
    }
}
