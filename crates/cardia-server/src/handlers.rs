//! HTTP request handlers for the explanation service.
//!
//! Implements the banner, status and explain endpoints using axum.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router as AxumRouter,
};
use cardia_domain::{ExplainResponse, GenerationRequest, TextGenerator};
use cardia_explainer::{ExplainError, Explainer};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

/// Service name reported by the banner
pub const SERVICE_NAME: &str = "Cardia LLM";

/// Shared application state
pub struct AppState<G> {
    /// The explanation pipeline
    pub explainer: Arc<Explainer<G>>,
    /// Backend endpoint reported by the status query
    pub backend_endpoint: String,
    /// Caller-side limit on a whole explain request
    pub request_timeout: Duration,
}

// Manual impl: G itself need not be Clone
impl<G> Clone for AppState<G> {
    fn clone(&self) -> Self {
        Self {
            explainer: Arc::clone(&self.explainer),
            backend_endpoint: self.backend_endpoint.clone(),
            request_timeout: self.request_timeout,
        }
    }
}

/// Service banner
#[derive(Debug, Serialize, Deserialize)]
pub struct BannerResponse {
    /// Service name
    pub service: String,
    /// Model identity
    pub model: String,
    /// "running" or "not loaded"
    pub status: String,
}

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// "healthy" or "not loaded"
    pub status: String,
    /// Whether the generation backend is initialized
    pub model_loaded: bool,
    /// Model identity attached to explanations
    pub model_name: String,
    /// Backend identity, when initialized
    pub backend: Option<String>,
    /// Where the backend is reached
    pub backend_endpoint: String,
    /// RFC 3339 UTC timestamp
    pub timestamp: String,
}

/// Error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}

/// Application error type
#[derive(Debug)]
pub enum AppError {
    /// Pipeline error
    Explain(ExplainError),
    /// The request outlived the caller-side timeout
    Timeout(Duration),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::Explain(e @ ExplainError::BackendUnavailable) => {
                (StatusCode::SERVICE_UNAVAILABLE, e.to_string())
            }
            AppError::Explain(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
            AppError::Timeout(limit) => (
                StatusCode::GATEWAY_TIMEOUT,
                format!("Explanation timed out after {}s", limit.as_secs()),
            ),
        };

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}

impl From<ExplainError> for AppError {
    fn from(e: ExplainError) -> Self {
        AppError::Explain(e)
    }
}

/// GET / - Service banner
async fn root<G>(State(state): State<AppState<G>>) -> Json<BannerResponse>
where
    G: TextGenerator + Send + Sync + 'static,
    G::Error: Display,
{
    let ready = state.explainer.status().ready;
    Json(BannerResponse {
        service: SERVICE_NAME.to_string(),
        model: state.explainer.model_identity().to_string(),
        status: if ready { "running" } else { "not loaded" }.to_string(),
    })
}

/// GET /health - Status query
async fn health_check<G>(State(state): State<AppState<G>>) -> Json<HealthResponse>
where
    G: TextGenerator + Send + Sync + 'static,
    G::Error: Display,
{
    let status = state.explainer.status();
    Json(HealthResponse {
        status: status.label().to_string(),
        model_loaded: status.ready,
        model_name: state.explainer.model_identity().to_string(),
        backend: status.backend,
        backend_endpoint: state.backend_endpoint.clone(),
        timestamp: Utc::now().to_rfc3339(),
    })
}

/// POST /explain - Structured explanation for a prediction
async fn explain<G>(
    State(state): State<AppState<G>>,
    Json(request): Json<GenerationRequest>,
) -> Result<Json<ExplainResponse>, AppError>
where
    G: TextGenerator + Send + Sync + 'static,
    G::Error: Display,
{
    let response = tokio::time::timeout(state.request_timeout, state.explainer.explain(&request))
        .await
        .map_err(|_| {
            warn!(
                "Explain request exceeded {}s caller-side timeout",
                state.request_timeout.as_secs()
            );
            AppError::Timeout(state.request_timeout)
        })??;

    Ok(Json(response))
}

/// Create the axum router with all routes
pub fn create_router<G>(state: AppState<G>) -> AxumRouter
where
    G: TextGenerator + Send + Sync + 'static,
    G::Error: Display,
{
    AxumRouter::new()
        .route("/", get(root::<G>))
        .route("/health", get(health_check::<G>))
        .route("/explain", post(explain::<G>))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use cardia_explainer::GeneratorAdapter;
    use cardia_llm::MockProvider;
    use tower::ServiceExt; // for oneshot

    fn create_test_state(adapter: GeneratorAdapter<MockProvider>) -> AppState<MockProvider> {
        AppState {
            explainer: Arc::new(Explainer::with_defaults(adapter)),
            backend_endpoint: "http://localhost:11434".to_string(),
            request_timeout: Duration::from_secs(5),
        }
    }

    #[tokio::test]
    async fn test_health_check() {
        let state = create_test_state(GeneratorAdapter::with_backend(MockProvider::new("ok")));
        let app = create_router(state);

        let request = Request::builder()
            .uri("/health")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_root_banner() {
        let state = create_test_state(GeneratorAdapter::uninitialized());
        let app = create_router(state);

        let request = Request::builder().uri("/").body(Body::empty()).unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let banner: BannerResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(banner.service, SERVICE_NAME);
        assert_eq!(banner.status, "not loaded");
    }

    #[tokio::test]
    async fn test_explain() {
        let state = create_test_state(GeneratorAdapter::with_backend(MockProvider::new("")));
        let app = create_router(state);

        let request = Request::builder()
            .method("POST")
            .uri("/explain")
            .header("content-type", "application/json")
            .body(Body::from(r#"{"prompt": "Explain this risk"}"#))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[test]
    fn test_error_status_codes() {
        let unavailable = AppError::Explain(ExplainError::BackendUnavailable).into_response();
        assert_eq!(unavailable.status(), StatusCode::SERVICE_UNAVAILABLE);

        let failed =
            AppError::Explain(ExplainError::GenerationFailure("boom".to_string())).into_response();
        assert_eq!(failed.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let timed_out = AppError::Timeout(Duration::from_secs(3)).into_response();
        assert_eq!(timed_out.status(), StatusCode::GATEWAY_TIMEOUT);
    }
}
