#![deny(unsafe_code)]

pub mod agent;

pub use agent::{AgentConfig, AgentError, AgentService, Generated, HealthReport, Method};

use axum::extract::rejection::JsonRejection;
use axum::extract::{DefaultBodyLimit, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;
use testgen::protocol::{AnalyzeRequest, AnalyzeResponse, ErrorBody, ResponseMetadata, MAX_REQUEST_BYTES};
use testgen::Framework;
use thiserror::Error;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

#[derive(Clone)]
pub struct AppState {
    pub agent: Arc<AgentService>,
}

impl AppState {
    pub fn new(config: AgentConfig) -> Self {
        Self {
            agent: Arc::new(AgentService::new(config)),
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(info))
        .route("/cline/health", get(agent_health))
        .route("/analyze", post(analyze))
        .layer(DefaultBodyLimit::max(MAX_REQUEST_BYTES))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{message}")]
    Http { status: StatusCode, message: String },
}

impl ApiError {
    fn bad_request(message: impl Into<String>) -> Self {
        Self::Http {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        let status = match rejection.status() {
            StatusCode::PAYLOAD_TOO_LARGE => StatusCode::PAYLOAD_TOO_LARGE,
            s if s.is_client_error() => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self::Http {
            status,
            message: rejection.body_text(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Http { status, message } => {
                (status, Json(ErrorBody { error: message })).into_response()
            }
        }
    }
}

#[derive(Debug, Clone, Serialize)]
struct InfoResponse {
    status: &'static str,
    version: &'static str,
    timestamp: String,
}

async fn info() -> Json<InfoResponse> {
    Json(InfoResponse {
        status: "Testgen API running",
        version: env!("CARGO_PKG_VERSION"),
        timestamp: Utc::now().to_rfc3339(),
    })
}

async fn agent_health(State(state): State<AppState>) -> Json<HealthReport> {
    Json(state.agent.health().await)
}

async fn analyze(
    State(state): State<AppState>,
    payload: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Result<Json<AnalyzeResponse>, ApiError> {
    let Json(request) = payload?;
    if request.file.name.trim().is_empty() {
        return Err(ApiError::bad_request("file.name is required"));
    }

    let framework = Framework::from_name(&request.framework);
    let generated = state
        .agent
        .generate(&request.file, framework, &request.options)
        .await;

    Ok(Json(AnalyzeResponse {
        success: true,
        generated_test: Some(generated.content),
        metadata: Some(ResponseMetadata {
            method: Some(generated.method.as_str().to_string()),
            source_file: Some(request.file.name),
            timestamp: Some(Utc::now().to_rfc3339()),
        }),
    }))
}
