//! HTTP routes and handlers

use axum::{
    extract::{rejection::JsonRejection, DefaultBodyLimit, State},
    http::{HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::json;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use toxguard_core::{AnalysisResult, ModelStatus};
use tracing::{debug, error, info, warn};

use crate::config::ServerConfig;
use crate::state::AppState;

pub fn create_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config);
    let body_limit = state.config.max_body_bytes;

    Router::new()
        .route("/api/ai/health", get(health_check))
        .route("/api/ai/analyze", post(analyze))
        .route("/api/ai/analyze/batch", post(analyze_batch))
        .route("/metrics", get(metrics))
        .fallback(fallback)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(config: &ServerConfig) -> CorsLayer {
    if config.cors_allow_any_origin {
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
    }

    let origins: Vec<HeaderValue> = config
        .cors_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Single analyze request
///
/// The outer `Option` is key presence; an explicit `null` is `Some(None)`.
#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    #[serde(default, deserialize_with = "present")]
    pub text: Option<Option<String>>,
}

fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

/// Batch analyze request
#[derive(Debug, Deserialize)]
pub struct BatchAnalyzeRequest {
    #[serde(default)]
    pub texts: Option<Vec<String>>,
}

/// Successful response envelope
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
}

impl<T> ApiResponse<T> {
    fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub success: bool,
    pub message: &'static str,
    pub models: ModelStatus,
}

async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        success: true,
        message: "AI Service is running",
        models: state.analyzer.model_status(),
    })
}

async fn metrics(State(state): State<AppState>) -> Response {
    match &state.metrics_handle {
        Some(handle) => handle.render().into_response(),
        None => (StatusCode::NOT_FOUND, "Metrics exporter not installed").into_response(),
    }
}

/// Analyze one text for toxicity and emotion
async fn analyze(
    State(state): State<AppState>,
    payload: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<AnalysisResult>>, AppError> {
    metrics::counter!("toxguard_requests_total", "endpoint" => "analyze").increment(1);

    let Json(req) = payload?;
    let text = req
        .text
        .ok_or_else(|| AppError::InvalidRequest("Missing 'text' field in request body".into()))?;

    let text = match text {
        Some(text) if !text.trim().is_empty() => text,
        _ => return Err(AppError::InvalidRequest("Text is empty".into())),
    };

    let analyzer = state.analyzer.clone();
    let result = tokio::task::spawn_blocking(move || analyzer.analyze(&text)).await?;

    info!(
        is_toxic = result.is_toxic,
        toxic_score = result.toxic_score,
        toxic_type = %result.toxic_type,
        "AI result"
    );

    Ok(Json(ApiResponse::ok(result)))
}

/// Analyze several texts; results keep the input order
async fn analyze_batch(
    State(state): State<AppState>,
    payload: Result<Json<BatchAnalyzeRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<Vec<AnalysisResult>>>, AppError> {
    metrics::counter!("toxguard_requests_total", "endpoint" => "analyze_batch").increment(1);

    let Json(req) = payload?;
    let texts = req
        .texts
        .ok_or_else(|| AppError::InvalidRequest("Missing 'texts' array in request body".into()))?;

    debug!("Analyzing batch of {} texts", texts.len());

    let analyzer = state.analyzer.clone();
    let results = tokio::task::spawn_blocking(move || analyzer.analyze_batch(&texts)).await?;

    Ok(Json(ApiResponse::ok(results)))
}

async fn fallback() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "success": false,
            "message": "Not found",
        })),
    )
        .into_response()
}

/// Error handling
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    InvalidRequest(String),

    #[error("{0}")]
    InternalError(String),
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::InvalidRequest(rejection.body_text())
    }
}

impl From<tokio::task::JoinError> for AppError {
    fn from(err: tokio::task::JoinError) -> Self {
        AppError::InternalError(err.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, kind) = match &self {
            AppError::InvalidRequest(_) => (StatusCode::BAD_REQUEST, "invalid_request"),
            AppError::InternalError(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal"),
        };

        if status.is_server_error() {
            error!("Error in analyze endpoint: {}", self);
        } else {
            debug!("Rejected request: {}", self);
        }
        metrics::counter!("toxguard_errors_total", "kind" => kind).increment(1);

        let body = json!({
            "success": false,
            "message": self.to_string(),
        });

        (status, Json(body)).into_response()
    }
}
