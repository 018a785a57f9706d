//! HTTP routes.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use promptplay_shared::{
    ErrorCode, ErrorResponse, HealthResponse, ResolveRequest, ResolveResponse, VariationRequest,
    VariationResponse,
};
use std::sync::Arc;

use crate::app::App;
use crate::use_cases::scene::ResolveError;

/// Create all HTTP routes.
pub fn routes() -> Router<Arc<App>> {
    Router::new()
        .route("/", get(health))
        .route("/api/health", get(health))
        .route("/api/scenes/resolve", post(resolve_scene))
        .route("/api/variations", post(vary_options))
}

async fn health(State(app): State<Arc<App>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        live_enabled: app.use_cases.scene.resolve.live_enabled(),
        stages: app.library.task_ids(),
    })
}

async fn resolve_scene(
    State(app): State<Arc<App>>,
    Json(request): Json<ResolveRequest>,
) -> Result<Json<ResolveResponse>, ApiError> {
    if request.session_id.trim().is_empty() {
        return Err(ApiError::BadRequest("session_id is required".to_string()));
    }
    if request.task_id.trim().is_empty() {
        return Err(ApiError::BadRequest("task_id is required".to_string()));
    }

    let resolved = app.use_cases.scene.resolve.execute(&request).await?;
    Ok(Json(ResolveResponse {
        request_id: resolved.request_id.to_uuid(),
        offline: resolved.source.is_offline(),
        script: resolved.script,
        source: resolved.source,
        latency_ms: resolved.latency_ms,
        vignette_id: resolved.vignette_id,
        resolved_at: app.clock.now(),
    }))
}

/// Reword tile options. An empty `base` is filled from the stage's slot options.
async fn vary_options(
    State(app): State<Arc<App>>,
    Json(request): Json<VariationRequest>,
) -> Result<Json<VariationResponse>, ApiError> {
    let base = if request.base.is_empty() {
        slot_wordings(&app, &request)?
    } else {
        request.base.clone()
    };
    if base.is_empty() {
        return Err(ApiError::BadRequest("nothing to vary".to_string()));
    }

    let request = VariationRequest {
        base: base.clone(),
        ..request
    };
    Ok(Json(app.use_cases.variation.vary(&request, base).await))
}

fn slot_wordings(app: &App, request: &VariationRequest) -> Result<Vec<String>, ApiError> {
    let slot_id = request
        .slot_id
        .as_deref()
        .ok_or_else(|| ApiError::BadRequest("base or slot_id is required".to_string()))?;
    let stage = app
        .library
        .stage(&request.task_id)
        .ok_or(ApiError::NotFound)?;
    let slot = stage.slot(slot_id).ok_or(ApiError::NotFound)?;
    Ok(slot
        .options
        .iter()
        .map(|option| option.value.replace('_', " "))
        .collect())
}

#[derive(Debug)]
pub enum ApiError {
    NotFound,
    BadRequest(String),
    Conflict(String),
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::NotFound => (
                StatusCode::NOT_FOUND,
                ErrorResponse::new(ErrorCode::NotFound, "Not found"),
            ),
            ApiError::BadRequest(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorResponse::new(ErrorCode::BadRequest, msg),
            ),
            ApiError::Conflict(msg) => (
                StatusCode::CONFLICT,
                ErrorResponse::new(ErrorCode::Superseded, msg),
            ),
            ApiError::Internal(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::new(ErrorCode::InternalError, "Internal error"),
                )
            }
        };
        (status, Json(body)).into_response()
    }
}

impl From<ResolveError> for ApiError {
    fn from(e: ResolveError) -> Self {
        match e {
            ResolveError::Superseded(_) => ApiError::Conflict(e.to_string()),
        }
    }
}
