use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::error;

use webscribe_recorder::formatter;

use crate::session::{SessionError, SessionManager};
use crate::types::{CodeResponse, HealthResponse, StartRequest, StartResponse, StopResponse};

pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

impl From<SessionError> for ApiError {
    fn from(err: SessionError) -> Self {
        let status = match err {
            SessionError::NotRecording => StatusCode::BAD_REQUEST,
            SessionError::Stage(_) | SessionError::Spawn(_) => {
                error!("session error: {err}");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

pub async fn start_recording(
    State(manager): State<Arc<SessionManager>>,
    Json(request): Json<StartRequest>,
) -> Result<Json<StartResponse>, ApiError> {
    if !request.url.starts_with("http://") && !request.url.starts_with("https://") {
        return Err(ApiError::bad_request("url must start with http:// or https://"));
    }

    let test_name = match request.test_name {
        Some(name) => {
            if !formatter::is_valid_test_name(&name) {
                return Err(ApiError::bad_request(
                    "test name may only contain letters, digits and underscores",
                ));
            }
            name
        }
        None => formatter::default_test_name(),
    };

    manager.start(&request.url, test_name).await?;
    Ok(Json(StartResponse {
        message: "Recording started".to_string(),
    }))
}

pub async fn stop_recording(
    State(manager): State<Arc<SessionManager>>,
) -> Result<Json<StopResponse>, ApiError> {
    let code = manager.stop().await?;
    Ok(Json(StopResponse {
        message: "Recording stopped".to_string(),
        code,
    }))
}

pub async fn get_code(State(manager): State<Arc<SessionManager>>) -> Json<CodeResponse> {
    let (code, is_recording) = manager.snapshot().await;
    Json(CodeResponse { code, is_recording })
}
