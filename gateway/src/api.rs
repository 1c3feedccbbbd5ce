use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use phantom_core::registry::ToolRecord;
use phantom_core::AgentError;
use serde::Serialize;
use tracing::warn;

// Re-exported so handlers read like the wire contract
pub use phantom_core::{AgentRequest, AgentResult};

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct HealthResponse {
    pub status: &'static str,
}

impl HealthResponse {
    pub fn ok() -> Self {
        Self { status: "ok" }
    }
}

#[derive(Debug, Serialize)]
pub struct CatalogResponse {
    pub tools: Vec<ToolRecord>,
}

/// Error body: `{ "error": { "code": "...", "message": "..." } }`.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    body: ApiErrorResponse,
}

#[derive(Debug, Serialize)]
pub struct ApiErrorResponse {
    pub error: ApiErrorBody,
}

#[derive(Debug, Serialize)]
pub struct ApiErrorBody {
    pub code: &'static str,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            body: ApiErrorResponse {
                error: ApiErrorBody {
                    code,
                    message: message.into(),
                },
            },
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "bad_request", message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

// Client-input problems only; everything else travels inside the 200 body.
impl From<AgentError> for ApiError {
    fn from(err: AgentError) -> Self {
        match err {
            AgentError::MissingInstruction => {
                warn!("400: {}", err);
                Self::bad_request(err.to_string())
            }
        }
    }
}
