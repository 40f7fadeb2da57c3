//! Application-level error type returned by handlers.
//!
//! All variants serialise to the [`ErrorResponse`] JSON body and map to the
//! appropriate HTTP status code.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use mutalyzer_ld::PipelineError;
use serde::{Deserialize, Serialize};

use crate::remote::RemoteError;

/// The JSON body returned for all error responses.
///
/// ```json
/// { "error": "could not parse the variant description", "code": "EPARSE" }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorResponse {
    /// Human-readable description of the problem.
    pub error: String,

    /// Machine-readable error code. Remote failures carry the remote code.
    pub code: String,
}

impl ErrorResponse {
    pub fn new(code: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            error: error.into(),
        }
    }
}

/// Well-known error codes.
pub mod codes {
    pub const INVALID_PARAMETER: &str = "invalid_parameter";
    pub const NOT_ACCEPTABLE: &str = "not_acceptable";
    pub const BAD_GATEWAY: &str = "bad_gateway";
    pub const INTERNAL_ERROR: &str = "internal_error";
}

/// An error that a handler can return; converts directly to an HTTP response.
#[derive(Debug)]
pub enum AppError {
    BadRequest(String),
    /// The remote service reported a fatal condition.
    Remote { code: String, text: String },
    NotAcceptable(String),
    BadGateway(String),
    Internal(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Remote { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::NotAcceptable(_) => StatusCode::NOT_ACCEPTABLE,
            AppError::BadGateway(_) => StatusCode::BAD_GATEWAY,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Log the error at a level matching its status.
    pub fn log(&self, operation: &str) {
        let status = self.status().as_u16();
        if self.status().is_server_error() {
            tracing::error!(operation, status, error = ?self, "request failed");
        } else {
            tracing::warn!(operation, status, error = ?self, "request rejected");
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            AppError::BadRequest(msg) => ErrorResponse::new(codes::INVALID_PARAMETER, msg),
            AppError::Remote { code, text } => ErrorResponse::new(code, text),
            AppError::NotAcceptable(msg) => ErrorResponse::new(codes::NOT_ACCEPTABLE, msg),
            AppError::BadGateway(msg) => ErrorResponse::new(codes::BAD_GATEWAY, msg),
            AppError::Internal(msg) => ErrorResponse::new(codes::INTERNAL_ERROR, msg),
        };
        (status, Json(body)).into_response()
    }
}

impl From<PipelineError> for AppError {
    fn from(e: PipelineError) -> Self {
        match e {
            PipelineError::Domain { code, text } => AppError::Remote { code, text },
            PipelineError::NotAcceptable { .. } => AppError::NotAcceptable(e.to_string()),
            PipelineError::MalformedResult(_) => AppError::BadGateway(e.to_string()),
            PipelineError::TemplateNotFound(_)
            | PipelineError::Template(_)
            | PipelineError::Render(_)
            | PipelineError::Json(_) => AppError::Internal(e.to_string()),
        }
    }
}

impl From<RemoteError> for AppError {
    fn from(e: RemoteError) -> Self {
        AppError::BadGateway(e.to_string())
    }
}
