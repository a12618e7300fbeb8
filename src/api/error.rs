//! API error handling

use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::{debug, error};

use crate::application::AnalyzeError;

/// API error type
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub code: &'static str,
    pub message: String,
}

impl ApiError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            code: "invalid_input",
            message: msg.into(),
        }
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            code: "not_found",
            message: msg.into(),
        }
    }

    pub fn service_unavailable(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::SERVICE_UNAVAILABLE,
            code: "adapter_unavailable",
            message: msg.into(),
        }
    }

    pub fn bad_gateway(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_GATEWAY,
            code: "adapter_contract_violation",
            message: msg.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "detail": self.message,
            "code": self.code,
        }));
        (self.status, body).into_response()
    }
}

impl From<AnalyzeError> for ApiError {
    fn from(err: AnalyzeError) -> Self {
        // Backend details go to the log, never to the caller
        match &err {
            AnalyzeError::InvalidInput(_) => ApiError::bad_request(err.to_string()),
            AnalyzeError::AdapterUnavailable(detail) => {
                error!(%detail, "language model unavailable");
                ApiError::service_unavailable("Language model backend is unavailable")
            }
            AnalyzeError::AdapterContractViolation(detail) => {
                error!(%detail, "language model contract violation");
                ApiError::bad_gateway("Language model returned an unexpected response")
            }
        }
    }
}

// Extractor rejections carry serde's wording; callers get a fixed message

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        debug!(reason = %rejection.body_text(), "rejected request body");
        let message = match rejection {
            JsonRejection::MissingJsonContentType(_) => {
                "Expected a request with Content-Type: application/json"
            }
            JsonRejection::JsonSyntaxError(_) => "Request body is not valid JSON",
            JsonRejection::JsonDataError(_) => {
                "Request body is missing required fields or has fields of the wrong type"
            }
            _ => "Request body could not be read",
        };
        ApiError::bad_request(message)
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        debug!(reason = %rejection.body_text(), "rejected query string");
        ApiError::bad_request("Query parameter 'transcript' is required")
    }
}
