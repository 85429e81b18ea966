pub mod handlers;
pub mod responses;

use axum::{
    Json,
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// Standard error response structure.
///
/// Every error leaves the API in this shape:
/// - `error`: human-readable message
/// - `details`: optional structured data (e.g. per-field validation errors)
///
/// # JSON Example
///
/// ```json
/// {
///   "error": "User validation failed: name: Name must be at least 2 characters",
///   "details": { "name": [{ "code": "length", "message": "Name must be at least 2 characters", "params": {} }] }
/// }
/// ```
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Human-readable error message
    pub error: String,
    /// Optional structured error details (e.g., validation field errors)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: None,
        }
    }
}

/// Application error type that can be converted to HTTP responses.
///
/// Domain errors convert into this enum; it decides the status code and the
/// log level, and renders an [`ErrorResponse`].
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppError {
    #[error("JSON extraction error: {0}")]
    JsonExtractorRejection(#[from] JsonRejection),

    #[error("Query extraction error: {0}")]
    QueryExtractorRejection(#[from] QueryRejection),

    #[error("Validation error: {message}")]
    Validation {
        message: String,
        details: serde_json::Value,
    },

    #[error("Bad Request: {0}")]
    BadRequest(String),

    #[error("Not Found: {0}")]
    NotFound(String),

    #[error("Internal Server Error: {0}")]
    InternalServerError(String),

    #[error("Service Unavailable: {0}")]
    ServiceUnavailable(String),
}

impl AppError {
    /// Status code this error is reported with.
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::JsonExtractorRejection(_)
            | AppError::QueryExtractorRejection(_)
            | AppError::Validation { .. }
            | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        let body = match self {
            AppError::JsonExtractorRejection(e) => {
                tracing::warn!("JSON extraction error: {:?}", e);
                ErrorResponse::new(e.body_text())
            }
            AppError::QueryExtractorRejection(e) => {
                tracing::warn!("Query extraction error: {:?}", e);
                ErrorResponse::new(e.body_text())
            }
            AppError::Validation { message, details } => {
                tracing::info!("Validation error: {}", message);
                ErrorResponse {
                    error: message,
                    details: Some(details),
                }
            }
            AppError::BadRequest(msg) => {
                tracing::info!("Bad request: {}", msg);
                ErrorResponse::new(msg)
            }
            AppError::NotFound(msg) => {
                tracing::info!("Not found: {}", msg);
                ErrorResponse::new(msg)
            }
            AppError::InternalServerError(msg) => {
                tracing::error!("Internal server error: {}", msg);
                ErrorResponse::new(msg)
            }
            AppError::ServiceUnavailable(msg) => {
                tracing::warn!("Service unavailable: {}", msg);
                ErrorResponse::new(msg)
            }
        };

        (status, Json(body)).into_response()
    }
}

/// Helper function to create error responses outside the `AppError` flow.
pub fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(ErrorResponse::new(message))).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_bad_request_renders_error_only() {
        let response = AppError::BadRequest("Email already exists".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert_eq!(body, serde_json::json!({ "error": "Email already exists" }));
    }

    #[tokio::test]
    async fn test_not_found_status() {
        let response = AppError::NotFound("User not found".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(response).await["error"], "User not found");
    }

    #[tokio::test]
    async fn test_internal_error_keeps_message() {
        let response =
            AppError::InternalServerError("connection refused".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_json(response).await["error"], "connection refused");
    }

    #[tokio::test]
    async fn test_validation_includes_details() {
        let response = AppError::Validation {
            message: "User validation failed: age: Age must be >= 0".to_string(),
            details: serde_json::json!({ "age": [] }),
        }
        .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert_eq!(body["error"], "User validation failed: age: Age must be >= 0");
        assert!(body["details"].get("age").is_some());
    }

    #[tokio::test]
    async fn test_error_response_helper() {
        let response = error_response(StatusCode::SERVICE_UNAVAILABLE, "not ready");
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body_json(response).await["error"], "not ready");
    }
}
