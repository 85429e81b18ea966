use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use mongodb::bson::oid::ObjectId;
use thiserror::Error;
use validator::ValidationErrors;

use crate::validation::summarize;

pub const INVALID_ID_MESSAGE: &str = "Invalid user ID";
pub const NOT_FOUND_MESSAGE: &str = "User not found";
pub const DUPLICATE_EMAIL_MESSAGE: &str = "Email already exists";

#[derive(Debug, Error)]
pub enum UserError {
    #[error("Invalid user ID: {0}")]
    InvalidId(String),

    #[error("{}", summarize(.0))]
    Validation(ValidationErrors),

    #[error("Email already exists: {0}")]
    DuplicateEmail(String),

    #[error("User not found: {0}")]
    NotFound(ObjectId),

    /// Storage failure while reading
    #[error("Database error: {0}")]
    Database(String),

    /// Storage failure while writing; reported to the client as a bad request
    #[error("Write failed: {0}")]
    WriteFailed(String),
}

pub type UserResult<T> = Result<T, UserError>;

impl UserError {
    /// Reclassify a storage failure that happened on a write path.
    pub fn on_write(self) -> Self {
        match self {
            UserError::Database(msg) => UserError::WriteFailed(msg),
            other => other,
        }
    }
}

impl From<ValidationErrors> for UserError {
    fn from(errors: ValidationErrors) -> Self {
        UserError::Validation(errors)
    }
}

/// Convert UserError to AppError for standardized error responses
impl From<UserError> for AppError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::InvalidId(_) => AppError::BadRequest(INVALID_ID_MESSAGE.to_string()),
            UserError::Validation(errors) => AppError::Validation {
                message: summarize(&errors),
                details: serde_json::to_value(&errors).unwrap_or_default(),
            },
            UserError::DuplicateEmail(_) => {
                AppError::BadRequest(DUPLICATE_EMAIL_MESSAGE.to_string())
            }
            UserError::NotFound(_) => AppError::NotFound(NOT_FOUND_MESSAGE.to_string()),
            UserError::Database(msg) => AppError::InternalServerError(msg),
            UserError::WriteFailed(msg) => AppError::BadRequest(msg),
        }
    }
}

impl IntoResponse for UserError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

impl From<mongodb::error::Error> for UserError {
    fn from(err: mongodb::error::Error) -> Self {
        UserError::Database(err.to_string())
    }
}
