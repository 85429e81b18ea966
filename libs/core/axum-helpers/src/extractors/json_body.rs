//! JSON body extractor with standardized rejections.

use crate::errors::AppError;
use axum::{
    extract::{FromRequest, Json, Request},
    response::{IntoResponse, Response},
};
use serde::de::DeserializeOwned;

/// JSON extractor that rejects with a `400 {"error": ...}` body.
///
/// Syntax errors, type mismatches and a missing `Content-Type` all surface as
/// client errors, carrying axum's description of what went wrong.
///
/// # Example
/// ```ignore
/// use axum::{Router, routing::post};
/// use axum_helpers::extractors::JsonBody;
///
/// async fn create(JsonBody(payload): JsonBody<CreateUser>) -> String {
///     format!("Creating {:?}", payload.name)
/// }
///
/// let app = Router::new().route("/users", post(create));
/// ```
pub struct JsonBody<T>(pub T);

impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(data) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| AppError::from(e).into_response())?;

        Ok(JsonBody(data))
    }
}
