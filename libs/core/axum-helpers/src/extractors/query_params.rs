//! Query string extractor with standardized rejections.

use crate::errors::AppError;
use axum::{
    extract::{FromRequestParts, Query},
    http::{Uri, request::Parts},
    response::{IntoResponse, Response},
};
use serde::de::DeserializeOwned;
use std::collections::HashSet;

/// Query extractor that rejects with a `400 {"error": ...}` body.
///
/// When a key is repeated, the first occurrence wins.
pub struct QueryParams<T>(pub T);

/// Drop every pair whose key already appeared earlier in the query.
fn first_occurrences(query: &str) -> String {
    let mut seen = HashSet::new();

    query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .filter(|pair| {
            let key = pair.split_once('=').map_or(*pair, |(key, _)| key);
            seen.insert(key)
        })
        .collect::<Vec<_>>()
        .join("&")
}

impl<T, S> FromRequestParts<S> for QueryParams<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let query = first_occurrences(parts.uri.query().unwrap_or_default());
        let uri: Uri = format!("/?{query}")
            .parse()
            .map_err(|e| AppError::BadRequest(format!("Invalid query string: {e}")).into_response())?;

        let Query(params) = Query::<T>::try_from_uri(&uri)
            .map_err(|e| AppError::from(e).into_response())?;

        Ok(QueryParams(params))
    }
}
