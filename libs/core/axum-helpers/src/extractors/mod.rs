//! Custom extractors for Axum handlers.
//!
//! Both extractors behave like their axum counterparts but reject with an
//! [`AppError`](crate::errors::AppError), so malformed input produces the
//! same `{"error": ...}` body as every other failure.

pub mod json_body;
pub mod query_params;

pub use json_body::JsonBody;
pub use query_params::QueryParams;
