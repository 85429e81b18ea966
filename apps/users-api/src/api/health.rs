//! Readiness endpoint

use axum::{Router, extract::State, response::IntoResponse, routing::get};
use axum_helpers::{HealthCheckFuture, run_health_checks};
use database::mongodb::verify_connection;

use crate::state::AppState;

/// Create a readiness router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/ready", get(readiness_check))
        .with_state(state)
}

/// Readiness check - verifies MongoDB answers a ping
async fn readiness_check(State(state): State<AppState>) -> impl IntoResponse {
    let mongodb: HealthCheckFuture<'_> = Box::pin(async {
        verify_connection(&state.mongo_client)
            .await
            .map_err(|e| e.to_string())
    });

    run_health_checks(vec![("mongodb", mongodb)]).await
}
