//! Users API routes
//!
//! Wires the users domain to MongoDB.

use axum::Router;
use database::mongodb::verify_connection;
use domain_users::{MongoUserRepository, UserService, handlers};
use mongodb::Client;
use tracing::{error, info, warn};

use crate::state::AppState;

/// Create users router
pub fn router(state: &AppState) -> Router {
    let service = UserService::new(state.users.clone());

    handlers::router(service)
}

/// Ping MongoDB once and, when it answers, ensure the user indexes.
///
/// Runs in the background so the server starts accepting requests
/// regardless of database reachability. The ping is not retried; the
/// repository ensures its indexes again before the next write.
pub async fn prepare_storage(client: Client, users: MongoUserRepository) {
    if let Err(e) = verify_connection(&client).await {
        error!("MongoDB connection error: {}", e);
        warn!("User indexes deferred until the first write");
        return;
    }
    info!("Connected to MongoDB");

    match users.create_indexes().await {
        Ok(()) => info!("User collection indexes created"),
        Err(e) => error!("Failed to create user indexes: {}", e),
    }
}
