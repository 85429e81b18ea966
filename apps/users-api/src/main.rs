use axum_helpers::server::{create_production_app, health_router};
use core_config::tracing::{init_tracing, install_color_eyre};
use database::mongodb::{client_from_config, database_for};
use domain_users::MongoUserRepository;
use std::time::Duration;
use tracing::info;

mod api;
mod config;
mod openapi;
mod state;

use config::Config;
use state::AppState;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Install color-eyre first for colored error output
    install_color_eyre();

    // Load configuration from environment variables
    let config = Config::from_env()?;

    init_tracing(&config.environment);

    // The client connects lazily; only a malformed connection string fails here
    let mongo_client = client_from_config(&config.mongodb).await?;
    let db = database_for(&mongo_client, &config.mongodb);

    info!("Using MongoDB database: {}", db.name());

    let users = MongoUserRepository::new(db.clone());

    // Reachability and indexes are handled off the startup path
    tokio::spawn(api::users::prepare_storage(
        mongo_client.clone(),
        users.clone(),
    ));

    let state = AppState {
        config,
        mongo_client,
        db,
        users,
    };

    let api_routes = api::routes(&state);

    // Create a router with OpenAPI docs
    let router = axum_helpers::create_router::<openapi::ApiDoc>(api_routes)?;

    // Merge health endpoints
    let app = router.merge(health_router(state.config.app));

    info!("Starting Users API with graceful shutdown (30s timeout)");

    let AppState {
        config,
        mongo_client,
        ..
    } = state;

    create_production_app(app, &config.server, Duration::from_secs(30), async move {
        info!("Shutting down: closing MongoDB connections");
        mongo_client.shutdown().await;
        info!("MongoDB connection closed successfully");
    })
    .await
    .map_err(|e| eyre::eyre!("Server error: {}", e))?;

    info!("Users API shutdown complete");
    Ok(())
}
