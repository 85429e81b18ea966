use mongodb::{Client, Database, bson::doc, options::ClientOptions};
use std::time::Duration;

use super::{DEFAULT_DATABASE, MongoConfig};

/// Error type for MongoDB operations
#[derive(Debug, thiserror::Error)]
pub enum MongoError {
    #[error("MongoDB error: {0}")]
    Mongo(#[from] mongodb::error::Error),

    #[error("Connection failed: {0}")]
    ConnectionFailed(String),
}

/// Build a client from config without touching the network.
///
/// The driver connects lazily, so the returned client is usable even while the
/// server is unreachable; operations fail until it becomes reachable. Only an
/// unparsable connection string is reported here.
///
/// # Example
/// ```ignore
/// use database::mongodb::{MongoConfig, client_from_config};
///
/// let config = MongoConfig::with_database("mongodb://localhost:27017", "mydb");
/// let client = client_from_config(&config).await?;
/// ```
pub async fn client_from_config(config: &MongoConfig) -> Result<Client, MongoError> {
    let mut options = ClientOptions::parse(&config.url).await?;

    options.connect_timeout = Some(Duration::from_secs(config.connect_timeout_secs));
    options.server_selection_timeout =
        Some(Duration::from_secs(config.server_selection_timeout_secs));

    if let Some(ref app_name) = config.app_name {
        options.app_name = Some(app_name.clone());
    }

    Ok(Client::with_options(options)?)
}

/// Round-trip a `ping` to prove the server is reachable.
pub async fn verify_connection(client: &Client) -> Result<(), MongoError> {
    client
        .database("admin")
        .run_command(doc! { "ping": 1 })
        .await
        .map_err(|e| MongoError::ConnectionFailed(e.to_string()))?;
    Ok(())
}

/// Resolve the database handle: explicit config, then the URI's default
/// database, then [`DEFAULT_DATABASE`].
pub fn database_for(client: &Client, config: &MongoConfig) -> Database {
    match config.database() {
        Some(name) => client.database(name),
        None => client
            .default_database()
            .unwrap_or_else(|| client.database(DEFAULT_DATABASE)),
    }
}
