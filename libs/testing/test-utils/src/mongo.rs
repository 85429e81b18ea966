//! MongoDB test infrastructure
//!
//! Provides a `TestMongo` helper that starts a MongoDB container for testing.

use mongodb::{Client, Database};
use testcontainers::runners::AsyncRunner;
use testcontainers::{ContainerAsync, ImageExt};
use testcontainers_modules::mongo::Mongo;

const MONGO_TAG: &str = "7.0";
const MONGO_PORT: u16 = 27017;

/// Test MongoDB wrapper that ensures proper cleanup
///
/// The container is stopped and removed when this struct is dropped.
///
/// # Example
///
/// ```no_run
/// use test_utils::TestMongo;
///
/// # async fn example() {
/// let mongo = TestMongo::new().await;
/// let db = mongo.database();
/// db.collection::<mongodb::bson::Document>("users")
///     .insert_one(mongodb::bson::doc! { "name": "Jon" })
///     .await
///     .unwrap();
/// # }
/// ```
pub struct TestMongo {
    #[allow(dead_code)]
    container: ContainerAsync<Mongo>,
    client: Client,
    database: Database,
    pub connection_string: String,
}

impl TestMongo {
    /// Start MongoDB and use a database named `test`
    pub async fn new() -> Self {
        Self::with_database("test").await
    }

    /// Start MongoDB and use the given database name
    pub async fn with_database(name: &str) -> Self {
        let container = Mongo::default()
            .with_tag(MONGO_TAG)
            .start()
            .await
            .expect("Failed to start MongoDB container");

        let host_port = container
            .get_host_port_ipv4(MONGO_PORT)
            .await
            .expect("Failed to get MongoDB port");

        let connection_string = format!("mongodb://127.0.0.1:{}/{}", host_port, name);

        let client = Client::with_uri_str(&connection_string)
            .await
            .expect("Failed to create MongoDB client");

        client
            .database("admin")
            .run_command(mongodb::bson::doc! { "ping": 1 })
            .await
            .expect("Failed to ping MongoDB");

        let database = client.database(name);

        tracing::info!(port = host_port, database = name, "Test MongoDB ready (mongo {MONGO_TAG})");

        Self {
            container,
            client,
            database,
            connection_string,
        }
    }

    pub fn client(&self) -> Client {
        self.client.clone()
    }

    pub fn database(&self) -> Database {
        self.database.clone()
    }

    /// Get the connection string for manual client creation
    pub fn connection_string(&self) -> &str {
        &self.connection_string
    }
}

impl Drop for TestMongo {
    fn drop(&mut self) {
        tracing::debug!("Cleaning up test MongoDB container");
    }
}
