#[cfg(feature = "config")]
use core_config::{ConfigError, FromEnv, env_parse_or};

/// Database used when neither the config nor the connection string names one
pub const DEFAULT_DATABASE: &str = "user_management";

/// MongoDB database configuration
///
/// This struct holds MongoDB connection settings.
/// It can be constructed manually or loaded from environment variables (with `config` feature).
///
/// # Example
///
/// ```ignore
/// use database::mongodb::MongoConfig;
///
/// // Manual construction
/// let config = MongoConfig::new("mongodb://localhost:27017");
///
/// // With database name
/// let config = MongoConfig::with_database("mongodb://localhost:27017", "mydb");
///
/// // From environment variables (requires `config` feature)
/// let config = MongoConfig::from_env()?;
/// ```
#[derive(Clone, Debug)]
pub struct MongoConfig {
    /// MongoDB connection URL (required)
    /// Format: mongodb://[username:password@]host[:port][/database][?options]
    pub url: String,

    /// Database name; when `None` the connection string's default database is used
    pub database: Option<String>,

    /// Optional application name for server logs
    pub app_name: Option<String>,

    /// Connection timeout in seconds
    pub connect_timeout_secs: u64,

    /// Server selection timeout in seconds
    pub server_selection_timeout_secs: u64,
}

impl MongoConfig {
    /// Create a new MongoConfig with just a URL
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            database: None,
            app_name: None,
            connect_timeout_secs: 10,
            server_selection_timeout_secs: 30,
        }
    }

    /// Create a MongoConfig with a specific database name
    pub fn with_database(url: impl Into<String>, database: impl Into<String>) -> Self {
        Self {
            database: Some(database.into()),
            ..Self::new(url)
        }
    }

    /// Set the application name for server logs
    pub fn with_app_name(mut self, app_name: impl Into<String>) -> Self {
        self.app_name = Some(app_name.into());
        self
    }

    /// Get a reference to the MongoDB URL
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Get the explicitly configured database name, if any
    pub fn database(&self) -> Option<&str> {
        self.database.as_deref()
    }
}

impl Default for MongoConfig {
    fn default() -> Self {
        Self::new("mongodb://localhost:27017")
    }
}

/// Load MongoConfig from environment variables
///
/// Environment variables:
/// - `MONGO_URI`, falling back to `MONGODB_URL` then `MONGO_URL` (required)
/// - `MONGO_DATABASE` (optional) - Database name
/// - `MONGO_APP_NAME` (optional) - Application name for server logs
/// - `MONGO_CONNECT_TIMEOUT_SECS` (optional, default: 10)
/// - `MONGO_SERVER_SELECTION_TIMEOUT_SECS` (optional, default: 30)
#[cfg(feature = "config")]
impl FromEnv for MongoConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let url = std::env::var("MONGO_URI")
            .or_else(|_| std::env::var("MONGODB_URL"))
            .or_else(|_| std::env::var("MONGO_URL"))
            .map_err(|_| ConfigError::MissingEnvVar("MONGO_URI".to_string()))?;

        let database = std::env::var("MONGO_DATABASE")
            .ok()
            .filter(|name| !name.trim().is_empty());

        let app_name = std::env::var("MONGO_APP_NAME").ok();

        Ok(Self {
            url,
            database,
            app_name,
            connect_timeout_secs: env_parse_or("MONGO_CONNECT_TIMEOUT_SECS", 10)?,
            server_selection_timeout_secs: env_parse_or(
                "MONGO_SERVER_SELECTION_TIMEOUT_SECS",
                30,
            )?,
        })
    }
}
