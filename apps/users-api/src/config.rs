use core_config::{AppInfo, FromEnv, app_info, server::ServerConfig};

use database::mongodb::MongoConfig;

pub use core_config::Environment;

/// Application-specific configuration
/// Composes shared config components from the `config` library
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    pub mongodb: MongoConfig,
    pub server: ServerConfig,
    pub environment: Environment,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        let environment = Environment::from_env();
        let mongodb = MongoConfig::from_env()?;
        let server = ServerConfig::from_env()?;

        Ok(Self {
            app: app_info!(),
            mongodb,
            server,
            environment,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_requires_mongo_uri() {
        temp_env::with_vars_unset(["MONGO_URI", "MONGODB_URL", "MONGO_URL"], || {
            let err = Config::from_env().unwrap_err();
            assert!(err.to_string().contains("MONGO_URI"));
        });
    }

    #[test]
    fn test_config_from_env() {
        temp_env::with_vars(
            [
                ("MONGO_URI", Some("mongodb://localhost:27017/users")),
                ("MONGO_DATABASE", None),
                ("PORT", Some("4000")),
                ("APP_ENV", Some("production")),
            ],
            || {
                let config = Config::from_env().unwrap();
                assert_eq!(config.app.name, "users_api");
                assert_eq!(config.server.port, 4000);
                assert_eq!(config.mongodb.database(), None);
                assert!(config.environment.is_production());
            },
        );
    }

    #[test]
    fn test_config_rejects_bad_port() {
        temp_env::with_vars(
            [
                ("MONGO_URI", Some("mongodb://localhost:27017")),
                ("PORT", Some("not-a-port")),
            ],
            || {
                assert!(Config::from_env().is_err());
            },
        );
    }
}
