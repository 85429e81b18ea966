//! Database library providing the MongoDB connector used by the API services
//!
//! # Features
//!
//! - `mongodb` (default) - MongoDB client construction and connection checks
//! - `config` - `MongoConfig` loading via `core_config::FromEnv`
//! - `all` - Everything above
//!
//! # Example
//!
//! ```ignore
//! use database::mongodb::{self, MongoConfig};
//!
//! let config = MongoConfig::with_database("mongodb://localhost:27017", "mydb");
//! let client = mongodb::client_from_config(&config).await?;
//! let db = mongodb::database_for(&client, &config);
//! let collection = db.collection::<Document>("users");
//! ```

#[cfg(feature = "mongodb")]
pub mod mongodb;
