//! MongoDB database connector and utilities
//!
//! Provides connection management and MongoDB-specific helpers.

mod config;
mod connector;

pub use config::{DEFAULT_DATABASE, MongoConfig};
pub use connector::{MongoError, client_from_config, database_for, verify_connection};

// Re-export MongoDB types for convenience
pub use mongodb::{Client, Collection, Database};
