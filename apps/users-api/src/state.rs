//! Application state management.
//!
//! This module defines the shared application state passed to the app's own
//! handlers (readiness). Domain routers carry their own service state.

use domain_users::MongoUserRepository;
use mongodb::{Client, Database};

/// Shared application state.
///
/// Cloning is cheap: the MongoDB handles share one connection pool.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration loaded from environment variables
    pub config: crate::config::Config,
    /// MongoDB client (cloneable, shares underlying connection pool)
    pub mongo_client: Client,
    /// MongoDB database instance
    pub db: Database,
    /// User storage shared by the users router and startup preparation
    pub users: MongoUserRepository,
}
