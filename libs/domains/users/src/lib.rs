//! Users Domain
//!
//! User management over MongoDB: paginated search, create, partial update
//! and delete, with email uniqueness enforced by storage.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← HTTP endpoints
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Service   │  ← Id parsing, validation, error classification
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │ Repository  │  ← Data access (trait + MongoDB and in-memory implementations)
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Models    │  ← Entities, DTOs, pagination
//! └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use domain_users::{handlers, MongoUserRepository, UserService};
//! use mongodb::Client;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = Client::with_uri_str("mongodb://localhost:27017").await?;
//! let repository = MongoUserRepository::new(client.database("user_management"));
//! repository.create_indexes().await?;
//!
//! let router = handlers::router(UserService::new(repository));
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod handlers;
pub mod models;
pub mod mongodb;
pub mod repository;
pub mod service;
pub mod validation;

// Re-export commonly used types
pub use error::{UserError, UserResult};
pub use handlers::ApiDoc;
pub use models::{
    CreateUser, ListUsersQuery, NewUser, Pagination, UpdateUser, User, UserChanges, UserFilter,
    UserPage,
};
pub use self::mongodb::MongoUserRepository;
pub use repository::{InMemoryUserRepository, UserRepository};
pub use service::UserService;
