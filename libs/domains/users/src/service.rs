//! User Service - Business logic layer

use mongodb::bson::oid::ObjectId;
use std::sync::Arc;
use tracing::instrument;

use crate::error::{UserError, UserResult};
use crate::models::{CreateUser, ListUsersQuery, Pagination, UpdateUser, User, UserPage};
use crate::repository::UserRepository;
use crate::validation::{validate_changes, validate_new_user};

/// Parse a 24-char hex identifier.
pub fn parse_user_id(raw: &str) -> UserResult<ObjectId> {
    ObjectId::parse_str(raw).map_err(|_| UserError::InvalidId(raw.to_string()))
}

/// User service providing business logic operations
///
/// Normalizes and validates input, parses identifiers before any storage
/// access, and reports storage failures on write paths as
/// [`UserError::WriteFailed`].
pub struct UserService<R: UserRepository> {
    repository: Arc<R>,
}

impl<R: UserRepository> UserService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    /// One page of users plus the total matching the search
    #[instrument(skip(self))]
    pub async fn list_users(&self, query: ListUsersQuery) -> UserResult<UserPage> {
        let pagination = Pagination::from_query(&query);
        let filter = pagination.filter();

        let (data, total) = tokio::try_join!(
            self.repository.list(filter.clone()),
            self.repository.count(filter)
        )?;

        Ok(UserPage::new(&pagination, total, data))
    }

    #[instrument(skip(self, input))]
    pub async fn create_user(&self, input: CreateUser) -> UserResult<User> {
        let user = validate_new_user(input)?;

        self.repository.create(user).await.map_err(UserError::on_write)
    }

    #[instrument(skip(self, input))]
    pub async fn update_user(&self, id: &str, input: UpdateUser) -> UserResult<User> {
        let id = parse_user_id(id)?;
        let changes = validate_changes(input)?;

        self.repository
            .update(id, changes)
            .await
            .map_err(UserError::on_write)
    }

    #[instrument(skip(self))]
    pub async fn delete_user(&self, id: &str) -> UserResult<()> {
        let id = parse_user_id(id)?;

        self.repository.delete(id).await.map_err(UserError::on_write)
    }
}

impl<R: UserRepository> Clone for UserService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}
