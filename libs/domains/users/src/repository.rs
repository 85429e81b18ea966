use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::{UserError, UserResult};
use crate::models::{NewUser, User, UserChanges, UserFilter};

/// Repository trait for User persistence
///
/// Implementations enforce email uniqueness and report a clash as
/// [`UserError::DuplicateEmail`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a validated user and return it with its new identifier
    async fn create(&self, user: NewUser) -> UserResult<User>;

    /// Users matching the filter, in storage order, windowed by skip/limit
    async fn list(&self, filter: UserFilter) -> UserResult<Vec<User>>;

    /// Number of users matching the filter, ignoring skip/limit
    async fn count(&self, filter: UserFilter) -> UserResult<u64>;

    /// Apply changes and return the stored document after the update.
    /// An empty change set returns the current document.
    async fn update(&self, id: ObjectId, changes: UserChanges) -> UserResult<User>;

    /// Remove a user; [`UserError::NotFound`] when nothing was deleted
    async fn delete(&self, id: ObjectId) -> UserResult<()>;
}

/// In-memory implementation for tests and local runs
///
/// Users are kept in insertion order so listing behaves like a collection
/// scan without sort.
#[derive(Clone, Default)]
pub struct InMemoryUserRepository {
    users: Arc<RwLock<Vec<User>>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn email_taken(users: &[User], email: &str, except: Option<&str>) -> bool {
    users
        .iter()
        .any(|u| u.email == email && Some(u.id.as_str()) != except)
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, input: NewUser) -> UserResult<User> {
        let mut users = self.users.write().await;

        if email_taken(&users, &input.email, None) {
            return Err(UserError::DuplicateEmail(input.email));
        }

        let user = User {
            id: ObjectId::new().to_hex(),
            name: input.name,
            age: input.age,
            email: input.email,
            address: input.address,
        };
        users.push(user.clone());

        tracing::info!(user_id = %user.id, email = %user.email, "Created user");
        Ok(user)
    }

    async fn list(&self, filter: UserFilter) -> UserResult<Vec<User>> {
        let users = self.users.read().await;

        let skip = usize::try_from(filter.skip).unwrap_or(usize::MAX);
        let limit = usize::try_from(filter.limit).unwrap_or(usize::MAX);

        Ok(users
            .iter()
            .filter(|u| filter.matches(u))
            .skip(skip)
            .take(limit)
            .cloned()
            .collect())
    }

    async fn count(&self, filter: UserFilter) -> UserResult<u64> {
        let users = self.users.read().await;
        Ok(users.iter().filter(|u| filter.matches(u)).count() as u64)
    }

    async fn update(&self, id: ObjectId, changes: UserChanges) -> UserResult<User> {
        let mut users = self.users.write().await;
        let key = id.to_hex();

        let position = users
            .iter()
            .position(|u| u.id == key)
            .ok_or(UserError::NotFound(id))?;

        if let Some(ref email) = changes.email {
            if email_taken(&users, email, Some(&key)) {
                return Err(UserError::DuplicateEmail(email.clone()));
            }
        }

        let user = &mut users[position];
        user.apply(changes);

        tracing::info!(user_id = %key, "Updated user");
        Ok(user.clone())
    }

    async fn delete(&self, id: ObjectId) -> UserResult<()> {
        let mut users = self.users.write().await;
        let key = id.to_hex();

        let before = users.len();
        users.retain(|u| u.id != key);

        if users.len() == before {
            return Err(UserError::NotFound(id));
        }

        tracing::info!(user_id = %key, "Deleted user");
        Ok(())
    }
}
