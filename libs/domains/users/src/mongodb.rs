//! MongoDB implementation of UserRepository

use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    Collection, Database, IndexModel,
    bson::{Bson, Document, doc, oid::ObjectId},
    error::{ErrorKind, WriteFailure},
    options::{IndexOptions, ReturnDocument},
};
use serde::{Deserialize, Deserializer, Serialize};
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::instrument;

use crate::error::{UserError, UserResult};
use crate::models::{NewUser, User, UserChanges, UserFilter};
use crate::repository::UserRepository;

pub const USERS_COLLECTION: &str = "users";

/// Server error code for a unique index violation
const DUPLICATE_KEY_CODE: i32 = 11000;

/// Stored shape of a user
#[derive(Debug, Clone, Serialize, Deserialize)]
struct UserDocument {
    #[serde(rename = "_id")]
    id: ObjectId,
    name: String,
    #[serde(deserialize_with = "deserialize_age")]
    age: i64,
    email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    address: Option<String>,
}

/// Accept ages written as int32, int64 or integral doubles.
fn deserialize_age<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    match Bson::deserialize(deserializer)? {
        Bson::Int32(v) => Ok(i64::from(v)),
        Bson::Int64(v) => Ok(v),
        Bson::Double(v) if v.fract() == 0.0 => Ok(v as i64),
        other => Err(serde::de::Error::custom(format!(
            "age must be an integer, found {other}"
        ))),
    }
}

impl UserDocument {
    fn from_new(id: ObjectId, user: NewUser) -> Self {
        Self {
            id,
            name: user.name,
            age: user.age,
            email: user.email,
            address: user.address,
        }
    }
}

impl From<UserDocument> for User {
    fn from(doc: UserDocument) -> Self {
        User {
            id: doc.id.to_hex(),
            name: doc.name,
            age: doc.age,
            email: doc.email,
            address: doc.address,
        }
    }
}

/// Whether a driver error is a unique index violation
pub fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    match err.kind.as_ref() {
        ErrorKind::Write(WriteFailure::WriteError(write_error)) => {
            write_error.code == DUPLICATE_KEY_CODE
        }
        ErrorKind::Command(command_error) => command_error.code == DUPLICATE_KEY_CODE,
        _ => false,
    }
}

fn write_error(err: mongodb::error::Error, email: Option<&str>) -> UserError {
    if is_duplicate_key(&err) {
        UserError::DuplicateEmail(email.unwrap_or_default().to_string())
    } else {
        UserError::from(err)
    }
}

/// MongoDB implementation of the UserRepository
///
/// Email uniqueness rests on the unique `email` index, so writes make sure
/// it exists first. A failed attempt is retried on the next write, and
/// clones share the outcome.
#[derive(Clone)]
pub struct MongoUserRepository {
    collection: Collection<UserDocument>,
    indexes: Arc<OnceCell<()>>,
}

impl MongoUserRepository {
    /// Create a repository over the `users` collection
    ///
    /// # Example
    /// ```ignore
    /// let db = database_for(&client, &config.mongodb);
    /// let repo = MongoUserRepository::new(db);
    /// repo.create_indexes().await?;
    /// ```
    pub fn new(db: Database) -> Self {
        Self::with_collection(db, USERS_COLLECTION)
    }

    pub fn with_collection(db: Database, collection_name: &str) -> Self {
        let collection = db.collection::<UserDocument>(collection_name);
        Self {
            collection,
            indexes: Arc::new(OnceCell::new()),
        }
    }

    /// Ensure the unique index on `email` exists
    pub async fn create_indexes(&self) -> UserResult<()> {
        self.indexes
            .get_or_try_init(|| self.build_indexes())
            .await
            .map(|_| ())
    }

    /// Whether the indexes have been ensured by this repository
    pub fn indexes_ready(&self) -> bool {
        self.indexes.initialized()
    }

    async fn build_indexes(&self) -> UserResult<()> {
        let index = IndexModel::builder()
            .keys(doc! { "email": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();

        let result = self.collection.create_index(index).await?;
        tracing::info!(index = %result.index_name, "User indexes ensured");
        Ok(())
    }

    /// Search is a literal, case-insensitive match on name, email or address
    fn build_filter(filter: &UserFilter) -> Document {
        let Some(ref search) = filter.search else {
            return doc! {};
        };

        let pattern = regex::escape(search);
        doc! {
            "$or": [
                { "name": { "$regex": pattern.as_str(), "$options": "i" } },
                { "email": { "$regex": pattern.as_str(), "$options": "i" } },
                { "address": { "$regex": pattern.as_str(), "$options": "i" } },
            ]
        }
    }

    fn build_update(changes: &UserChanges) -> Document {
        let mut set = doc! {};

        if let Some(ref name) = changes.name {
            set.insert("name", name.as_str());
        }
        if let Some(age) = changes.age {
            set.insert("age", age);
        }
        if let Some(ref email) = changes.email {
            set.insert("email", email.as_str());
        }
        if let Some(ref address) = changes.address {
            set.insert("address", address.as_str());
        }

        set
    }
}

#[async_trait]
impl UserRepository for MongoUserRepository {
    #[instrument(skip(self, input), fields(email = %input.email))]
    async fn create(&self, input: NewUser) -> UserResult<User> {
        self.create_indexes().await?;
        let document = UserDocument::from_new(ObjectId::new(), input);

        self.collection
            .insert_one(&document)
            .await
            .map_err(|e| write_error(e, Some(document.email.as_str())))?;

        tracing::info!(user_id = %document.id, "User created successfully");
        Ok(document.into())
    }

    #[instrument(skip(self))]
    async fn list(&self, filter: UserFilter) -> UserResult<Vec<User>> {
        let mongo_filter = Self::build_filter(&filter);

        let cursor = self
            .collection
            .find(mongo_filter)
            .skip(filter.skip)
            .limit(i64::try_from(filter.limit).unwrap_or(i64::MAX))
            .await?;
        let documents: Vec<UserDocument> = cursor.try_collect().await?;

        Ok(documents.into_iter().map(User::from).collect())
    }

    #[instrument(skip(self))]
    async fn count(&self, filter: UserFilter) -> UserResult<u64> {
        let mongo_filter = Self::build_filter(&filter);
        let count = self.collection.count_documents(mongo_filter).await?;
        Ok(count)
    }

    #[instrument(skip(self, changes))]
    async fn update(&self, id: ObjectId, changes: UserChanges) -> UserResult<User> {
        let filter = doc! { "_id": id };
        let set = Self::build_update(&changes);

        let updated = if set.is_empty() {
            self.collection.find_one(filter).await?
        } else {
            self.create_indexes().await?;
            self.collection
                .find_one_and_update(filter, doc! { "$set": set })
                .return_document(ReturnDocument::After)
                .await
                .map_err(|e| write_error(e, changes.email.as_deref()))?
        };

        let document = updated.ok_or(UserError::NotFound(id))?;
        tracing::info!(user_id = %id, "User updated successfully");
        Ok(document.into())
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: ObjectId) -> UserResult<()> {
        let result = self
            .collection
            .delete_one(doc! { "_id": id })
            .await?;

        if result.deleted_count == 0 {
            return Err(UserError::NotFound(id));
        }

        tracing::info!(user_id = %id, "User deleted successfully");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn unreachable_repository() -> MongoUserRepository {
        let client = mongodb::Client::with_uri_str(
            "mongodb://127.0.0.1:1/?serverSelectionTimeoutMS=200&connectTimeoutMS=200",
        )
        .await
        .unwrap();
        MongoUserRepository::new(client.database("user_management"))
    }

    #[tokio::test]
    async fn test_write_without_index_fails_and_retries_later() {
        let repo = unreachable_repository().await;
        let shared = repo.clone();

        let result = repo
            .create(NewUser {
                name: "Jon".to_string(),
                age: 30,
                email: "jon@x.com".to_string(),
                address: None,
            })
            .await;

        assert!(matches!(result, Err(UserError::Database(_))));
        assert!(!repo.indexes_ready());
        assert!(!shared.indexes_ready());

        let update = repo
            .update(
                ObjectId::new(),
                UserChanges {
                    email: Some("jon@x.com".to_string()),
                    ..Default::default()
                },
            )
            .await;
        assert!(matches!(update, Err(UserError::Database(_))));
        assert!(!repo.indexes_ready());
    }

    #[test]
    fn test_build_filter_empty() {
        let doc = MongoUserRepository::build_filter(&UserFilter::default());
        assert!(doc.is_empty());
    }

    #[test]
    fn test_build_filter_with_search() {
        let filter = UserFilter {
            search: Some("jon".to_string()),
            ..Default::default()
        };
        let doc = MongoUserRepository::build_filter(&filter);
        let clauses = doc.get_array("$or").unwrap();
        assert_eq!(clauses.len(), 3);
    }

    #[test]
    fn test_build_filter_escapes_regex_metacharacters() {
        let filter = UserFilter {
            search: Some("a.b(c)*".to_string()),
            ..Default::default()
        };
        let doc = MongoUserRepository::build_filter(&filter);
        let first = doc.get_array("$or").unwrap()[0].as_document().unwrap();
        let pattern = first.get_document("name").unwrap().get_str("$regex").unwrap();
        assert_eq!(pattern, r"a\.b\(c\)\*");
    }

    #[test]
    fn test_build_update_only_sets_present_fields() {
        let set = MongoUserRepository::build_update(&UserChanges {
            age: Some(40),
            ..Default::default()
        });
        assert_eq!(set.len(), 1);
        assert_eq!(set.get_i64("age").unwrap(), 40);
        assert!(MongoUserRepository::build_update(&UserChanges::default()).is_empty());
    }

    #[test]
    fn test_document_accepts_double_age() {
        let id = ObjectId::new();
        let raw = doc! { "_id": id, "name": "Jon", "age": 30.0, "email": "jon@x.com" };
        let document: UserDocument = mongodb::bson::from_document(raw).unwrap();
        assert_eq!(document.age, 30);
        assert_eq!(User::from(document).id, id.to_hex());
    }

    #[test]
    fn test_document_rejects_fractional_age() {
        let raw = doc! { "_id": ObjectId::new(), "name": "Jon", "age": 30.5, "email": "jon@x.com" };
        assert!(mongodb::bson::from_document::<UserDocument>(raw).is_err());
    }

    #[test]
    fn test_document_omits_missing_address() {
        let document = UserDocument::from_new(
            ObjectId::new(),
            NewUser {
                name: "Jon".to_string(),
                age: 30,
                email: "jon@x.com".to_string(),
                address: None,
            },
        );
        let bson = mongodb::bson::to_document(&document).unwrap();
        assert!(!bson.contains_key("address"));
        assert!(bson.get_object_id("_id").is_ok());
    }
}
