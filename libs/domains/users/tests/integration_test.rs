//! Integration tests for Users domain
//!
//! These tests use a real MongoDB via testcontainers to ensure:
//! - Documents round-trip through the driver
//! - The unique email index is enforced
//! - Search and pagination run server-side as expected
//!
//! They need Docker; run with `cargo test -- --ignored`.

use domain_users::{
    MongoUserRepository, NewUser, UserChanges, UserError, UserFilter, UserRepository,
};
use mongodb::bson::oid::ObjectId;
use mongodb::bson::{Document, doc};
use test_utils::{TestDataBuilder, TestMongo, assertions::*};

async fn setup(test_name: &str) -> (TestMongo, MongoUserRepository, TestDataBuilder) {
    let builder = TestDataBuilder::from_test_name(test_name);
    let mongo = TestMongo::with_database(&builder.database_name()).await;
    let repo = MongoUserRepository::new(mongo.database());
    repo.create_indexes().await.unwrap();
    (mongo, repo, builder)
}

fn new_user(builder: &TestDataBuilder, local: &str) -> NewUser {
    NewUser {
        name: builder.name("user", local),
        age: builder.age(),
        email: builder.email(local),
        address: None,
    }
}

// ============================================================================
// Repository Tests
// ============================================================================

#[tokio::test]
#[ignore = "requires docker"]
async fn test_create_and_list_user() {
    let (_mongo, repo, builder) = setup("create_and_list").await;

    let created = repo.create(new_user(&builder, "jon")).await.unwrap();
    assert_object_id(&created.id, "created user id");
    assert_eq!(created.email, builder.email("jon"));

    let users = repo
        .list(UserFilter {
            search: None,
            skip: 0,
            limit: 5,
        })
        .await
        .unwrap();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0], created);
}

#[tokio::test]
#[ignore = "requires docker"]
async fn test_duplicate_email_is_rejected() {
    let (_mongo, repo, builder) = setup("duplicate_email").await;

    repo.create(new_user(&builder, "jon")).await.unwrap();

    let mut clash = new_user(&builder, "jon");
    clash.name = "Someone Else".to_string();
    let result = repo.create(clash).await;

    assert!(
        matches!(result, Err(UserError::DuplicateEmail(_))),
        "expected duplicate email, got {result:?}"
    );
}

#[tokio::test]
#[ignore = "requires docker"]
async fn test_first_write_creates_unique_index() {
    let builder = TestDataBuilder::from_test_name("first_write_index");
    let mongo = TestMongo::with_database(&builder.database_name()).await;
    // No create_indexes call, as when the startup ping failed
    let repo = MongoUserRepository::new(mongo.database());
    assert!(!repo.indexes_ready());

    repo.create(new_user(&builder, "jon")).await.unwrap();
    assert!(repo.indexes_ready());

    let result = repo.create(new_user(&builder, "jon")).await;
    assert!(
        matches!(result, Err(UserError::DuplicateEmail(_))),
        "expected duplicate email, got {result:?}"
    );
    assert_eq!(repo.count(UserFilter::default()).await.unwrap(), 1);
}

#[tokio::test]
#[ignore = "requires docker"]
async fn test_update_ensures_unique_index() {
    let builder = TestDataBuilder::from_test_name("update_index");
    let mongo = TestMongo::with_database(&builder.database_name()).await;
    let collection = mongo.database().collection::<Document>("users");
    let id = ObjectId::new();
    collection
        .insert_one(doc! { "_id": id, "name": "Jon", "age": 30, "email": builder.email("jon") })
        .await
        .unwrap();
    collection
        .insert_one(doc! { "name": "Arya", "age": 12, "email": builder.email("arya") })
        .await
        .unwrap();

    let repo = MongoUserRepository::new(mongo.database());
    let result = repo
        .update(
            id,
            UserChanges {
                email: Some(builder.email("arya")),
                ..Default::default()
            },
        )
        .await;

    assert!(matches!(result, Err(UserError::DuplicateEmail(_))));
    assert!(repo.indexes_ready());
}

#[tokio::test]
#[ignore = "requires docker"]
async fn test_update_to_taken_email_is_rejected() {
    let (_mongo, repo, builder) = setup("update_taken_email").await;

    repo.create(new_user(&builder, "jon")).await.unwrap();
    let arya = repo.create(new_user(&builder, "arya")).await.unwrap();

    let result = repo
        .update(
            ObjectId::parse_str(&arya.id).unwrap(),
            UserChanges {
                email: Some(builder.email("jon")),
                ..Default::default()
            },
        )
        .await;

    assert!(matches!(result, Err(UserError::DuplicateEmail(_))));
}

#[tokio::test]
#[ignore = "requires docker"]
async fn test_search_and_pagination() {
    let (_mongo, repo, builder) = setup("search_and_pagination").await;

    for i in 0..7 {
        repo.create(new_user(&builder, &format!("u{i}"))).await.unwrap();
    }
    let mut special = new_user(&builder, "special");
    special.address = Some("1 Regex (Lane)".to_string());
    repo.create(special).await.unwrap();

    let all = UserFilter {
        search: None,
        skip: 5,
        limit: 5,
    };
    assert_eq!(repo.count(all.clone()).await.unwrap(), 8);
    assert_eq!(repo.list(all).await.unwrap().len(), 3);

    let literal = UserFilter {
        search: Some("REGEX (lane".to_string()),
        skip: 0,
        limit: 5,
    };
    assert_eq!(repo.count(literal.clone()).await.unwrap(), 1);
    let found = repo.list(literal).await.unwrap();
    assert_eq!(found[0].address.as_deref(), Some("1 Regex (Lane)"));
}

#[tokio::test]
#[ignore = "requires docker"]
async fn test_update_returns_document_after_change() {
    let (_mongo, repo, builder) = setup("update_after").await;

    let created = repo.create(new_user(&builder, "jon")).await.unwrap();
    let id = ObjectId::parse_str(&created.id).unwrap();

    let updated = repo
        .update(
            id,
            UserChanges {
                age: Some(99),
                address: Some("Castle Black".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.age, 99);
    assert_eq!(updated.address.as_deref(), Some("Castle Black"));
    assert_eq!(updated.name, created.name);

    let unchanged = repo.update(id, UserChanges::default()).await.unwrap();
    assert_eq!(unchanged, updated);
}

#[tokio::test]
#[ignore = "requires docker"]
async fn test_update_and_delete_missing_user() {
    let (_mongo, repo, _builder) = setup("missing_user").await;

    let id = ObjectId::new();
    let update = repo
        .update(
            id,
            UserChanges {
                age: Some(1),
                ..Default::default()
            },
        )
        .await;
    assert!(matches!(update, Err(UserError::NotFound(_))));

    let delete = repo.delete(id).await;
    assert!(matches!(delete, Err(UserError::NotFound(_))));
}

#[tokio::test]
#[ignore = "requires docker"]
async fn test_delete_user() {
    let (_mongo, repo, builder) = setup("delete_user").await;

    let created = repo.create(new_user(&builder, "jon")).await.unwrap();
    repo.delete(ObjectId::parse_str(&created.id).unwrap())
        .await
        .unwrap();

    assert_eq!(repo.count(UserFilter::default()).await.unwrap(), 0);
}

#[tokio::test]
#[ignore = "requires docker"]
async fn test_reads_documents_with_double_age() {
    let (mongo, repo, _builder) = setup("double_age").await;

    mongo
        .database()
        .collection::<Document>("users")
        .insert_one(doc! { "name": "Legacy", "age": 42.0, "email": "legacy@x.com" })
        .await
        .unwrap();

    let users = repo
        .list(UserFilter {
            search: Some("legacy".to_string()),
            skip: 0,
            limit: 5,
        })
        .await
        .unwrap();
    let user = assert_some(users.into_iter().next(), "legacy user should be listed");
    assert_eq!(user.age, 42);
}
