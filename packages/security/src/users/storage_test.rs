// ABOUTME: Tests for user storage layer
// ABOUTME: Verifies user creation, email normalization and current team switching

use super::storage::UserStorage;
use super::types::UserCreateInput;
use crate::organizations::OrganizationStorage;
use tally_storage::{connect_in_memory, StorageError};

fn input(email: &str) -> UserCreateInput {
    UserCreateInput {
        email: email.to_string(),
        name: "Test User".to_string(),
    }
}

#[tokio::test]
async fn test_create_user_normalizes_email() {
    let pool = connect_in_memory().await.unwrap();
    let storage = UserStorage::new(pool);

    let user = storage.create_user(input("  Test@Example.COM ")).await.unwrap();

    assert_eq!(user.email, "test@example.com");
    assert_eq!(user.name, "Test User");
    assert!(user.current_team_id.is_none());
}

#[tokio::test]
async fn test_create_user_rejects_invalid_email() {
    let pool = connect_in_memory().await.unwrap();
    let storage = UserStorage::new(pool);

    let result = storage.create_user(input("not-an-email")).await;
    assert!(matches!(result, Err(StorageError::Validation(_))));
}

#[tokio::test]
async fn test_duplicate_email_rejected() {
    let pool = connect_in_memory().await.unwrap();
    let storage = UserStorage::new(pool);

    storage.create_user(input("a@example.com")).await.unwrap();
    let result = storage.create_user(input("A@example.com")).await;

    assert!(matches!(result, Err(StorageError::Duplicate(_))));
}

#[tokio::test]
async fn test_set_current_team() {
    let pool = connect_in_memory().await.unwrap();
    let storage = UserStorage::new(pool.clone());
    let organizations = OrganizationStorage::new(pool);

    let org = organizations.create_organization("Acme").await.unwrap();
    let team = organizations.create_team(&org.id, "Default").await.unwrap();
    let user = storage.create_user(input("a@example.com")).await.unwrap();

    let updated = storage.set_current_team(&user.id, Some(team.id)).await.unwrap();
    assert_eq!(updated.current_team_id, Some(team.id));

    let cleared = storage.set_current_team(&user.id, None).await.unwrap();
    assert!(cleared.current_team_id.is_none());
}

#[tokio::test]
async fn test_set_current_team_unknown_user() {
    let pool = connect_in_memory().await.unwrap();
    let storage = UserStorage::new(pool);

    let result = storage.set_current_team("missing", None).await;
    assert!(matches!(result, Err(StorageError::NotFound)));
}
