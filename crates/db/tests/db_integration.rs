//! Database integration tests.
//!
//! These tests require a running `PostgreSQL` instance.
//! Run with: `cargo test --test db_integration -- --ignored`
//!
//! Environment variables:
//!   `TEST_DB_HOST` (default: localhost)
//!   `TEST_DB_PORT` (default: 5433)
//!   `TEST_DB_USER` (default: `redsocial_test`)
//!   `TEST_DB_PASSWORD` (default: `redsocial_test`)
//!   `TEST_DB_NAME` (default: `redsocial_test`)

#![allow(clippy::unwrap_used)]

use redsocial_common::AppError;
use redsocial_db::entities::user;
use redsocial_db::repositories::UserRepository;
use redsocial_db::test_utils::{TestDatabase, TestDbConfig};
use sea_orm::Set;
use std::sync::Arc;

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_database_connection() {
    let config = TestDbConfig::default();
    let result = TestDatabase::with_config(config).await;
    assert!(result.is_ok(), "Failed to connect: {:?}", result.err());
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_migrations_apply_cleanly() {
    let db = TestDatabase::create_unique().await.unwrap();
    let result = redsocial_db::migrate(db.connection()).await;
    assert!(result.is_ok(), "Migration failed: {:?}", result.err());
    db.drop_database().await.unwrap();
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_duplicate_email_is_rejected_by_the_store() {
    let db = TestDatabase::create_unique().await.unwrap();
    redsocial_db::migrate(db.connection()).await.unwrap();

    let conn = Arc::new(db.conn.clone());
    let repo = UserRepository::new(conn.clone());

    let first = user::ActiveModel {
        email: Set("ana@example.com".to_string()),
        username: Set("ana".to_string()),
        created_at: Set(chrono::Utc::now().into()),
        ..Default::default()
    };
    repo.create(conn.as_ref(), first).await.unwrap();

    let second = user::ActiveModel {
        email: Set("ana@example.com".to_string()),
        username: Set("ana2".to_string()),
        created_at: Set(chrono::Utc::now().into()),
        ..Default::default()
    };
    let result = repo.create(conn.as_ref(), second).await;

    match result {
        Err(AppError::DuplicateKey(field)) => assert_eq!(field, "email"),
        other => panic!("Expected DuplicateKey(email), got {other:?}"),
    }

    db.drop_database().await.unwrap();
}

#[test]
fn test_config_from_env() {
    let config = TestDbConfig::default();
    assert!(!config.host.is_empty());
    assert!(config.port > 0);
    assert!(!config.username.is_empty());
    assert!(!config.database.is_empty());
}

#[test]
fn test_database_url_format() {
    let config = TestDbConfig {
        host: "testhost".to_string(),
        port: 5432,
        username: "testuser".to_string(),
        password: "testpass".to_string(),
        database: "testdb".to_string(),
    };

    let url = config.database_url();
    assert!(url.starts_with("postgres://"));
    assert!(url.contains("testhost"));
    assert!(url.contains("5432"));
    assert!(url.contains("testuser"));
    assert!(url.contains("testdb"));
}
