//! Integration tests for database initialization
//!
//! Tests cover:
//! - Automatic database creation with default schema
//! - Reopening an existing database without losing data
//! - In-memory databases for tests

use cinemerit_common::db::{count_movies, create_movie, init_database, init_memory_database};
use cinemerit_common::db::{MovieFields, MovieFilter};
use tempfile::TempDir;

fn inception() -> MovieFields {
    MovieFields {
        name: "Inception".to_string(),
        duration: 148.0,
        rating: 8.8,
        genre: Some("Scifi".to_string()),
    }
}

#[tokio::test]
async fn test_database_creation_when_missing() {
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("nested").join("cinemerit.db");
    assert!(!db_path.exists());

    let result = init_database(&db_path).await;

    assert!(result.is_ok(), "Database initialization failed: {:?}", result.err());
    assert!(db_path.exists(), "Database file was not created");
}

#[tokio::test]
async fn test_database_reopen_keeps_records() {
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("cinemerit.db");

    let pool = init_database(&db_path).await.unwrap();
    create_movie(&pool, &inception()).await.unwrap();
    pool.close().await;

    // Schema creation is idempotent
    let pool = init_database(&db_path).await.unwrap();
    assert_eq!(count_movies(&pool, &MovieFilter::All).await.unwrap(), 1);
}

#[tokio::test]
async fn test_memory_databases_are_isolated() {
    let first = init_memory_database().await.unwrap();
    let second = init_memory_database().await.unwrap();

    create_movie(&first, &inception()).await.unwrap();

    assert_eq!(count_movies(&first, &MovieFilter::All).await.unwrap(), 1);
    assert_eq!(count_movies(&second, &MovieFilter::All).await.unwrap(), 0);
}
