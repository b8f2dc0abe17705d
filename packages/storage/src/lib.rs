// ABOUTME: Data layer and persistence for Tally
// ABOUTME: Shared storage error type, SQLite pool setup and embedded schema migrations

pub mod db;

pub use db::{connect, connect_in_memory, run_migrations, MIGRATOR};

use thiserror::Error;

/// Storage errors
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Database error: {0}")]
    Database(String),
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
    #[error("Sqlx error: {0}")]
    Sqlx(sqlx::Error),
    #[error("Record not found")]
    NotFound,
    #[error("Duplicate record: {0}")]
    Duplicate(String),
    #[error("Constraint violated: {0}")]
    Constraint(String),
    #[error("Validation error: {0}")]
    Validation(String),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Classify sqlx errors so callers can react to missing rows and constraint violations
impl From<sqlx::Error> for StorageError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => StorageError::NotFound,
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                StorageError::Duplicate(db_err.message().to_string())
            }
            sqlx::Error::Database(db_err)
                if db_err.is_check_violation() || db_err.is_foreign_key_violation() =>
            {
                StorageError::Constraint(db_err.message().to_string())
            }
            other => StorageError::Sqlx(other),
        }
    }
}
