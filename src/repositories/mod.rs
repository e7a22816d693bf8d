// Persistence ports and their PostgreSQL adapters

pub mod user_repository;
pub mod workout_repository;

pub use user_repository::*;
pub use workout_repository::*;

use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum RepositoryError {
    #[error("record {0} not found")]
    NotFound(Uuid),
    #[error("record already exists")]
    Duplicate,
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl RepositoryError {
    /// Classify a driver error, turning unique-key violations into `Duplicate`.
    pub(crate) fn from_write(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => Self::Duplicate,
            _ => Self::Database(err),
        }
    }
}
