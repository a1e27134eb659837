//! # Repository Layer
//!
//! Repositories wrap the SeaORM operations for each table. Integrity
//! violations are translated into [`RepositoryError`] here so callers never
//! see raw driver errors for expected conditions.

use thiserror::Error;

use crate::error::is_unique_violation;

pub mod city;
pub mod temperature;

pub use city::{CityChanges, CityRepository, NewCity};
pub use temperature::TemperatureRepository;

/// Errors returned by repository operations
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// A row with the same unique key already exists
    #[error("{0}")]
    AlreadyExists(String),
    #[error("database error: {0}")]
    Database(#[from] sea_orm::DbErr),
}

impl RepositoryError {
    /// Classify a failed write, turning unique violations into `AlreadyExists`.
    pub(crate) fn from_write(error: sea_orm::DbErr, conflict_message: &str) -> Self {
        if is_unique_violation(&error) {
            tracing::debug!(?error, "Unique constraint violation");
            Self::AlreadyExists(conflict_message.to_string())
        } else {
            Self::Database(error)
        }
    }
}
