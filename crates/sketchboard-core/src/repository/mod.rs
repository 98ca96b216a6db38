mod memory;
mod sqlite;

pub use memory::InMemorySketchRepository;
pub use sqlite::SqliteSketchRepository;

use async_trait::async_trait;
use thiserror::Error;

use crate::sketch::{NewSketch, Sketch, SketchId};

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Connection error: {message}")]
    Connection { message: String },

    #[error("Migration error: {message}")]
    Migration { message: String },

    #[error("Database error: {message}")]
    Database { message: String },

    #[error("Corrupt row: {message}")]
    Corrupt { message: String },

    #[error("In-memory repository lock poisoned: {message}")]
    LockPoisoned { message: String },
}

impl RepositoryError {
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    pub fn database(message: impl Into<String>) -> Self {
        Self::Database {
            message: message.into(),
        }
    }

    pub fn corrupt(message: impl Into<String>) -> Self {
        Self::Corrupt {
            message: message.into(),
        }
    }

    pub fn lock_poisoned(message: impl Into<String>) -> Self {
        Self::LockPoisoned {
            message: message.into(),
        }
    }
}

/// Persistence for sketch metadata rows.
#[async_trait]
pub trait SketchRepository: Send + Sync {
    /// Inserts a row, assigning its id and creation time.
    async fn insert(&self, sketch: NewSketch) -> Result<Sketch, RepositoryError>;

    /// All rows, most recently created first.
    async fn find_all(&self) -> Result<Vec<Sketch>, RepositoryError>;

    async fn find_by_id(&self, id: SketchId) -> Result<Option<Sketch>, RepositoryError>;

    /// Returns whether a row was removed.
    async fn delete(&self, id: SketchId) -> Result<bool, RepositoryError>;
}
