use thiserror::Error;

use crate::repository::RepositoryError;
use crate::sketch::{SketchId, ValidationError};
use crate::storage::StorageError;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("Sketch with ID {0} not found")]
    NotFound(SketchId),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
