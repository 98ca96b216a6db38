// Sketch persistence: model, storage gateway, metadata repository and the
// service that coordinates them.

pub mod data_url;
pub mod error;
pub mod repository;
pub mod service;
pub mod sketch;
pub mod storage;

pub use data_url::{DataUrl, DataUrlError};
pub use error::{Error, Result};
pub use repository::{
    InMemorySketchRepository, RepositoryError, SketchRepository, SqliteSketchRepository,
};
pub use service::SketchService;
pub use sketch::{CreateSketch, CreateSketchRequest, NewSketch, Sketch, SketchId, ValidationError};
pub use storage::{
    InMemoryStorage, StorageError, StorageGateway, StoredObject, SupabaseConfig, SupabaseStorage,
    generate_file_name,
};
