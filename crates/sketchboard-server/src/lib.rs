pub mod app;
pub mod config;
pub mod error;
pub mod http;

pub use app::{AppState, build_state};
pub use config::{ServerConfig, StorageBackend};
pub use error::{ApiError, StartupError};
pub use http::router;
