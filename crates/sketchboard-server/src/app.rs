use std::sync::Arc;

use sketchboard_core::{
    InMemoryStorage, SketchRepository, SketchService, SqliteSketchRepository, StorageGateway,
    SupabaseConfig, SupabaseStorage,
};
use tracing::info;

use crate::config::{ServerConfig, StorageBackend};
use crate::error::StartupError;

/// Shared request state.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<SketchService>,
    /// Set when blobs are held in memory so the router can serve them back.
    pub blobs: Option<Arc<InMemoryStorage>>,
}

impl AppState {
    pub fn new(service: SketchService) -> Self {
        Self {
            service: Arc::new(service),
            blobs: None,
        }
    }

    pub fn with_blobs(mut self, blobs: Arc<InMemoryStorage>) -> Self {
        self.blobs = Some(blobs);
        self
    }
}

/// Connects the repository and storage backend named by `config`.
pub async fn build_state(config: &ServerConfig) -> Result<AppState, StartupError> {
    let repository: Arc<dyn SketchRepository> =
        Arc::new(SqliteSketchRepository::connect(&config.db_uri).await?);
    info!(db = %config.db_uri, "Connected to sketch database");

    match config.storage_backend {
        StorageBackend::Supabase => {
            let storage = supabase_storage(config)?;
            info!(bucket = %config.supabase_storage_bucket, "Using Supabase storage");
            Ok(AppState::new(SketchService::new(repository, storage)))
        }
        StorageBackend::Memory => {
            let public_base = config.public_base_url()?;
            info!(public_base = %public_base, "Using in-memory storage");
            let blobs = Arc::new(InMemoryStorage::new(
                public_base,
                config.supabase_storage_bucket.clone(),
            ));
            let storage: Arc<dyn StorageGateway> = blobs.clone();
            Ok(AppState::new(SketchService::new(repository, storage)).with_blobs(blobs))
        }
    }
}

fn supabase_storage(config: &ServerConfig) -> Result<Arc<dyn StorageGateway>, StartupError> {
    let (Some(url), Some(key)) = (&config.supabase_url, &config.supabase_service_role_key) else {
        return Err(StartupError::MissingSupabaseConfig);
    };
    if key.is_empty() {
        return Err(StartupError::MissingSupabaseConfig);
    }
    let supabase = SupabaseConfig::new(url.clone(), key.clone())
        .with_bucket(config.supabase_storage_bucket.clone());
    Ok(Arc::new(SupabaseStorage::new(supabase)))
}
