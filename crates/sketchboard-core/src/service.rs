//! Coordinates blob storage and metadata persistence for saving, listing and
//! deleting sketch versions.
//!
//! Neither create nor remove compensates on partial failure. A create whose
//! thumbnail upload fails leaves the full image orphaned in storage; a remove
//! whose blob deletion fails keeps the row even if the other blob is gone.

use std::sync::Arc;
use tracing::{error, info};

use crate::error::{Error, Result};
use crate::repository::SketchRepository;
use crate::sketch::{CreateSketch, NewSketch, Sketch, SketchId};
use crate::storage::{FULL_IMAGE_FOLDER, StorageGateway, THUMBNAIL_FOLDER, generate_file_name};

#[derive(Clone)]
pub struct SketchService {
    repository: Arc<dyn SketchRepository>,
    storage: Arc<dyn StorageGateway>,
}

impl SketchService {
    pub fn new(repository: Arc<dyn SketchRepository>, storage: Arc<dyn StorageGateway>) -> Self {
        Self {
            repository,
            storage,
        }
    }

    pub async fn create(&self, request: CreateSketch) -> Result<Sketch> {
        self.try_create(request).await.inspect_err(|e| {
            error!(error = %e, "Failed to create sketch");
        })
    }

    async fn try_create(&self, request: CreateSketch) -> Result<Sketch> {
        let image_file_name = generate_file_name("sketch", "png");
        let thumbnail_file_name = generate_file_name("thumb", "jpg");

        info!(file = %image_file_name, "Uploading full image...");
        let image_url = self
            .storage
            .upload_image(&image_file_name, request.image_data(), FULL_IMAGE_FOLDER)
            .await?;

        info!(file = %thumbnail_file_name, "Uploading thumbnail...");
        let thumbnail_url = self
            .storage
            .upload_image(&thumbnail_file_name, request.thumbnail(), THUMBNAIL_FOLDER)
            .await?;

        let saved = self
            .repository
            .insert(NewSketch {
                title: request.title().to_string(),
                image_url,
                thumbnail_url,
            })
            .await?;

        info!(id = %saved.id, "Sketch created with ID: {}", saved.id);
        Ok(saved)
    }

    pub async fn find_all(&self) -> Result<Vec<Sketch>> {
        Ok(self.repository.find_all().await?)
    }

    pub async fn find_one(&self, id: SketchId) -> Result<Sketch> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(Error::NotFound(id))
    }

    pub async fn remove(&self, id: SketchId) -> Result<()> {
        self.try_remove(id).await.inspect_err(|e| {
            error!(id = %id, error = %e, "Failed to delete sketch {}", id);
        })
    }

    async fn try_remove(&self, id: SketchId) -> Result<()> {
        let sketch = self.find_one(id).await?;

        self.storage
            .delete_images(&[sketch.image_url, sketch.thumbnail_url])
            .await?;

        self.repository.delete(id).await?;
        info!(id = %id, "Sketch {} deleted successfully", id);
        Ok(())
    }
}
