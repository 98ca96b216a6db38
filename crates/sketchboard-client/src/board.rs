//! The drawing board: a canvas plus the list of saved versions.
//!
//! The visible list only changes after the server confirms an operation, so
//! a failed save or delete leaves it exactly as it was.

use sketchboard_canvas::Canvas;
use sketchboard_core::{Sketch, SketchId};
use tracing::info;

use crate::client::SketchClient;
use crate::error::ClientError;

pub const DEFAULT_TITLE: &str = "Untitled";

#[derive(Debug)]
pub struct SketchBoard {
    client: SketchClient,
    canvas: Canvas,
    sketches: Vec<Sketch>,
}

impl SketchBoard {
    pub fn new(client: SketchClient, canvas: Canvas) -> Self {
        Self {
            client,
            canvas,
            sketches: Vec::new(),
        }
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn canvas_mut(&mut self) -> &mut Canvas {
        &mut self.canvas
    }

    pub fn client(&self) -> &SketchClient {
        &self.client
    }

    /// Saved versions, newest first.
    pub fn sketches(&self) -> &[Sketch] {
        &self.sketches
    }

    pub async fn refresh(&mut self) -> Result<&[Sketch], ClientError> {
        self.sketches = self.client.list().await?;
        Ok(&self.sketches)
    }

    /// Saves the canvas as a new version. An empty title becomes "Untitled".
    pub async fn save_version(&mut self, title: &str) -> Result<Sketch, ClientError> {
        let title = if title.is_empty() { DEFAULT_TITLE } else { title };
        let image_data = self.canvas.export_full()?;
        let thumbnail = self.canvas.export_thumbnail()?;

        let sketch = self.client.create(title, &image_data, &thumbnail).await?;
        info!(id = %sketch.id, title = %sketch.title, "Version saved");
        self.sketches.insert(0, sketch.clone());
        Ok(sketch)
    }

    /// Loads a saved version's full image onto the canvas as a new history
    /// entry.
    pub async fn restore(&mut self, id: SketchId) -> Result<Sketch, ClientError> {
        let sketch = match self.sketches.iter().find(|s| s.id == id) {
            Some(sketch) => sketch.clone(),
            None => self.client.get(id).await?,
        };
        let data_url = self.client.fetch_image_data_url(&sketch.image_url).await?;
        self.canvas.load_image(&data_url).await?;
        info!(id = %sketch.id, "Version restored");
        Ok(sketch)
    }

    pub async fn delete(&mut self, id: SketchId) -> Result<(), ClientError> {
        self.client.delete(id).await?;
        self.sketches.retain(|s| s.id != id);
        info!(id = %id, "Version deleted");
        Ok(())
    }
}
