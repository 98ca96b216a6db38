use std::num::NonZeroUsize;

use image::Rgba;
use sketchboard_core::DataUrl;
use tracing::debug;

use crate::error::CanvasError;
use crate::history::{History, Snapshot};
use crate::pointer::{DisplaySize, Point};
use crate::surface::{Surface, decode_data_url};
use crate::tool::{BACKGROUND, Tool, ToolSettings};

pub const DEFAULT_WIDTH: u32 = 800;
pub const DEFAULT_HEIGHT: u32 = 600;
pub const THUMBNAIL_JPEG_QUALITY: u8 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CanvasConfig {
    pub width: u32,
    pub height: u32,
    pub background: Rgba<u8>,
    /// Maximum snapshots retained; `None` keeps every one.
    pub history_limit: Option<NonZeroUsize>,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            background: BACKGROUND,
            history_limit: None,
        }
    }
}

/// A drawing surface plus its undo/redo history.
///
/// Every completed stroke, clear and image load records one snapshot. The
/// initial blank surface is the first snapshot, so undo can always return
/// to it.
#[derive(Debug)]
pub struct Canvas {
    surface: Surface,
    history: History,
    background: Rgba<u8>,
    settings: ToolSettings,
    stroke: Option<Point>,
}

impl Default for Canvas {
    fn default() -> Self {
        Self::new(CanvasConfig::default())
    }
}

impl Canvas {
    pub fn new(config: CanvasConfig) -> Self {
        let surface = Surface::new(config.width, config.height, config.background);
        let initial = Snapshot::new(surface.pixels().clone());
        let history = match config.history_limit {
            Some(limit) => History::with_limit(initial, limit),
            None => History::new(initial),
        };
        Self {
            surface,
            history,
            background: config.background,
            settings: ToolSettings::default(),
            stroke: None,
        }
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    pub fn settings(&self) -> ToolSettings {
        self.settings
    }

    pub fn cursor(&self) -> usize {
        self.history.cursor()
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// Records the current surface as the newest history entry.
    pub fn capture(&mut self) {
        self.history
            .push(Snapshot::new(self.surface.pixels().clone()));
        debug!(
            cursor = self.history.cursor(),
            len = self.history.len(),
            "Captured canvas snapshot"
        );
    }

    pub fn undo(&mut self) -> bool {
        match self.history.undo() {
            Some(snapshot) => {
                self.surface.replace(snapshot.pixels().clone());
                true
            }
            None => false,
        }
    }

    pub fn redo(&mut self) -> bool {
        match self.history.redo() {
            Some(snapshot) => {
                self.surface.replace(snapshot.pixels().clone());
                true
            }
            None => false,
        }
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn clear_canvas(&mut self) {
        self.stroke = None;
        self.surface.fill(self.background);
        self.capture();
    }

    /// Replaces the surface with the image in `data_url` and records it.
    ///
    /// Decoding runs on the blocking pool. On failure the surface and
    /// history are left as they were.
    pub async fn load_image(&mut self, data_url: &str) -> Result<(), CanvasError> {
        let owned = data_url.to_string();
        let image = tokio::task::spawn_blocking(move || decode_data_url(&owned)).await??;
        debug!(
            width = image.width(),
            height = image.height(),
            "Loaded image onto canvas"
        );
        self.stroke = None;
        self.surface.draw_image(&image, self.background);
        self.capture();
        Ok(())
    }

    /// PNG data URL of the whole surface.
    pub fn export_full(&self) -> Result<String, CanvasError> {
        let bytes = self.surface.encode_png()?;
        Ok(DataUrl::new("image/png", bytes).encode())
    }

    /// Low-quality JPEG data URL used for list previews.
    pub fn export_thumbnail(&self) -> Result<String, CanvasError> {
        let bytes = self.surface.encode_jpeg(THUMBNAIL_JPEG_QUALITY)?;
        Ok(DataUrl::new("image/jpeg", bytes).encode())
    }

    pub fn set_tool(&mut self, tool: Tool) {
        self.settings.tool = tool;
    }

    pub fn set_color(&mut self, color: Rgba<u8>) {
        self.settings.color = color;
    }

    pub fn set_line_width(&mut self, width: u32) {
        self.settings.line_width = width.max(1);
    }

    pub fn is_drawing(&self) -> bool {
        self.stroke.is_some()
    }

    pub fn pointer_down(&mut self, position: Point, display: DisplaySize) {
        self.stroke = Some(self.to_canvas(position, display));
    }

    pub fn pointer_move(&mut self, position: Point, display: DisplaySize) {
        let Some(previous) = self.stroke else {
            return;
        };
        let next = self.to_canvas(position, display);
        let color = self.settings.stroke_color(self.background);
        self.surface
            .stroke_segment(previous, next, self.settings.line_width, color);
        self.stroke = Some(next);
    }

    pub fn pointer_up(&mut self) {
        self.end_stroke();
    }

    pub fn pointer_leave(&mut self) {
        self.end_stroke();
    }

    fn end_stroke(&mut self) {
        if self.stroke.take().is_some() {
            self.capture();
        }
    }

    fn to_canvas(&self, position: Point, display: DisplaySize) -> Point {
        display.to_canvas(position, self.surface.width(), self.surface.height())
    }
}
