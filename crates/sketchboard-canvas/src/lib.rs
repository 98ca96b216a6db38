//! Drawing surface and its linear undo/redo history.
//!
//! [`Canvas`] owns a raster [`Surface`] and a [`History`] of full-surface
//! snapshots. Strokes, clears and image loads each append one snapshot;
//! undo and redo move a cursor through them.

mod canvas;
mod error;
mod history;
mod pointer;
mod surface;
mod tool;

pub use canvas::{
    Canvas, CanvasConfig, DEFAULT_HEIGHT, DEFAULT_WIDTH, THUMBNAIL_JPEG_QUALITY,
};
pub use error::CanvasError;
pub use history::{History, Snapshot};
pub use pointer::{DisplaySize, Point};
pub use surface::{Surface, decode_data_url};
pub use tool::{BACKGROUND, LineWidth, Tool, ToolSettings, parse_hex_color};

pub use image::{Rgba, RgbaImage};
