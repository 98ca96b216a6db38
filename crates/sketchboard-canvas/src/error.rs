use sketchboard_core::DataUrlError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CanvasError {
    #[error("Invalid image data URL: {0}")]
    InvalidDataUrl(#[from] DataUrlError),

    #[error("Failed to decode image: {0}")]
    Decode(#[source] image::ImageError),

    #[error("Failed to encode image: {0}")]
    Encode(#[source] image::ImageError),

    #[error("Image decode task failed: {0}")]
    DecodeTask(#[from] tokio::task::JoinError),

    #[error("Invalid color '{0}': expected #rgb or #rrggbb")]
    InvalidColor(String),
}
