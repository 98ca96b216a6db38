//! Client for the sketch API and the board workflow built on it.

pub mod board;
pub mod client;
pub mod error;

pub use board::{DEFAULT_TITLE, SketchBoard};
pub use client::{DEFAULT_API_URL, SketchClient};
pub use error::ClientError;
