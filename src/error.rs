use std::path::PathBuf;
use thiserror::Error;

/// Errors from the export, snapshot and config layers.
///
/// The generator itself never fails.
#[derive(Debug, Error)]
pub enum ArtError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to encode image: {0}")]
    Image(#[from] image::ImageError),

    #[error("failed to encode GIF: {0}")]
    Gif(#[from] gif::EncodingError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unsupported export format for '{}' (expected png, gif, svg or json)", .0.display())]
    UnsupportedFormat(PathBuf),

    #[error("could not determine config directory")]
    NoConfigDir,
}
