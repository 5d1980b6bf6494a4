use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum IconError {
    #[error("invalid icon size {0}: must be between 1 and 8192 pixels")]
    InvalidSize(u32),
    #[error("invalid gradient: {0}")]
    InvalidGradient(String),
    #[error("invalid style: {0}")]
    InvalidStyle(String),
    #[error("{}: {}", .path.display(), .source)]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("image encoding failed: {0}")]
    Image(#[from] image::ImageError),
    #[error("style file could not be parsed: {0}")]
    StyleParse(#[from] serde_json::Error),
}

impl IconError {
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        IconError::Io { path: path.into(), source }
    }
}
