use thiserror::Error;

#[derive(Error, Debug)]
pub enum CropperError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid aspect ratio: {0}")]
    InvalidAspectRatio(f64),

    #[error("Unsupported file type: {0}")]
    UnsupportedMimeType(String),

    #[error("File too large: {size} bytes (max {limit})")]
    FileTooLarge { size: usize, limit: usize },

    #[error("Empty file")]
    EmptyFile,

    #[error("Image format error: {0}")]
    ImageError(#[from] image::ImageError),

    #[error("Degenerate geometry: {0}")]
    DegenerateGeometry(String),

    #[error("Crop session is not ready")]
    NotReady,

    #[error("Export error: {0}")]
    Export(String),

    #[error("Config error: {0}")]
    Config(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, CropperError>;
