//! Rendering error types.

use thiserror::Error;

/// Errors that can occur while drawing or exporting a figure.
#[derive(Error, Debug)]
pub enum RenderError {
    /// Figure dimensions leave no room for the plot area.
    #[error("figure of {width}x{height} pixels is too small to hold a plot")]
    EmptyFigure { width: u32, height: u32 },

    /// Contour levels must be at least two strictly increasing values.
    #[error("invalid contour levels: {0}")]
    InvalidLevels(String),

    /// Requested color map is not registered.
    #[error("unknown color map '{0}'")]
    UnknownColorMap(String),

    /// Field length does not match the mesh.
    #[error("field has {actual} values but the mesh has {expected} nodes")]
    FieldSize { expected: usize, actual: usize },

    /// Failed to write the image file.
    #[error("failed to save image: {0}")]
    IoError(#[from] std::io::Error),

    /// Image encoding failed.
    #[error("image encoding error: {0}")]
    ImageError(#[from] image::ImageError),

    /// Output extension is neither png nor jpg.
    #[error("unsupported image format: {0}")]
    UnsupportedFormat(String),
}

/// A specialized Result type for rendering operations.
pub type RenderResult<T> = std::result::Result<T, RenderError>;
