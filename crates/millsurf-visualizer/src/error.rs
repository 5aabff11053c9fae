//! Error types for simulation and rendering

use std::path::PathBuf;

use millsurf_core::{ConfigurationError, ParseError};
use thiserror::Error;

/// Failure of a simulation run
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimulationError {
    /// The program text could not be parsed
    #[error("G-code parse error: {0}")]
    Parse(#[from] ParseError),

    /// A simulation parameter is out of range
    #[error("Invalid configuration: {0}")]
    Configuration(#[from] ConfigurationError),

    /// The progress callback asked to stop
    #[error("Simulation cancelled")]
    Cancelled,

    /// The motion extent needs more cells than the grid limit allows
    #[error("Height map of {width}x{height} px exceeds the {limit} cell limit")]
    GridTooLarge { width: u64, height: u64, limit: u64 },
}

/// Failure while turning a height map into an image file
#[derive(Error, Debug)]
pub enum RenderError {
    /// Encoder error
    #[error("Image encoding error: {0}")]
    Image(#[from] image::ImageError),

    /// PNG encoder error
    #[error("PNG encoding error: {0}")]
    Png(#[from] png::EncodingError),

    /// I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Output extension is neither JPEG nor PNG
    #[error("Unsupported image format for '{}'", path.display())]
    UnsupportedFormat {
        /// The requested output path.
        path: PathBuf,
    },

    /// Fixed depth range that is zero, negative or not finite
    #[error("Depth range must be positive, got {0}")]
    InvalidDepthRange(f64),

    /// Grid overlay with unusable spacing or line width
    #[error("Invalid grid overlay: {0}")]
    InvalidGrid(String),
}

/// Result type for render operations
pub type RenderResult<T> = std::result::Result<T, RenderError>;
