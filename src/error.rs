//! Error types for the heatmap core

use thiserror::Error;

/// Errors returned by matrix construction, transforms, colour ranges and export.
#[derive(Error, Debug)]
pub enum HeatmapError {
    #[error("Invalid input: {reason}")]
    InvalidInput { reason: String },

    #[error("Invalid range: low ({low}) must not exceed high ({high}) and both must be finite")]
    InvalidRange { low: f64, high: f64 },

    #[error("Export failed: {reason}")]
    Export { reason: String },

    #[error("Image encoding error: {0}")]
    Image(#[from] image::ImageError),
}

impl HeatmapError {
    pub(crate) fn invalid_input(reason: impl Into<String>) -> Self {
        HeatmapError::InvalidInput {
            reason: reason.into(),
        }
    }
}

/// Result type alias for heatmap operations
pub type Result<T> = std::result::Result<T, HeatmapError>;
