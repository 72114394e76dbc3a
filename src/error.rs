//! Error taxonomy shared by every analysis stage.
//!
//! Structural failures (unreadable input, degenerate disc detection, ROI
//! placement) surface as [`AnalysisError`]. Numeric degeneracies such as a
//! zero divisor are not errors: the stage that meets them substitutes 0.
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AnalysisError {
    /// Malformed, unreadable or wrongly shaped input.
    #[error("invalid input: {0}")]
    InputError(String),
    /// The optic disc score map carried no usable response.
    #[error("optic disc not found: {0}")]
    DetectionFailure(String),
    /// A region could not be placed inside the image bounds.
    #[error("geometry error: {0}")]
    GeometryError(String),
}

impl From<image::ImageError> for AnalysisError {
    fn from(err: image::ImageError) -> Self {
        AnalysisError::InputError(err.to_string())
    }
}

impl From<std::io::Error> for AnalysisError {
    fn from(err: std::io::Error) -> Self {
        AnalysisError::InputError(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AnalysisError>;
