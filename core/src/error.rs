use thiserror::Error;

// Errors raised while validating inputs before the numeric kernels run.
// The kernels themselves never fail.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TerrainError {
    #[error("invalid config: {field} {reason}")]
    InvalidConfig { field: &'static str, reason: String },

    #[error("invalid dimensions {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },

    #[error("buffer length {actual} does not match {width}x{height}")]
    LengthMismatch {
        width: usize,
        height: usize,
        actual: usize,
    },

    #[error("erosion needs a square map, got {width}x{height}")]
    NotSquare { width: usize, height: usize },
}

pub type Result<T> = std::result::Result<T, TerrainError>;

impl TerrainError {
    pub(crate) fn config(field: &'static str, reason: impl Into<String>) -> Self {
        TerrainError::InvalidConfig {
            field,
            reason: reason.into(),
        }
    }
}
