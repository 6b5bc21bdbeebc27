//! Error types for filter construction and preset evaluation.

use thiserror::Error;

/// Error type for filters, layers, pools and presets.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FilterError {
    /// A filter, layer or pool entry was configured with unusable parameters.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// The image buffer is not `H x W x 3` or holds values outside `[0, 1]`.
    #[error("invalid image shape: {0}")]
    InvalidImageShape(String),

    /// A tone curve spans no interval between its endpoints.
    #[error("degenerate interpolation: {0}")]
    DegenerateInterpolation(String),

    /// No preset is registered under the requested name.
    #[error("unknown preset: {0}")]
    UnknownPreset(String),
}

/// Result type for filter operations.
pub type FilterResult<T> = Result<T, FilterError>;
