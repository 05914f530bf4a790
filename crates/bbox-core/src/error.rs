//! Error types for host argument handling.

use thiserror::Error;

/// Why a set of host arguments was rejected.
#[derive(Error, Debug)]
pub enum HostArgsError {
    /// The arguments are not valid JSON or miss a required field.
    #[error("Malformed host arguments: {0}")]
    Malformed(#[from] serde_json::Error),

    /// Canvas dimensions must be finite and positive.
    #[error("Invalid canvas size {width}x{height}")]
    InvalidDimensions { width: f64, height: f64 },

    /// `boxColor` is not a colour we can parse.
    #[error("Invalid box colour '{0}'")]
    InvalidColor(String),

    /// One of the initial rects has unusable geometry.
    #[error("Invalid rect at index {index}: {reason}")]
    InvalidRect { index: usize, reason: String },
}
