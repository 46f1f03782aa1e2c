//! Error types for augmentation operations.
//!
//! This module provides structured error types for coordinate field
//! generation and warp resampling, enabling better error handling and
//! debugging.

use thiserror::Error;

/// Main error type for augmentation operations.
#[derive(Error, Debug)]
pub enum AugmentError {
    /// Patch shape cannot be centered or has an unsupported rank.
    #[error("Invalid patch shape: {0}")]
    InvalidPatchShape(String),

    /// Field and source spatial shapes disagree.
    #[error("Shape mismatch: expected {expected:?}, got {actual:?}")]
    ShapeMismatch {
        expected: Vec<usize>,
        actual: Vec<usize>,
    },

    /// Invalid configuration.
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Non-finite values appeared where only finite values are valid.
    #[error("Numerical anomaly: {0}")]
    NumericalAnomaly(String),
}

/// Result type for augmentation operations.
pub type Result<T> = std::result::Result<T, AugmentError>;

impl AugmentError {
    /// Create an invalid patch shape error.
    pub fn invalid_patch_shape(msg: impl Into<String>) -> Self {
        Self::InvalidPatchShape(msg.into())
    }

    /// Create an invalid configuration error.
    pub fn invalid_configuration(msg: impl Into<String>) -> Self {
        Self::InvalidConfiguration(msg.into())
    }

    /// Create a numerical anomaly error.
    pub fn numerical_anomaly(msg: impl Into<String>) -> Self {
        Self::NumericalAnomaly(msg.into())
    }
}
