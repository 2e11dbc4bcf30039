//! Error types for the effects crate.

use thiserror::Error;

/// Result type for effect operations.
pub type AudioResult<T> = Result<T, AudioError>;

/// Errors that can occur while building buffers or running effects.
#[derive(Debug, Error)]
pub enum AudioError {
    /// Invalid sample rate.
    #[error("invalid sample rate: {rate}")]
    InvalidSampleRate {
        /// The invalid sample rate.
        rate: u32,
    },

    /// Buffer does not satisfy the multichannel layout.
    #[error("invalid buffer: {message}")]
    InvalidBuffer {
        /// Error message.
        message: String,
    },

    /// Invalid parameter value that has no safe default.
    #[error("invalid parameter '{name}': {message}")]
    InvalidParameter {
        /// Parameter name.
        name: String,
        /// Error message.
        message: String,
    },

    /// Arithmetic singularity or non-finite result during processing.
    #[error("computation error: {message}")]
    Computation {
        /// Error message.
        message: String,
    },

    /// A processing stage changed the channel or sample count.
    #[error(
        "shape mismatch: expected {expected_channels}x{expected_samples}, got {channels}x{samples}"
    )]
    ShapeMismatch {
        /// Channel count of the input.
        expected_channels: usize,
        /// Sample count of the input.
        expected_samples: usize,
        /// Channel count produced.
        channels: usize,
        /// Sample count produced.
        samples: usize,
    },
}

impl AudioError {
    /// Creates an invalid parameter error.
    pub fn invalid_param(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Creates a computation error.
    pub fn computation(message: impl Into<String>) -> Self {
        Self::Computation {
            message: message.into(),
        }
    }

    /// Creates an invalid buffer error.
    pub fn invalid_buffer(message: impl Into<String>) -> Self {
        Self::InvalidBuffer {
            message: message.into(),
        }
    }

    /// Stable error code for machine-readable output.
    pub fn code(&self) -> &'static str {
        match self {
            AudioError::InvalidSampleRate { .. } => "FX_001",
            AudioError::InvalidBuffer { .. } => "FX_002",
            AudioError::InvalidParameter { .. } => "FX_003",
            AudioError::Computation { .. } => "FX_004",
            AudioError::ShapeMismatch { .. } => "FX_005",
        }
    }

    /// Returns true for errors raised by an arithmetic singularity.
    pub fn is_computation(&self) -> bool {
        matches!(self, AudioError::Computation { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_param_helper() {
        let err = AudioError::invalid_param("carrier_freq", "must be finite");
        assert!(err.to_string().contains("carrier_freq"));
        assert!(err.to_string().contains("must be finite"));
    }

    #[test]
    fn test_computation_helper() {
        let err = AudioError::computation("division by zero");
        assert!(err.is_computation());
        assert!(err.to_string().contains("division by zero"));
        assert_eq!(err.code(), "FX_004");
    }

    #[test]
    fn test_shape_mismatch_message() {
        let err = AudioError::ShapeMismatch {
            expected_channels: 2,
            expected_samples: 100,
            channels: 2,
            samples: 99,
        };
        assert_eq!(
            err.to_string(),
            "shape mismatch: expected 2x100, got 2x99"
        );
        assert!(!err.is_computation());
    }
}
