//! Error handling for band-power feature extraction
//!
//! `BandpowerError` covers every failure category inside the pipeline.
//! `ExtractionError` is what the top-level extraction call hands back to
//! its caller: the failing recording, its status and the underlying cause.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for extraction operations
pub type BandpowerResult<T> = Result<T, BandpowerError>;

/// Error type for all extraction operations
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum BandpowerError {
    /// Configuration rejected by validation
    #[error("Invalid configuration: {reason}")]
    InvalidConfig {
        /// Description of the configuration error
        reason: String,
    },

    /// Recording shape or metadata is unusable
    #[error("Invalid recording: {reason}")]
    InvalidRecording {
        /// Description of the recording issue
        reason: String,
    },

    /// Band-pass filtering failed (malformed edges, order too large, ...)
    #[error("Filtering failed for band [{low_hz}, {high_hz}] Hz: {reason}")]
    FilterFailed {
        /// Lower band edge in Hz
        low_hz: f64,
        /// Upper band edge in Hz
        high_hz: f64,
        /// Description of the filter failure
        reason: String,
    },

    /// Headset interpolation failed or is unsupported
    #[error("Headset interpolation failed: {reason}")]
    InterpolationFailed {
        /// Description of the interpolation failure
        reason: String,
    },

    /// A recording does not carry the expected number of channels
    #[error("Channel mismatch: expected {expected} channels, got {actual}")]
    ChannelMismatch {
        /// Expected channel count
        expected: usize,
        /// Channel count found
        actual: usize,
    },

    /// JSON import/export error
    #[error("Serialization error: {reason}")]
    Serialization {
        /// Serialization error description
        reason: String,
    },
}

impl From<serde_json::Error> for BandpowerError {
    fn from(err: serde_json::Error) -> Self {
        BandpowerError::Serialization {
            reason: err.to_string(),
        }
    }
}

/// Processing status attached to a failed extraction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtractionStatus {
    /// The recording was not turned into a feature set
    Unprocessed,
}

impl std::fmt::Display for ExtractionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExtractionStatus::Unprocessed => write!(f, "unprocessed"),
        }
    }
}

/// Failure of a whole extraction call
#[derive(Debug, Clone, PartialEq, Error)]
#[error("Feature extraction failed for recording '{recording}': {source}")]
pub struct ExtractionError {
    /// Name of the recording that failed
    pub recording: String,
    /// Always `Unprocessed`: no partial results are returned
    pub status: ExtractionStatus,
    /// First fatal error raised by the pipeline
    #[source]
    pub source: BandpowerError,
}

impl ExtractionError {
    /// Wrap a pipeline error for the given recording
    pub fn new(recording: impl Into<String>, source: BandpowerError) -> Self {
        Self {
            recording: recording.into(),
            status: ExtractionStatus::Unprocessed,
            source,
        }
    }

    /// Human-readable diagnostic message
    pub fn message(&self) -> String {
        self.to_string()
    }
}

/// Convenience macro for creating configuration errors
#[macro_export]
macro_rules! config_error {
    ($($arg:tt)*) => {
        $crate::error::BandpowerError::InvalidConfig {
            reason: format!($($arg)*),
        }
    };
}

/// Convenience macro for creating recording errors
#[macro_export]
macro_rules! recording_error {
    ($($arg:tt)*) => {
        $crate::error::BandpowerError::InvalidRecording {
            reason: format!($($arg)*),
        }
    };
}
