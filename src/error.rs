//! Error types for the warp core.
//!
//! Every error is a local precondition violation reported synchronously at
//! the call boundary. None are retryable; callers keep rendering the last
//! good frame.

use thiserror::Error;

/// Errors surfaced by the warp core.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum WarpError {
    /// Accessor called with an index outside `[0, count)`.
    #[error("particle index {index} out of range (count {count})")]
    IndexOutOfRange {
        /// Requested index.
        index: usize,
        /// Number of particles in the field.
        count: usize,
    },

    /// Per-frame operation invoked before the field was initialized.
    #[error("particle field not initialized")]
    NotInitialized,

    /// Rejected configuration value.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Frame times must be finite and non-negative.
    #[error("invalid frame time: elapsed {elapsed}, delta {delta}")]
    InvalidFrameTime {
        /// Host clock reading.
        elapsed: f32,
        /// Frame delta.
        delta: f32,
    },

    /// Configuration JSON could not be decoded.
    #[error("failed to parse configuration: {0}")]
    ConfigParse(String),
}

impl From<serde_json::Error> for WarpError {
    fn from(e: serde_json::Error) -> Self {
        WarpError::ConfigParse(e.to_string())
    }
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, WarpError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let err = WarpError::IndexOutOfRange { index: 7, count: 3 };
        assert_eq!(err.to_string(), "particle index 7 out of range (count 3)");
        assert_eq!(
            WarpError::NotInitialized.to_string(),
            "particle field not initialized"
        );
    }

    #[test]
    fn test_from_json_error() {
        let json_err = serde_json::from_str::<u32>("not a number").unwrap_err();
        let err: WarpError = json_err.into();
        assert!(matches!(err, WarpError::ConfigParse(_)));
    }
}
