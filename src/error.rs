//! Error types for algoviz.
//!
//! Generators and the playback controller are total and never fail. Errors
//! only arise at the edges: loading scenario files and turning user input
//! into algorithm parameters.

use thiserror::Error;

/// Result type alias for algoviz operations.
pub type VizResult<T> = Result<T, VizError>;

/// Unified error type for all algoviz operations.
#[derive(Debug, Error)]
pub enum VizError {
    // ===== Configuration Errors =====
    /// Invalid configuration parameter.
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the configuration error.
        message: String,
    },

    /// YAML parsing error.
    #[error("YAML parsing error: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    /// Validation error.
    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    // ===== Algorithm Selection Errors =====
    /// No generator is registered under this name.
    #[error("Unknown algorithm '{0}' (run `algoviz list` to see the available ones)")]
    UnknownAlgorithm(String),

    /// A required input was not supplied.
    #[error("Algorithm '{algorithm}' requires --{parameter}")]
    MissingParameter {
        /// Algorithm being configured.
        algorithm: String,
        /// Name of the missing input.
        parameter: &'static str,
    },

    /// An input could not be parsed.
    #[error("Invalid value for --{parameter}: {message}")]
    InvalidParameter {
        /// Name of the offending input.
        parameter: &'static str,
        /// What went wrong.
        message: String,
    },

    // ===== I/O Errors =====
    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl VizError {
    /// Create a configuration error with a message.
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a serialization error.
    #[must_use]
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization(message.into())
    }

    /// Create a missing-parameter error.
    #[must_use]
    pub fn missing(algorithm: impl Into<String>, parameter: &'static str) -> Self {
        Self::MissingParameter {
            algorithm: algorithm.into(),
            parameter,
        }
    }

    /// Create an invalid-parameter error.
    #[must_use]
    pub fn invalid(parameter: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            parameter,
            message: message.into(),
        }
    }

    /// Whether the error stems from user input rather than the environment.
    #[must_use]
    pub const fn is_usage_error(&self) -> bool {
        matches!(
            self,
            Self::UnknownAlgorithm(_) | Self::MissingParameter { .. } | Self::InvalidParameter { .. }
        )
    }
}

impl From<serde_json::Error> for VizError {
    fn from(err: serde_json::Error) -> Self {
        Self::serialization(err.to_string())
    }
}
