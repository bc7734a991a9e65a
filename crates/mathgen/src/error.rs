//! Error types for mathgen

use thiserror::Error;

use crate::orchestrator::GenerationError;

/// Main error type for mathgen operations
#[derive(Error, Debug)]
pub enum MathgenError {
    /// Configuration errors (missing file, bad TOML, unknown provider)
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// A generation request failed
    #[error(transparent)]
    Generation(#[from] GenerationError),

    /// General errors
    #[error("{0}")]
    General(String),
}

impl From<toml::de::Error> for MathgenError {
    fn from(e: toml::de::Error) -> Self {
        MathgenError::Config(format!("Failed to parse config: {e}"))
    }
}

impl From<toml::ser::Error> for MathgenError {
    fn from(e: toml::ser::Error) -> Self {
        MathgenError::Serialization(e.to_string())
    }
}

/// Result type alias for mathgen operations
pub type Result<T> = std::result::Result<T, MathgenError>;
