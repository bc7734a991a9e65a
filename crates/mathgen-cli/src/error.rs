use std::fmt;

use mathgen::{GenerationError, MathgenError};

#[derive(Debug)]
pub struct CliError(pub String);

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for CliError {}

impl From<String> for CliError {
    fn from(s: String) -> Self {
        CliError(s)
    }
}

impl From<&str> for CliError {
    fn from(s: &str) -> Self {
        CliError(s.to_string())
    }
}

impl From<MathgenError> for CliError {
    fn from(e: MathgenError) -> Self {
        CliError(e.to_string())
    }
}

impl From<GenerationError> for CliError {
    fn from(e: GenerationError) -> Self {
        match e {
            GenerationError::MissingKey => CliError(
                "API key is not configured. Run `mathgen config save --api-key <KEY>` \
                 or pass --api-key."
                    .to_string(),
            ),
            GenerationError::Provider(err) => CliError(format!("Generation failed: {err}")),
            other => CliError(other.to_string()),
        }
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError(format!("JSON error: {e}"))
    }
}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        CliError(format!("IO error: {e}"))
    }
}

pub type CliResult<T> = Result<T, CliError>;
