//! Errors shared by the provider adapters

use reqwest::Response;
use serde::Deserialize;

/// Provider-level failures
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// Non-success HTTP status; `message` is taken from the error body when present
    #[error("{message}")]
    Api { status: u16, message: String },
    /// The request could not be sent or the body could not be read
    #[error("Transport error: {0}")]
    Transport(String),
    /// A success response without the expected content
    #[error("Malformed response: {0}")]
    MalformedResponse(String),
    /// The HTTP client could not be constructed
    #[error("Client error: {0}")]
    Client(String),
}

impl ProviderError {
    /// HTTP status for API errors
    pub fn status(&self) -> Option<u16> {
        match self {
            ProviderError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// `{"error": {"message": "..."}}`, the shape both protocols use for failures
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: Option<ErrorBody>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// Message for a failed request: the nested `error.message` when the body has
/// one, otherwise a generic line carrying the status code.
pub fn extract_error_message(status: u16, body: &str) -> String {
    serde_json::from_str::<ErrorEnvelope>(body)
        .ok()
        .and_then(|envelope| envelope.error)
        .and_then(|error| error.message)
        .filter(|message| !message.is_empty())
        .unwrap_or_else(|| format!("request failed: {status}"))
}

/// Turn a non-success response into an API error.
pub(crate) async fn error_from_response(response: Response) -> ProviderError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();

    ProviderError::Api {
        status,
        message: extract_error_message(status, &body),
    }
}
