//! Anthropic Messages API adapter

use std::fmt;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::adapter::{GenerationParams, ProviderAdapter, build_http_client};
use super::types::{ProviderError, error_from_response};
use super::ProviderConfig;

/// Anthropic API version header value
pub const ANTHROPIC_VERSION: &str = "2023-06-01";

pub struct AnthropicAdapter {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: Vec<AnthropicMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct AnthropicMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(default)]
    text: Option<String>,
}

impl AnthropicAdapter {
    pub fn new(config: &ProviderConfig, params: &GenerationParams) -> Result<Self, ProviderError> {
        Ok(Self {
            client: build_http_client(params)?,
            base_url: config.base_url().to_string(),
            api_key: config.api_key.clone(),
            model: config.model().to_string(),
            max_tokens: params.max_tokens,
        })
    }

    pub fn endpoint(&self) -> String {
        format!("{}/messages", self.base_url)
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

impl fmt::Debug for AnthropicAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnthropicAdapter")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl ProviderAdapter for AnthropicAdapter {
    async fn generate(&self, prompt: &str) -> Result<String, ProviderError> {
        let request = MessagesRequest {
            model: &self.model,
            max_tokens: self.max_tokens,
            messages: vec![AnthropicMessage {
                role: "user",
                content: prompt,
            }],
        };

        let url = self.endpoint();
        debug!("Calling Anthropic API at: {} (model {})", url, self.model);

        let response = self
            .client
            .post(&url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| ProviderError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }

        let message: MessagesResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::MalformedResponse(e.to_string()))?;

        let text = message
            .content
            .into_iter()
            .next()
            .and_then(|block| block.text)
            .ok_or_else(|| {
                ProviderError::MalformedResponse("response has no text content".to_string())
            })?;

        info!("Received {} bytes from {}", text.len(), self.model);
        Ok(text)
    }

    fn name(&self) -> &'static str {
        "anthropic"
    }
}
