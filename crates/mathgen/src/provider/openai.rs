//! OpenAI-compatible chat completions adapter
//!
//! Serves every provider that speaks `POST {base}/chat/completions` with a
//! bearer token (OpenAI and DeepSeek).

use std::fmt;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::adapter::{GenerationParams, ProviderAdapter, build_http_client};
use super::types::{ProviderError, error_from_response};
use super::ProviderConfig;

pub struct OpenAiCompatibleAdapter {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
    temperature: f64,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<Message<'a>>,
    temperature: f64,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

impl OpenAiCompatibleAdapter {
    pub fn new(config: &ProviderConfig, params: &GenerationParams) -> Result<Self, ProviderError> {
        Ok(Self {
            client: build_http_client(params)?,
            base_url: config.base_url().to_string(),
            api_key: config.api_key.clone(),
            model: config.model().to_string(),
            temperature: params.temperature,
            max_tokens: params.max_tokens,
        })
    }

    pub fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

impl fmt::Debug for OpenAiCompatibleAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenAiCompatibleAdapter")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl ProviderAdapter for OpenAiCompatibleAdapter {
    async fn generate(&self, prompt: &str) -> Result<String, ProviderError> {
        let request = ChatCompletionRequest {
            model: &self.model,
            messages: vec![Message {
                role: "user",
                content: prompt,
            }],
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };

        let url = self.endpoint();
        debug!("Calling OpenAI-compatible API at: {} (model {})", url, self.model);

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| ProviderError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::MalformedResponse(e.to_string()))?;

        let content = completion
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| {
                ProviderError::MalformedResponse("response has no message content".to_string())
            })?;

        info!("Received {} bytes from {}", content.len(), self.model);
        Ok(content)
    }

    fn name(&self) -> &'static str {
        "openai-compatible"
    }
}
