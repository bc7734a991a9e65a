//! Provider adapter trait and protocol dispatch
//!
//! [`ProviderClient`] is the tagged union of the two wire protocols. Callers
//! that need to substitute the network layer go through [`AdapterFactory`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use super::anthropic::AnthropicAdapter;
use super::openai::OpenAiCompatibleAdapter;
use super::types::ProviderError;
use super::{ProviderConfig, WireProtocol};

/// Capability shared by every provider backend
///
/// Each call performs exactly one outbound request. No retries.
#[async_trait]
pub trait ProviderAdapter: Send + Sync {
    /// Send the prompt as a single user message and return the raw reply text
    async fn generate(&self, prompt: &str) -> Result<String, ProviderError>;

    /// Adapter name for logging
    fn name(&self) -> &'static str;
}

/// Request parameters shared by both protocols
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationParams {
    /// Sent by the OpenAI-compatible protocol only
    pub temperature: f64,
    pub max_tokens: u32,
    /// Transport timeout; `None` leaves the client default (no timeout)
    pub timeout_secs: Option<u64>,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            max_tokens: 4000,
            timeout_secs: None,
        }
    }
}

pub(crate) fn build_http_client(params: &GenerationParams) -> Result<Client, ProviderError> {
    let mut builder = Client::builder();
    if let Some(secs) = params.timeout_secs {
        builder = builder.timeout(Duration::from_secs(secs));
    }
    builder
        .build()
        .map_err(|e| ProviderError::Client(e.to_string()))
}

/// One variant per wire protocol
#[derive(Debug)]
pub enum ProviderClient {
    OpenAiCompatible(OpenAiCompatibleAdapter),
    Anthropic(AnthropicAdapter),
}

impl ProviderClient {
    /// Pick the adapter for the configured provider's protocol.
    pub fn from_config(
        config: &ProviderConfig,
        params: &GenerationParams,
    ) -> Result<Self, ProviderError> {
        match config.provider.protocol() {
            WireProtocol::AnthropicMessages => {
                Ok(Self::Anthropic(AnthropicAdapter::new(config, params)?))
            }
            WireProtocol::OpenAiCompatible => Ok(Self::OpenAiCompatible(
                OpenAiCompatibleAdapter::new(config, params)?,
            )),
        }
    }

    pub fn protocol(&self) -> WireProtocol {
        match self {
            ProviderClient::OpenAiCompatible(_) => WireProtocol::OpenAiCompatible,
            ProviderClient::Anthropic(_) => WireProtocol::AnthropicMessages,
        }
    }
}

#[async_trait]
impl ProviderAdapter for ProviderClient {
    async fn generate(&self, prompt: &str) -> Result<String, ProviderError> {
        match self {
            ProviderClient::OpenAiCompatible(adapter) => adapter.generate(prompt).await,
            ProviderClient::Anthropic(adapter) => adapter.generate(prompt).await,
        }
    }

    fn name(&self) -> &'static str {
        match self {
            ProviderClient::OpenAiCompatible(adapter) => adapter.name(),
            ProviderClient::Anthropic(adapter) => adapter.name(),
        }
    }
}

/// Builds an adapter for a request's provider config
pub trait AdapterFactory: Send + Sync {
    fn create(&self, config: &ProviderConfig) -> Result<Box<dyn ProviderAdapter>, ProviderError>;
}

/// Factory producing real HTTP adapters
#[derive(Debug, Clone, Default)]
pub struct HttpAdapterFactory {
    params: GenerationParams,
}

impl HttpAdapterFactory {
    pub fn new(params: GenerationParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &GenerationParams {
        &self.params
    }
}

impl AdapterFactory for HttpAdapterFactory {
    fn create(&self, config: &ProviderConfig) -> Result<Box<dyn ProviderAdapter>, ProviderError> {
        Ok(Box::new(ProviderClient::from_config(config, &self.params)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::Provider;

    #[test]
    fn test_dispatch_is_two_way() {
        let params = GenerationParams::default();

        for provider in [Provider::DeepSeek, Provider::OpenAI] {
            let client =
                ProviderClient::from_config(&ProviderConfig::new(provider, "k"), &params).unwrap();
            assert_eq!(client.protocol(), WireProtocol::OpenAiCompatible);
            assert_eq!(client.name(), "openai-compatible");
        }

        let client =
            ProviderClient::from_config(&ProviderConfig::new(Provider::Anthropic, "k"), &params)
                .unwrap();
        assert_eq!(client.protocol(), WireProtocol::AnthropicMessages);
        assert_eq!(client.name(), "anthropic");
    }

    #[test]
    fn test_default_params() {
        let params = GenerationParams::default();
        assert_eq!(params.temperature, 0.7);
        assert_eq!(params.max_tokens, 4000);
        assert!(params.timeout_secs.is_none());
    }

    #[test]
    fn test_http_factory_creates_adapter() {
        let factory = HttpAdapterFactory::default();
        let adapter = factory
            .create(&ProviderConfig::new(Provider::Anthropic, "k"))
            .unwrap();
        assert_eq!(adapter.name(), "anthropic");
    }
}
