//! LLM provider selection and adapters
//!
//! Three nominal providers map onto two wire protocols. The mapping table
//! lives in [`Provider::profile`]; the adapters only know about protocols.

pub mod adapter;
pub mod anthropic;
pub mod openai;
pub mod types;

pub use adapter::{
    AdapterFactory, GenerationParams, HttpAdapterFactory, ProviderAdapter, ProviderClient,
};
pub use anthropic::AnthropicAdapter;
pub use openai::OpenAiCompatibleAdapter;
pub use types::ProviderError;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::MathgenError;

/// A configured LLM backend identity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Provider {
    #[default]
    DeepSeek,
    OpenAI,
    Anthropic,
}

/// Wire protocol spoken by a provider
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WireProtocol {
    /// `POST {base}/chat/completions` with bearer auth
    OpenAiCompatible,
    /// `POST {base}/messages` with `x-api-key` auth
    AnthropicMessages,
}

/// Static defaults for a nominal provider
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProviderProfile {
    pub protocol: WireProtocol,
    pub default_model: &'static str,
    pub default_base_url: &'static str,
}

impl Provider {
    pub const ALL: [Provider; 3] = [Provider::DeepSeek, Provider::OpenAI, Provider::Anthropic];

    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::DeepSeek => "deepseek",
            Provider::OpenAI => "openai",
            Provider::Anthropic => "anthropic",
        }
    }

    pub fn profile(&self) -> ProviderProfile {
        match self {
            Provider::DeepSeek => ProviderProfile {
                protocol: WireProtocol::OpenAiCompatible,
                default_model: "deepseek-chat",
                default_base_url: "https://api.deepseek.com/v1",
            },
            Provider::OpenAI => ProviderProfile {
                protocol: WireProtocol::OpenAiCompatible,
                default_model: "gpt-4",
                default_base_url: "https://api.openai.com/v1",
            },
            Provider::Anthropic => ProviderProfile {
                protocol: WireProtocol::AnthropicMessages,
                default_model: "claude-3-5-sonnet-20241022",
                default_base_url: "https://api.anthropic.com/v1",
            },
        }
    }

    pub fn protocol(&self) -> WireProtocol {
        self.profile().protocol
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Provider {
    type Err = MathgenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "deepseek" => Ok(Provider::DeepSeek),
            "openai" => Ok(Provider::OpenAI),
            "anthropic" => Ok(Provider::Anthropic),
            other => Err(MathgenError::Config(format!(
                "Unknown provider '{other}' (expected deepseek, openai or anthropic)"
            ))),
        }
    }
}

impl Serialize for Provider {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Provider {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        name.parse().map_err(serde::de::Error::custom)
    }
}

/// Provider settings for a single request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderConfig {
    pub provider: Provider,
    pub api_key: String,
    /// Overrides the provider's default base URL
    pub base_url: Option<String>,
    /// Overrides the provider's default model
    pub model: Option<String>,
}

impl ProviderConfig {
    pub fn new(provider: Provider, api_key: impl Into<String>) -> Self {
        Self {
            provider,
            api_key: api_key.into(),
            base_url: None,
            model: None,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Effective base URL without a trailing slash
    pub fn base_url(&self) -> &str {
        self.base_url
            .as_deref()
            .unwrap_or(self.provider.profile().default_base_url)
            .trim_end_matches('/')
    }

    pub fn model(&self) -> &str {
        self.model
            .as_deref()
            .unwrap_or(self.provider.profile().default_model)
    }
}
