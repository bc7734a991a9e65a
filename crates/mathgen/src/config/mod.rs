mod store;

pub use store::{CONFIG_FILE_NAME, ConfigStore};

use serde::{Deserialize, Serialize};
use std::env;

use crate::prompt::{DEFAULT_PROBLEM_COUNT, Difficulty};
use crate::provider::{GenerationParams, Provider, ProviderConfig};

/// Main configuration structure for mathgen
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Provider selection and credentials
    #[serde(default)]
    pub provider: ProviderSettings,
    /// Prompt and request parameters
    #[serde(default)]
    pub generation: GenerationConfig,
    /// Log filter used when RUST_LOG is not set
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Persisted provider settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderSettings {
    /// Provider name: deepseek, openai or anthropic
    #[serde(default)]
    pub name: Provider,
    /// API key stored in the config file (may be empty)
    #[serde(default)]
    pub api_key: String,
    /// Environment variable consulted when `api_key` is empty
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    /// Base URL override; the provider default is used when unset or empty
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Model override; the provider default is used when unset or empty
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            name: Provider::default(),
            api_key: String::new(),
            api_key_env: default_api_key_env(),
            base_url: None,
            model: None,
        }
    }
}

fn default_api_key_env() -> String {
    "MATHGEN_API_KEY".to_string()
}

impl ProviderSettings {
    /// Resolve the stored settings into the per-request provider config.
    ///
    /// The stored key wins; the `api_key_env` variable is only read when the
    /// stored key is empty. An empty result is left for the orchestrator to
    /// reject.
    pub fn to_provider_config(&self) -> ProviderConfig {
        let api_key = if self.api_key.trim().is_empty() {
            env::var(&self.api_key_env).unwrap_or_default()
        } else {
            self.api_key.clone()
        };

        ProviderConfig {
            provider: self.name,
            api_key,
            base_url: non_empty(self.base_url.as_deref()),
            model: non_empty(self.model.as_deref()),
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Generation parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Difficulty used when none is given on the command line
    #[serde(default)]
    pub default_difficulty: Difficulty,
    /// Number of problems requested in the prompt
    #[serde(default = "default_problem_count")]
    pub problem_count: u32,
    /// Sampling temperature (OpenAI-compatible providers only)
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    /// Maximum completion tokens
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// Transport timeout in seconds; no timeout when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            default_difficulty: Difficulty::default(),
            problem_count: default_problem_count(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            timeout_secs: None,
        }
    }
}

fn default_problem_count() -> u32 {
    DEFAULT_PROBLEM_COUNT
}

fn default_temperature() -> f64 {
    0.7
}

fn default_max_tokens() -> u32 {
    4000
}

impl GenerationConfig {
    pub fn params(&self) -> GenerationParams {
        GenerationParams {
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            timeout_secs: self.timeout_secs,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Filter directive, e.g. "info" or "mathgen=debug"
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}
