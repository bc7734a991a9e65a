//! Test utilities for mathgen - mock adapters
//!
//! The mocks record how often they were called and the last prompt they saw,
//! so tests can assert that rejected requests never reach the network.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::Notify;

use crate::provider::{AdapterFactory, ProviderAdapter, ProviderConfig, ProviderError};

#[derive(Debug, Clone)]
enum MockReply {
    Text(String),
    ApiError { status: u16, message: String },
    Panic,
}

/// Lets a test hold a mock adapter inside `generate` until released.
#[derive(Debug, Default)]
pub struct Gate {
    entered: Notify,
    released: Notify,
}

impl Gate {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Resolves once the adapter has entered `generate`.
    pub async fn wait_entered(&self) {
        self.entered.notified().await;
    }

    /// Let the held adapter return.
    pub fn release(&self) {
        self.released.notify_one();
    }
}

/// Mock adapter with a canned reply
#[derive(Debug, Clone)]
pub struct MockAdapter {
    reply: MockReply,
    calls: Arc<AtomicUsize>,
    last_prompt: Arc<Mutex<Option<String>>>,
    gate: Option<Arc<Gate>>,
}

impl MockAdapter {
    fn with_reply(reply: MockReply) -> Self {
        Self {
            reply,
            calls: Arc::new(AtomicUsize::new(0)),
            last_prompt: Arc::new(Mutex::new(None)),
            gate: None,
        }
    }

    pub fn replying(text: impl Into<String>) -> Self {
        Self::with_reply(MockReply::Text(text.into()))
    }

    pub fn failing(status: u16, message: impl Into<String>) -> Self {
        Self::with_reply(MockReply::ApiError {
            status,
            message: message.into(),
        })
    }

    pub fn panicking() -> Self {
        Self::with_reply(MockReply::Panic)
    }

    pub fn with_gate(mut self, gate: Arc<Gate>) -> Self {
        self.gate = Some(gate);
        self
    }

    /// Number of `generate` calls across all clones
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_prompt(&self) -> Option<String> {
        self.last_prompt.lock().ok().and_then(|p| p.clone())
    }
}

#[async_trait]
impl ProviderAdapter for MockAdapter {
    async fn generate(&self, prompt: &str) -> Result<String, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut last) = self.last_prompt.lock() {
            *last = Some(prompt.to_string());
        }

        if let Some(gate) = &self.gate {
            gate.entered.notify_one();
            gate.released.notified().await;
        }

        match &self.reply {
            MockReply::Text(text) => Ok(text.clone()),
            MockReply::ApiError { status, message } => Err(ProviderError::Api {
                status: *status,
                message: message.clone(),
            }),
            MockReply::Panic => panic!("mock adapter panicked"),
        }
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}

/// Factory handing out clones of one mock adapter
#[derive(Debug, Clone)]
pub struct MockAdapterFactory {
    adapter: MockAdapter,
    created: Arc<AtomicUsize>,
}

impl MockAdapterFactory {
    pub fn new(adapter: MockAdapter) -> Self {
        Self {
            adapter,
            created: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Number of adapters created
    pub fn created(&self) -> usize {
        self.created.load(Ordering::SeqCst)
    }
}

impl AdapterFactory for MockAdapterFactory {
    fn create(&self, _config: &ProviderConfig) -> Result<Box<dyn ProviderAdapter>, ProviderError> {
        self.created.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(self.adapter.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn mock_adapter_counts_calls_across_clones() {
        let adapter = MockAdapter::replying("ok");
        let clone = adapter.clone();

        assert_eq!(clone.generate("first").await.unwrap(), "ok");
        assert_eq!(adapter.generate("second").await.unwrap(), "ok");

        assert_eq!(adapter.calls(), 2);
        assert_eq!(clone.last_prompt().as_deref(), Some("second"));
    }

    #[tokio::test]
    async fn mock_adapter_failure_is_api_error() {
        let adapter = MockAdapter::failing(401, "invalid key");
        let err = adapter.generate("p").await.unwrap_err();
        assert_eq!(err.status(), Some(401));
        assert_eq!(err.to_string(), "invalid key");
    }

    #[test]
    fn mock_factory_counts_creations() {
        let factory = MockAdapterFactory::new(MockAdapter::replying("ok"));
        let config = ProviderConfig::new(crate::provider::Provider::DeepSeek, "k");

        factory.create(&config).unwrap();
        factory.create(&config).unwrap();
        assert_eq!(factory.created(), 2);
    }
}
