//! Single-flight coordination of generation requests
//!
//! The orchestrator moves Idle → InFlight → Idle. Preconditions are checked
//! before the busy flag is taken, so a rejected call never touches the
//! network. The flag is released by a guard, which covers success, provider
//! failure, panics inside the adapter, and the caller dropping the future.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{debug, info, warn};

use crate::document::SanitizedDocument;
use crate::prompt::{Difficulty, PromptBuilder};
use crate::provider::{
    AdapterFactory, GenerationParams, HttpAdapterFactory, ProviderConfig, ProviderError,
};

/// A single user request for worked problems
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    topic: String,
    difficulty: Difficulty,
}

impl GenerationRequest {
    /// The topic is stored trimmed; emptiness is checked by the orchestrator.
    pub fn new(topic: impl Into<String>, difficulty: Difficulty) -> Self {
        let topic = topic.into();
        Self {
            topic: topic.trim().to_string(),
            difficulty,
        }
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }
}

/// Failures of a generation request. None are retried.
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error("API key is not configured")]
    MissingKey,
    #[error("Math topic is empty")]
    MissingTopic,
    #[error("A generation request is already in flight")]
    AlreadyInFlight,
    #[error(transparent)]
    Provider(#[from] ProviderError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrchestratorState {
    Idle,
    InFlight,
}

/// Releases the busy flag when dropped
struct InFlightGuard<'a> {
    flag: &'a AtomicBool,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

pub struct RequestOrchestrator {
    factory: Arc<dyn AdapterFactory>,
    prompt: PromptBuilder,
    in_flight: AtomicBool,
}

impl RequestOrchestrator {
    /// Orchestrator backed by real HTTP adapters
    pub fn new(params: GenerationParams) -> Self {
        Self::with_factory(Arc::new(HttpAdapterFactory::new(params)))
    }

    pub fn with_factory(factory: Arc<dyn AdapterFactory>) -> Self {
        Self {
            factory,
            prompt: PromptBuilder::default(),
            in_flight: AtomicBool::new(false),
        }
    }

    pub fn with_prompt_builder(mut self, prompt: PromptBuilder) -> Self {
        self.prompt = prompt;
        self
    }

    pub fn state(&self) -> OrchestratorState {
        if self.in_flight.load(Ordering::Acquire) {
            OrchestratorState::InFlight
        } else {
            OrchestratorState::Idle
        }
    }

    fn begin(&self) -> Result<InFlightGuard<'_>, GenerationError> {
        self.in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| GenerationError::AlreadyInFlight)?;
        Ok(InFlightGuard {
            flag: &self.in_flight,
        })
    }

    /// Build the prompt, call the provider once, and sanitize the reply.
    pub async fn run(
        &self,
        request: &GenerationRequest,
        config: &ProviderConfig,
    ) -> Result<SanitizedDocument, GenerationError> {
        if config.api_key.trim().is_empty() {
            warn!("Rejected request: no API key for {}", config.provider);
            return Err(GenerationError::MissingKey);
        }
        if request.topic().is_empty() {
            warn!("Rejected request: empty topic");
            return Err(GenerationError::MissingTopic);
        }

        let _guard = self.begin().inspect_err(|_| {
            warn!("Rejected request: another generation is in flight");
        })?;

        info!(
            "Generating problems for \"{}\" ({}) via {}",
            request.topic(),
            request.difficulty(),
            config.provider
        );

        let prompt = self.prompt.build(request.topic(), request.difficulty());
        let adapter = self.factory.create(config)?;

        let raw = adapter.generate(&prompt).await.inspect_err(|e| {
            warn!("{} request failed: {}", adapter.name(), e);
        })?;
        debug!("Raw response: {} bytes", raw.len());

        let document = SanitizedDocument::from_raw(&raw);
        info!("Generation finished ({} bytes of LaTeX)", document.as_str().len());
        Ok(document)
    }
}

impl Default for RequestOrchestrator {
    fn default() -> Self {
        Self::new(GenerationParams::default())
    }
}
