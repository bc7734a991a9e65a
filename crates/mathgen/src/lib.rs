//! mathgen - worked math problems as LaTeX, generated by an LLM provider
//!
//! The pipeline is prompt construction, provider dispatch, response
//! extraction and sanitation. [`RequestOrchestrator`] ties the pieces together
//! and allows one request in flight at a time.

pub mod config;
pub mod document;
pub mod error;
pub mod orchestrator;
pub mod prompt;
pub mod provider;
pub mod sanitize;
pub mod testing;

pub use document::SanitizedDocument;
pub use error::MathgenError;
pub use orchestrator::{GenerationError, GenerationRequest, OrchestratorState, RequestOrchestrator};
pub use prompt::{Difficulty, PromptBuilder, build_prompt};
pub use provider::{Provider, ProviderConfig, ProviderError};
pub use sanitize::sanitize;
