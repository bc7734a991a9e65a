//! Integration tests for the request orchestrator state machine
//!
//! Uses mock adapters so every test is deterministic and offline:
//! - Precondition failures never reach the adapter
//! - Only one request may be in flight
//! - The busy flag is released on every exit path

use std::sync::Arc;
use std::time::Duration;

use mathgen::orchestrator::{GenerationError, GenerationRequest, OrchestratorState, RequestOrchestrator};
use mathgen::prompt::Difficulty;
use mathgen::provider::{Provider, ProviderConfig, ProviderError};
use mathgen::testing::{Gate, MockAdapter, MockAdapterFactory};

const DOCUMENT: &str = "\\documentclass{article}\n\\begin{document}\nx\n\\end{document}";

fn orchestrator_with(adapter: &MockAdapter) -> (Arc<RequestOrchestrator>, MockAdapterFactory) {
    let factory = MockAdapterFactory::new(adapter.clone());
    let orchestrator = RequestOrchestrator::with_factory(Arc::new(factory.clone()));
    (Arc::new(orchestrator), factory)
}

fn valid_request() -> GenerationRequest {
    GenerationRequest::new("导数", Difficulty::Simple)
}

fn valid_config() -> ProviderConfig {
    ProviderConfig::new(Provider::DeepSeek, "sk-test")
}

// =============================================================================
// Preconditions
// =============================================================================

#[tokio::test]
async fn test_empty_key_fails_before_any_call() {
    let adapter = MockAdapter::replying(DOCUMENT);
    let (orchestrator, factory) = orchestrator_with(&adapter);

    let result = orchestrator
        .run(&valid_request(), &ProviderConfig::new(Provider::DeepSeek, ""))
        .await;

    assert!(matches!(result, Err(GenerationError::MissingKey)));
    assert_eq!(adapter.calls(), 0, "no network call may be attempted");
    assert_eq!(factory.created(), 0);
    assert_eq!(orchestrator.state(), OrchestratorState::Idle);
}

#[tokio::test]
async fn test_empty_key_then_valid_call_succeeds() {
    let adapter = MockAdapter::replying(DOCUMENT);
    let (orchestrator, _factory) = orchestrator_with(&adapter);

    let first = orchestrator
        .run(&valid_request(), &ProviderConfig::new(Provider::Anthropic, ""))
        .await;
    assert!(matches!(first, Err(GenerationError::MissingKey)));
    assert_eq!(orchestrator.state(), OrchestratorState::Idle);

    let second = orchestrator.run(&valid_request(), &valid_config()).await;
    assert_eq!(second.unwrap().as_str(), DOCUMENT);
    assert_eq!(adapter.calls(), 1);
}

#[tokio::test]
async fn test_blank_topic_is_missing_topic() {
    let adapter = MockAdapter::replying(DOCUMENT);
    let (orchestrator, _factory) = orchestrator_with(&adapter);

    let result = orchestrator
        .run(&GenerationRequest::new("  \t ", Difficulty::Hard), &valid_config())
        .await;

    assert!(matches!(result, Err(GenerationError::MissingTopic)));
    assert_eq!(adapter.calls(), 0);
}

// =============================================================================
// Single flight
// =============================================================================

#[tokio::test]
async fn test_second_request_while_in_flight_is_rejected() {
    let gate = Gate::new();
    let adapter = MockAdapter::replying(DOCUMENT).with_gate(gate.clone());
    let (orchestrator, _factory) = orchestrator_with(&adapter);

    let first = {
        let orchestrator = orchestrator.clone();
        tokio::spawn(async move { orchestrator.run(&valid_request(), &valid_config()).await })
    };

    gate.wait_entered().await;
    assert_eq!(orchestrator.state(), OrchestratorState::InFlight);

    let second = orchestrator
        .run(&GenerationRequest::new("积分", Difficulty::Medium), &valid_config())
        .await;
    assert!(matches!(second, Err(GenerationError::AlreadyInFlight)));

    gate.release();
    let document = first.await.unwrap().unwrap();
    assert_eq!(document.as_str(), DOCUMENT);

    assert_eq!(adapter.calls(), 1, "the rejected request is not queued");
    assert_eq!(orchestrator.state(), OrchestratorState::Idle);
}

#[tokio::test]
async fn test_precondition_errors_take_priority_over_busy() {
    let gate = Gate::new();
    let adapter = MockAdapter::replying(DOCUMENT).with_gate(gate.clone());
    let (orchestrator, _factory) = orchestrator_with(&adapter);

    let first = {
        let orchestrator = orchestrator.clone();
        tokio::spawn(async move { orchestrator.run(&valid_request(), &valid_config()).await })
    };
    gate.wait_entered().await;

    let result = orchestrator
        .run(&valid_request(), &ProviderConfig::new(Provider::OpenAI, ""))
        .await;
    assert!(matches!(result, Err(GenerationError::MissingKey)));

    gate.release();
    first.await.unwrap().unwrap();
}

// =============================================================================
// Release on every exit path
// =============================================================================

#[tokio::test]
async fn test_provider_failure_returns_to_idle() {
    let adapter = MockAdapter::failing(401, "invalid key");
    let (orchestrator, _factory) = orchestrator_with(&adapter);

    let err = orchestrator
        .run(&valid_request(), &valid_config())
        .await
        .unwrap_err();

    match err {
        GenerationError::Provider(ProviderError::Api { status, message }) => {
            assert_eq!(status, 401);
            assert_eq!(message, "invalid key");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(orchestrator.state(), OrchestratorState::Idle);

    let retry = orchestrator.run(&valid_request(), &valid_config()).await;
    assert!(matches!(retry, Err(GenerationError::Provider(_))));
    assert_eq!(adapter.calls(), 2);
}

#[tokio::test]
async fn test_panicking_adapter_returns_to_idle() {
    let adapter = MockAdapter::panicking();
    let (orchestrator, _factory) = orchestrator_with(&adapter);

    let handle = {
        let orchestrator = orchestrator.clone();
        tokio::spawn(async move { orchestrator.run(&valid_request(), &valid_config()).await })
    };

    let join = handle.await;
    assert!(join.unwrap_err().is_panic());
    assert_eq!(orchestrator.state(), OrchestratorState::Idle);
}

#[tokio::test]
async fn test_dropped_request_returns_to_idle() {
    let gate = Gate::new();
    let adapter = MockAdapter::replying(DOCUMENT).with_gate(gate.clone());
    let (orchestrator, _factory) = orchestrator_with(&adapter);

    let request = valid_request();
    let config = valid_config();
    let timed_out =
        tokio::time::timeout(Duration::from_millis(50), orchestrator.run(&request, &config)).await;

    assert!(timed_out.is_err());
    assert_eq!(orchestrator.state(), OrchestratorState::Idle);
}

// =============================================================================
// Output
// =============================================================================

#[tokio::test]
async fn test_fenced_reply_is_sanitized() {
    let adapter = MockAdapter::replying(format!("```latex\n{DOCUMENT}\n```"));
    let (orchestrator, _factory) = orchestrator_with(&adapter);

    let document = orchestrator.run(&valid_request(), &valid_config()).await.unwrap();

    assert_eq!(document.as_str(), DOCUMENT);
}

#[tokio::test]
async fn test_fragment_reply_is_wrapped() {
    let adapter = MockAdapter::replying("\\begin{enumerate}\\item 1\\end{enumerate}");
    let (orchestrator, _factory) = orchestrator_with(&adapter);

    let document = orchestrator.run(&valid_request(), &valid_config()).await.unwrap();

    assert!(document.as_str().starts_with("\\documentclass"));
    assert!(document.as_str().ends_with("\\end{document}"));
}

#[tokio::test]
async fn test_prompt_carries_trimmed_topic() {
    let adapter = MockAdapter::replying(DOCUMENT);
    let (orchestrator, _factory) = orchestrator_with(&adapter);

    orchestrator
        .run(&GenerationRequest::new("  三角函数  ", Difficulty::Medium), &valid_config())
        .await
        .unwrap();

    let prompt = adapter.last_prompt().unwrap();
    assert!(prompt.contains("针对\"三角函数\"这个知识点"));
    assert!(prompt.contains("中等"));
}
