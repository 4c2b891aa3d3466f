//! LLM completion boundary.
//!
//! The insight service only needs "prompt in, text out"; everything about
//! the provider lives behind [`CompletionService`].

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use log::debug;
use reqwest::Client as HttpClient;
use rig::{client::CompletionClient, completion::Prompt, providers::openai};

use crate::error::AiError;

pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

// ============================================================================
// Completion Trait
// ============================================================================

/// A single-turn completion request.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub system: String,
    pub prompt: String,
    pub temperature: f64,
    pub max_tokens: u64,
}

#[async_trait]
pub trait CompletionService: Send + Sync {
    /// Returns the model's text reply.
    async fn complete(&self, request: &CompletionRequest) -> Result<String, AiError>;
}

// ============================================================================
// OpenAI Implementation
// ============================================================================

pub struct OpenAiCompletionService {
    api_key: String,
    model: String,
}

impl OpenAiCompletionService {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: model.into(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl CompletionService for OpenAiCompletionService {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, AiError> {
        if self.api_key.trim().is_empty() {
            return Err(AiError::MissingApiKey("openai".to_string()));
        }

        debug!("Requesting completion from openai model {}", self.model);

        let client: openai::Client<HttpClient> =
            openai::Client::new(&self.api_key).map_err(|e| AiError::Provider(e.to_string()))?;
        client
            .agent(&self.model)
            .preamble(&request.system)
            .temperature(request.temperature)
            .max_tokens(request.max_tokens)
            .build()
            .prompt(&request.prompt)
            .await
            .map_err(|e| AiError::Provider(e.to_string()))
    }
}

// ============================================================================
// Fake Provider for Testing
// ============================================================================

/// Deterministic completion service that counts its calls.
pub struct FakeCompletionService {
    reply: String,
    fail: bool,
    calls: AtomicUsize,
    last_request: Mutex<Option<CompletionRequest>>,
}

impl FakeCompletionService {
    /// Always answers with `reply`.
    pub fn with_reply(reply: &str) -> Self {
        Self {
            reply: reply.to_string(),
            fail: false,
            calls: AtomicUsize::new(0),
            last_request: Mutex::new(None),
        }
    }

    /// Always fails with a provider error.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::with_reply("")
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> Option<CompletionRequest> {
        self.last_request
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .clone()
    }
}

#[async_trait]
impl CompletionService for FakeCompletionService {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, AiError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_request.lock().unwrap_or_else(|p| p.into_inner()) = Some(request.clone());
        if self.fail {
            Err(AiError::provider("fake provider failure"))
        } else {
            Ok(self.reply.clone())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> CompletionRequest {
        CompletionRequest {
            system: "system".to_string(),
            prompt: "prompt".to_string(),
            temperature: 0.3,
            max_tokens: 800,
        }
    }

    #[tokio::test]
    async fn test_openai_without_key_fails_before_network() {
        let service = OpenAiCompletionService::new("", DEFAULT_MODEL);
        let err = service.complete(&request()).await.unwrap_err();
        assert!(matches!(err, AiError::MissingApiKey(_)));
    }

    #[tokio::test]
    async fn test_fake_counts_calls() {
        let fake = FakeCompletionService::with_reply("ok");
        assert_eq!(fake.complete(&request()).await.unwrap(), "ok");
        assert_eq!(fake.complete(&request()).await.unwrap(), "ok");
        assert_eq!(fake.calls(), 2);
        assert_eq!(fake.last_request(), Some(request()));
    }

    #[tokio::test]
    async fn test_fake_failing() {
        let fake = FakeCompletionService::failing();
        assert!(fake.complete(&request()).await.is_err());
        assert_eq!(fake.calls(), 1);
    }
}
