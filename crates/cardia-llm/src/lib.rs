//! Cardia LLM Provider Layer
//!
//! Backend implementations of the `TextGenerator` trait from `cardia-domain`.
//!
//! # Providers
//!
//! - `MockProvider`: Deterministic mock for testing
//! - `OllamaProvider`: Local Ollama API integration
//!
//! # Examples
//!
//! ```
//! use cardia_llm::MockProvider;
//! use cardia_domain::{GenerationConfig, TextGenerator};
//!
//! let provider = MockProvider::new("Hello from LLM!");
//! let result = provider.generate("test prompt", &GenerationConfig::default()).unwrap();
//! assert_eq!(result, "Hello from LLM!");
//! ```

#![warn(missing_docs)]

pub mod ollama;

use cardia_domain::{GenerationConfig, TextGenerator};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use thiserror::Error;

pub use ollama::{
    OllamaProvider, DEFAULT_ENDPOINT, DEFAULT_NUM_CTX, DEFAULT_NUM_THREAD, DEFAULT_TIMEOUT_SECS,
};

/// Errors that can occur during LLM operations
#[derive(Error, Debug)]
pub enum LlmError {
    /// Network or API communication error
    #[error("Communication error: {0}")]
    Communication(String),

    /// Invalid response from LLM
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Model not available
    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    /// Generic error
    #[error("LLM error: {0}")]
    Other(String),
}

#[derive(Debug, Clone)]
enum MockReply {
    Text(String),
    Error(String),
}

/// Mock LLM provider for deterministic testing
///
/// Returns pre-configured responses without any network calls and counts
/// every invocation, so tests can prove whether the backend was reached.
///
/// # Examples
///
/// ```
/// use cardia_llm::MockProvider;
/// use cardia_domain::{GenerationConfig, TextGenerator};
///
/// let config = GenerationConfig::default();
///
/// // Simple fixed response
/// let provider = MockProvider::new("Fixed response");
/// assert_eq!(provider.generate("any prompt", &config).unwrap(), "Fixed response");
///
/// // Multiple responses
/// let mut provider = MockProvider::default();
/// provider.add_response("prompt1", "response1");
/// provider.add_response("prompt2", "response2");
/// assert_eq!(provider.generate("prompt1", &config).unwrap(), "response1");
/// assert_eq!(provider.generate("prompt2", &config).unwrap(), "response2");
/// ```
#[derive(Debug, Clone)]
pub struct MockProvider {
    name: String,
    default_reply: MockReply,
    responses: Arc<Mutex<HashMap<String, MockReply>>>,
    call_count: Arc<Mutex<usize>>,
    last_prompt: Arc<Mutex<Option<String>>>,
    last_config: Arc<Mutex<Option<GenerationConfig>>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl MockProvider {
    /// Create a new MockProvider with a fixed response for all prompts
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            name: "mock".to_string(),
            default_reply: MockReply::Text(response.into()),
            responses: Arc::new(Mutex::new(HashMap::new())),
            call_count: Arc::new(Mutex::new(0)),
            last_prompt: Arc::new(Mutex::new(None)),
            last_config: Arc::new(Mutex::new(None)),
        }
    }

    /// Create a MockProvider that fails every call with `message`
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            default_reply: MockReply::Error(message.into()),
            ..Self::new("")
        }
    }

    /// Set the backend name reported by `backend_name`
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Add a specific response for a given prompt
    pub fn add_response(&mut self, prompt: impl Into<String>, response: impl Into<String>) {
        lock(&self.responses).insert(prompt.into(), MockReply::Text(response.into()));
    }

    /// Configure to return an error for a specific prompt
    pub fn add_error(&mut self, prompt: impl Into<String>) {
        lock(&self.responses).insert(prompt.into(), MockReply::Error("Mock error".to_string()));
    }

    /// Get the number of times generate was called
    pub fn call_count(&self) -> usize {
        *lock(&self.call_count)
    }

    /// Reset the call count
    pub fn reset_call_count(&self) {
        *lock(&self.call_count) = 0;
    }

    /// The prompt passed to the most recent call
    pub fn last_prompt(&self) -> Option<String> {
        lock(&self.last_prompt).clone()
    }

    /// The generation config passed to the most recent call
    pub fn last_config(&self) -> Option<GenerationConfig> {
        lock(&self.last_config).clone()
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new("Default mock response")
    }
}

impl TextGenerator for MockProvider {
    type Error = LlmError;

    fn generate(&self, prompt: &str, config: &GenerationConfig) -> Result<String, Self::Error> {
        *lock(&self.call_count) += 1;
        *lock(&self.last_prompt) = Some(prompt.to_string());
        *lock(&self.last_config) = Some(config.clone());

        let reply = lock(&self.responses)
            .get(prompt)
            .cloned()
            .unwrap_or_else(|| self.default_reply.clone());

        match reply {
            MockReply::Text(text) => Ok(text),
            MockReply::Error(message) => Err(LlmError::Other(message)),
        }
    }

    fn backend_name(&self) -> &str {
        &self.name
    }
}
