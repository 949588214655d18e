//! Ollama Provider Implementation
//!
//! Runs the explanation model through a local Ollama server.
//!
//! # Features
//!
//! - Async HTTP communication with the Ollama API
//! - Every `GenerationConfig` field mapped onto Ollama sampling options
//! - Readiness check against the installed model list
//! - Timeout handling
//!
//! The provider never retries. A failed call is reported once and the caller
//! decides what to do with it.
//!
//! # Examples
//!
//! ```no_run
//! use cardia_llm::OllamaProvider;
//!
//! let provider = OllamaProvider::new("http://localhost:11434", "deepseek-coder:1.3b");
//! ```

use crate::LlmError;
use cardia_domain::{GenerationConfig, TextGenerator};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info};

/// Default Ollama API endpoint
pub const DEFAULT_ENDPOINT: &str = "http://localhost:11434";

/// Default timeout for generation requests (seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Default context window, in tokens
pub const DEFAULT_NUM_CTX: u32 = 2048;

/// Default number of inference threads
pub const DEFAULT_NUM_THREAD: u32 = 4;

/// Ollama API provider for local LLM inference
pub struct OllamaProvider {
    endpoint: String,
    model: String,
    client: reqwest::Client,
    num_ctx: u32,
    num_thread: u32,
}

/// Request body for Ollama generate API
#[derive(Serialize)]
struct OllamaGenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    options: OllamaOptions<'a>,
}

/// Sampling and runtime options for one generate call
#[derive(Serialize)]
struct OllamaOptions<'a> {
    num_predict: u32,
    temperature: f32,
    top_p: f32,
    top_k: u32,
    repeat_penalty: f32,
    stop: &'a [String],
    num_ctx: u32,
    num_thread: u32,
}

/// Response from Ollama generate API
#[derive(Deserialize)]
struct OllamaGenerateResponse {
    response: String,
    #[allow(dead_code)]
    done: bool,
}

/// Response from Ollama tags API
#[derive(Deserialize)]
struct OllamaTagsResponse {
    #[serde(default)]
    models: Vec<OllamaModelEntry>,
}

#[derive(Deserialize)]
struct OllamaModelEntry {
    name: String,
}

fn build_client(timeout_secs: u64) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .unwrap_or_else(|_| reqwest::Client::new())
}

impl OllamaProvider {
    /// Create a new Ollama provider
    ///
    /// # Parameters
    ///
    /// - `endpoint`: Ollama API endpoint (e.g., "http://localhost:11434")
    /// - `model`: Model to use (e.g., "deepseek-coder:1.3b")
    pub fn new(endpoint: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            model: model.into(),
            client: build_client(DEFAULT_TIMEOUT_SECS),
            num_ctx: DEFAULT_NUM_CTX,
            num_thread: DEFAULT_NUM_THREAD,
        }
    }

    /// Create a new Ollama provider on the default local endpoint
    pub fn default_endpoint(model: impl Into<String>) -> Self {
        Self::new(DEFAULT_ENDPOINT, model)
    }

    /// Set the HTTP timeout for every call
    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.client = build_client(timeout_secs);
        self
    }

    /// Set the model context window
    pub fn with_context_window(mut self, num_ctx: u32) -> Self {
        self.num_ctx = num_ctx;
        self
    }

    /// Set the number of inference threads
    pub fn with_threads(mut self, num_thread: u32) -> Self {
        self.num_thread = num_thread;
        self
    }

    /// Configured endpoint
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Configured model name
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Create a provider and confirm the model is installed
    ///
    /// This is the model-loading step: it succeeds only when Ollama is
    /// reachable and lists the requested model.
    pub async fn connect(
        endpoint: impl Into<String>,
        model: impl Into<String>,
    ) -> Result<Self, LlmError> {
        Self::new(endpoint, model).ready().await
    }

    /// Consume the provider, returning it only if its model is available
    pub async fn ready(self) -> Result<Self, LlmError> {
        info!("Probing Ollama at {} for model '{}'", self.endpoint, self.model);
        if self.is_model_available().await? {
            info!("Model '{}' is available", self.model);
            Ok(self)
        } else {
            Err(LlmError::ModelNotAvailable(self.model.clone()))
        }
    }

    /// Whether the configured model appears in Ollama's model list
    pub async fn is_model_available(&self) -> Result<bool, LlmError> {
        let models = self.list_models().await?;
        Ok(models.iter().any(|m| m.starts_with(&self.model)))
    }

    /// List the models installed in the Ollama instance
    pub async fn list_models(&self) -> Result<Vec<String>, LlmError> {
        let url = format!("{}/api/tags", self.endpoint);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| LlmError::Communication(format!("Request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::Communication(format!("HTTP {}: {}", status, body)));
        }

        let tags: OllamaTagsResponse = response
            .json()
            .await
            .map_err(|e| LlmError::InvalidResponse(format!("Failed to parse model list: {}", e)))?;

        Ok(tags.models.into_iter().map(|m| m.name).collect())
    }

    fn request_body<'a>(
        &'a self,
        prompt: &'a str,
        config: &'a GenerationConfig,
    ) -> OllamaGenerateRequest<'a> {
        OllamaGenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
            options: OllamaOptions {
                num_predict: config.max_tokens,
                temperature: config.temperature,
                top_p: config.top_p,
                top_k: config.top_k,
                repeat_penalty: config.repeat_penalty,
                stop: &config.stop,
                num_ctx: self.num_ctx,
                num_thread: self.num_thread,
            },
        }
    }

    /// Generate text using the Ollama API
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - Ollama is not running
    /// - Model is not available
    /// - Network communication fails
    /// - Response format is invalid
    pub async fn generate_async(
        &self,
        prompt: &str,
        config: &GenerationConfig,
    ) -> Result<String, LlmError> {
        let url = format!("{}/api/generate", self.endpoint);
        let body = self.request_body(prompt, config);

        debug!("Sending {} char prompt to {}", prompt.len(), url);

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmError::Communication(format!("Request failed: {}", e)))?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(LlmError::ModelNotAvailable(self.model.clone()));
        }
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(LlmError::Communication(format!(
                "HTTP {}: {}",
                status, error_text
            )));
        }

        let generated: OllamaGenerateResponse = response
            .json()
            .await
            .map_err(|e| LlmError::InvalidResponse(format!("Failed to parse response: {}", e)))?;

        Ok(generated.response)
    }
}

impl TextGenerator for OllamaProvider {
    type Error = LlmError;

    /// Blocking wrapper around `generate_async`
    ///
    /// Must be called from a blocking thread (for example inside
    /// `tokio::task::spawn_blocking`) or from outside any runtime.
    fn generate(&self, prompt: &str, config: &GenerationConfig) -> Result<String, Self::Error> {
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => handle.block_on(self.generate_async(prompt, config)),
            Err(_) => tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .map_err(|e| LlmError::Other(format!("Failed to start runtime: {}", e)))?
                .block_on(self.generate_async(prompt, config)),
        }
    }

    fn backend_name(&self) -> &str {
        &self.model
    }
}
