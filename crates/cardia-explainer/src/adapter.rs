//! Serialized access to the generation backend
//!
//! One adapter owns the single backend instance. Every call takes the same
//! lock, and the lock is held by the blocking task itself, so a caller that
//! gives up early cannot let a second call overlap the first.

use crate::error::ExplainError;
use crate::types::BackendStatus;
use cardia_domain::{GenerationConfig, TextGenerator};
use std::fmt::Display;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{error, info};

/// Owner of the generation backend
pub struct GeneratorAdapter<G> {
    backend: Option<Arc<G>>,
    gate: Arc<Mutex<()>>,
    config: GenerationConfig,
}

impl<G> GeneratorAdapter<G>
where
    G: TextGenerator + Send + Sync + 'static,
    G::Error: Display,
{
    /// Adapter with no backend; every call fails with `BackendUnavailable`
    pub fn uninitialized() -> Self {
        Self {
            backend: None,
            gate: Arc::new(Mutex::new(())),
            config: GenerationConfig::default(),
        }
    }

    /// Adapter owning an already-initialized backend
    pub fn with_backend(backend: G) -> Self {
        Self {
            backend: Some(Arc::new(backend)),
            ..Self::uninitialized()
        }
    }

    /// Run a backend loader once
    ///
    /// A failed load is logged and leaves the adapter not ready.
    pub async fn initialize<F, E>(loader: F) -> Self
    where
        F: Future<Output = Result<G, E>>,
        E: Display,
    {
        match loader.await {
            Ok(backend) => {
                info!("Generation backend '{}' initialized", backend.backend_name());
                Self::with_backend(backend)
            }
            Err(e) => {
                error!("Failed to initialize generation backend: {}", e);
                Self::uninitialized()
            }
        }
    }

    /// Whether a backend is present
    pub fn is_ready(&self) -> bool {
        self.backend.is_some()
    }

    /// Readiness and backend identity
    pub fn status(&self) -> BackendStatus {
        match &self.backend {
            Some(backend) => BackendStatus::ready(backend.backend_name()),
            None => BackendStatus::not_ready(),
        }
    }

    /// Generate raw text for `prompt`
    ///
    /// No retries: a backend error is returned as `GenerationFailure`.
    pub async fn generate(&self, prompt: &str) -> Result<String, ExplainError> {
        let backend = self
            .backend
            .as_ref()
            .map(Arc::clone)
            .ok_or(ExplainError::BackendUnavailable)?;

        let guard = Arc::clone(&self.gate).lock_owned().await;
        let prompt = prompt.to_string();
        let config = self.config.clone();

        tokio::task::spawn_blocking(move || {
            let _guard = guard;
            backend
                .generate(&prompt, &config)
                .map_err(|e| ExplainError::GenerationFailure(e.to_string()))
        })
        .await
        .map_err(|e| ExplainError::GenerationFailure(format!("Task join error: {}", e)))?
    }
}
