//! Status types reported by the pipeline

use serde::{Deserialize, Serialize};

/// Readiness of the generation backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendStatus {
    /// Whether a backend has been initialized
    pub ready: bool,

    /// Backend identity when ready
    pub backend: Option<String>,
}

impl BackendStatus {
    /// Status of an adapter with no backend
    pub fn not_ready() -> Self {
        Self {
            ready: false,
            backend: None,
        }
    }

    /// Status of an adapter holding `backend`
    pub fn ready(backend: impl Into<String>) -> Self {
        Self {
            ready: true,
            backend: Some(backend.into()),
        }
    }

    /// Human-readable status label
    pub fn label(&self) -> &'static str {
        if self.ready {
            "healthy"
        } else {
            "not loaded"
        }
    }
}
