//! Error types for the explain pipeline

use thiserror::Error;

/// Errors surfaced by the explain operation
///
/// Extraction itself has no error variant: once raw text exists, a
/// structured result is always produced.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExplainError {
    /// Generation backend was never initialized
    #[error("Model not loaded")]
    BackendUnavailable,

    /// The backend call itself failed
    #[error("Failed to generate explanation: {0}")]
    GenerationFailure(String),
}

