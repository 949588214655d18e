//! Cardia Domain Layer
//!
//! Core value types and trait seams for the Cardia explanation service.
//! Nothing in this crate performs I/O; backends and the extraction pipeline
//! live in other crates and depend on the definitions here.
//!
//! ## Key Concepts
//!
//! - **GenerationRequest**: a caller's ask, either a pre-built prompt or raw
//!   patient inputs plus a risk prediction
//! - **GenerationConfig**: the fixed sampling parameters sent to the backend
//! - **Section**: the extractor's cursor over raw generated text
//! - **StructuredExplanation**: explanation, key factors, recommendations, summary
//! - **ExplainResponse**: the structured explanation plus timing and model identity
//!
//! ## Architecture
//!
//! - Pure data and trait definitions only
//! - Depends only on serde and serde_json, because these types are the wire contract
//! - Backend implementations live in `cardia-llm`

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod explanation;
pub mod generation;
pub mod request;
pub mod section;
pub mod traits;

// Re-exports for convenience
pub use explanation::{ExplainResponse, StructuredExplanation};
pub use generation::GenerationConfig;
pub use request::GenerationRequest;
pub use section::Section;
pub use traits::TextGenerator;
