//! Trait definitions for external interactions
//!
//! These traits define the boundary between the explanation pipeline and
//! the generation backend. Implementations live in `cardia-llm`.

use crate::GenerationConfig;

/// Opaque text-generation capability
///
/// Implemented by the infrastructure layer (cardia-llm). Calls are
/// synchronous; callers in async code are expected to move them onto a
/// blocking thread and to serialize access to a shared instance.
pub trait TextGenerator {
    /// Error type for generation
    type Error;

    /// Generate a completion for `prompt` using the fixed sampling parameters
    fn generate(&self, prompt: &str, config: &GenerationConfig) -> Result<String, Self::Error>;

    /// Identity of the backend (model name), reported by the status query
    fn backend_name(&self) -> &str;
}
