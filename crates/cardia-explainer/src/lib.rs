//! Cardia Explainer
//!
//! Turns free text from a generative model into a structured clinical-style
//! explanation: a narrative, key factors, recommendations and a summary.
//!
//! # Architecture
//!
//! ```text
//! Request → PromptBuilder → GeneratorAdapter → StructuredExtractor → ResponseAssembler
//!                                                   ↳ FallbackSynthesizer
//! ```
//!
//! # Key Features
//!
//! - **Prompt selection**: caller-built prompts pass through untouched
//! - **Serialized backend access**: one generation call at a time
//! - **Heuristic extraction**: single-pass line scanner with a section cursor
//! - **Total output**: fallback tiers guarantee every field is populated
//! - **Bounded output**: fixed character and item limits
//!
//! # Example Usage
//!
//! ```no_run
//! use cardia_explainer::{Explainer, ExplainerConfig, GeneratorAdapter};
//! use cardia_domain::GenerationRequest;
//! use cardia_llm::OllamaProvider;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let adapter = GeneratorAdapter::initialize(
//!     OllamaProvider::connect("http://localhost:11434", "deepseek-coder:1.3b"),
//! )
//! .await;
//! let explainer = Explainer::new(adapter, ExplainerConfig::default());
//!
//! let request = GenerationRequest::with_prompt("Explain a 61.3% cardiovascular risk.");
//! let response = explainer.explain(&request).await?;
//!
//! println!("{}", response.explanation);
//! for factor in &response.key_factors {
//!     println!("- {}", factor);
//! }
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod adapter;
mod assembler;
mod config;
mod error;
mod explainer;
mod fallback;
mod parser;
mod prompt;
mod rules;
mod types;

#[cfg(test)]
mod tests;

pub use adapter::GeneratorAdapter;
pub use assembler::{truncate_chars, OutputBounds, ResponseAssembler};
pub use config::{ExplainerConfig, DEFAULT_MODEL_IDENTITY};
pub use error::ExplainError;
pub use explainer::Explainer;
pub use fallback::{
    CannedContent, FallbackSynthesizer, CANNED_FACTORS, CANNED_RECOMMENDATIONS, CANNED_SUMMARY,
    GENERIC_EXPLANATION,
};
pub use parser::StructuredExtractor;
pub use prompt::PromptBuilder;
pub use rules::{ExtractionRules, LineClass};
pub use types::BackendStatus;
