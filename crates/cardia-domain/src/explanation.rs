//! Structured explanation produced from raw generated text

use serde::{Deserialize, Serialize};

/// The four structured fields extracted from generated text
///
/// The extractor always produces every field populated; the final
/// character and item bounds are applied by the assembler.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuredExplanation {
    /// Narrative explanation
    pub explanation: String,

    /// Key factors, in scan order
    pub key_factors: Vec<String>,

    /// Recommendations, in scan order
    pub recommendations: Vec<String>,

    /// One-line summary
    pub summary: String,
}

impl StructuredExplanation {
    /// Whether every field carries content
    pub fn is_complete(&self) -> bool {
        !self.explanation.trim().is_empty()
            && !self.summary.trim().is_empty()
            && !self.key_factors.is_empty()
            && !self.recommendations.is_empty()
    }
}

/// Final result of the explain operation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExplainResponse {
    /// Narrative explanation (at most 500 characters)
    pub explanation: String,

    /// Key factors (at most 3)
    pub key_factors: Vec<String>,

    /// Recommendations (at most 3)
    pub recommendations: Vec<String>,

    /// One-line summary (at most 200 characters)
    pub summary: String,

    /// Wall-clock seconds spent producing the explanation
    pub processing_time: f64,

    /// Model identity tag
    pub model_used: String,
}

impl ExplainResponse {
    /// The structured part of the response
    pub fn structured(&self) -> StructuredExplanation {
        StructuredExplanation {
            explanation: self.explanation.clone(),
            key_factors: self.key_factors.clone(),
            recommendations: self.recommendations.clone(),
            summary: self.summary.clone(),
        }
    }
}
