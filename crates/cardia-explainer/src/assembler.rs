//! Final bounds and response metadata

use cardia_domain::{ExplainResponse, StructuredExplanation};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Hard limits applied to the extractor's output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputBounds {
    /// Maximum explanation length, in characters
    pub explanation_chars: usize,

    /// Maximum number of key factors
    pub max_key_factors: usize,

    /// Maximum number of recommendations
    pub max_recommendations: usize,

    /// Maximum summary length, in characters
    pub summary_chars: usize,
}

impl Default for OutputBounds {
    fn default() -> Self {
        Self {
            explanation_chars: 500,
            max_key_factors: 3,
            max_recommendations: 3,
            summary_chars: 200,
        }
    }
}

impl OutputBounds {
    /// Validate the bounds
    pub fn validate(&self) -> Result<(), String> {
        if self.explanation_chars == 0 || self.summary_chars == 0 {
            return Err("text bounds must be greater than 0".to_string());
        }
        if self.max_key_factors == 0 || self.max_recommendations == 0 {
            return Err("list bounds must be greater than 0".to_string());
        }
        Ok(())
    }

    /// Apply the bounds
    ///
    /// Text is trimmed, cut at a character boundary, then trimmed again at
    /// the end, so applying the bounds twice gives the same result.
    pub fn apply(&self, structured: StructuredExplanation) -> StructuredExplanation {
        let StructuredExplanation {
            explanation,
            mut key_factors,
            mut recommendations,
            summary,
        } = structured;

        key_factors.truncate(self.max_key_factors);
        recommendations.truncate(self.max_recommendations);

        StructuredExplanation {
            explanation: bound_text(&explanation, self.explanation_chars),
            key_factors,
            recommendations,
            summary: bound_text(&summary, self.summary_chars),
        }
    }
}

/// Prefix of `text` holding at most `max_chars` characters
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

fn bound_text(text: &str, max_chars: usize) -> String {
    truncate_chars(text.trim(), max_chars).trim_end().to_string()
}

/// Builds the final response from an extracted explanation
#[derive(Debug, Clone)]
pub struct ResponseAssembler {
    bounds: OutputBounds,
    model_identity: String,
}

impl ResponseAssembler {
    /// Create an assembler
    pub fn new(bounds: OutputBounds, model_identity: impl Into<String>) -> Self {
        Self {
            bounds,
            model_identity: model_identity.into(),
        }
    }

    /// Model identity attached to every response
    pub fn model_identity(&self) -> &str {
        &self.model_identity
    }

    /// Bound the explanation and attach timing and model identity
    pub fn assemble(&self, structured: StructuredExplanation, elapsed: Duration) -> ExplainResponse {
        let bounded = self.bounds.apply(structured);
        ExplainResponse {
            explanation: bounded.explanation,
            key_factors: bounded.key_factors,
            recommendations: bounded.recommendations,
            summary: bounded.summary,
            processing_time: elapsed.as_secs_f64(),
            model_used: self.model_identity.clone(),
        }
    }
}
