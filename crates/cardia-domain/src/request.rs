//! Explain request as received from callers

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A request for a structured explanation
///
/// Either `prompt` carries a caller-constructed contextual prompt, or
/// `inputs` and `prediction` carry the raw material for a minimal one.
/// `inputs` and `prediction` are kept as loose JSON so that a malformed shape
/// degrades to "absent" instead of rejecting the request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// Pre-built contextual prompt (takes precedence when non-empty)
    #[serde(default)]
    pub prompt: Option<String>,

    /// Named patient parameters (age, sex, restingBP, cholesterol, ...)
    #[serde(default)]
    pub inputs: Option<Value>,

    /// Prediction payload; `risk` is a fraction in [0, 1]
    #[serde(default)]
    pub prediction: Option<Value>,

    /// Advisory output length hint, never forwarded to the backend
    ///
    /// Kept as loose JSON so an odd value never rejects the request.
    #[serde(default)]
    pub max_length: Option<Value>,

    /// Accepted for compatibility with older clients; recommendations are always produced
    #[serde(default)]
    pub include_recommendations: Option<bool>,
}

impl GenerationRequest {
    /// Request carrying a pre-built prompt
    pub fn with_prompt(prompt: impl Into<String>) -> Self {
        Self {
            prompt: Some(prompt.into()),
            ..Self::default()
        }
    }

    /// Request carrying raw inputs and a prediction
    pub fn from_inputs(inputs: Value, prediction: Value) -> Self {
        Self {
            inputs: Some(inputs),
            prediction: Some(prediction),
            ..Self::default()
        }
    }

    /// The pre-built prompt, if present and non-empty
    pub fn prebuilt_prompt(&self) -> Option<&str> {
        self.prompt.as_deref().filter(|p| !p.is_empty())
    }

    /// Risk fraction from the prediction, 0.0 when missing or not a number
    pub fn risk_fraction(&self) -> f64 {
        self.prediction
            .as_ref()
            .and_then(|p| p.get("risk"))
            .and_then(Value::as_f64)
            .unwrap_or(0.0)
    }

    /// Look up a named patient input
    ///
    /// Returns `None` when inputs are missing, not an object, or the value is null.
    pub fn input(&self, key: &str) -> Option<&Value> {
        self.inputs
            .as_ref()
            .and_then(|i| i.get(key))
            .filter(|v| !v.is_null())
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    proptest! {
        /// Property: any finite numeric risk is read back unchanged
        #[test]
        fn test_risk_fraction_reads_numbers(risk in 0.0f64..=1.0) {
            let request = GenerationRequest::from_inputs(json!({}), json!({"risk": risk}));
            prop_assert_eq!(request.risk_fraction(), risk);
        }

        /// Property: a non-empty prompt always wins, whatever the inputs hold
        #[test]
        fn test_prebuilt_prompt_preserved(prompt in ".+", junk in ".*") {
            let request = GenerationRequest {
                prompt: Some(prompt.clone()),
                inputs: Some(json!(junk)),
                prediction: Some(json!({"risk": junk})),
                ..GenerationRequest::default()
            };
            prop_assert_eq!(request.prebuilt_prompt(), Some(prompt.as_str()));
        }
    }
}
