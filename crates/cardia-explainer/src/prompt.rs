//! Prompt selection for the explanation model

use cardia_domain::GenerationRequest;
use serde_json::Value;

/// Placeholder rendered for a missing patient input
const ABSENT: &str = "absent";

/// Builds the prompt sent to the generation backend
///
/// A caller-supplied prompt is used verbatim. Otherwise a minimal prompt is
/// rendered from the patient inputs and the risk prediction.
#[derive(Debug, Clone)]
pub struct PromptBuilder {
    prebuilt: Option<String>,
    risk_percent: f64,
    age: String,
    resting_bp: String,
}

impl PromptBuilder {
    /// Create a builder from a request
    pub fn from_request(request: &GenerationRequest) -> Self {
        Self {
            prebuilt: request.prebuilt_prompt().map(str::to_string),
            risk_percent: request.risk_fraction() * 100.0,
            age: render_input(request.input("age")),
            resting_bp: render_input(request.input("restingBP")),
        }
    }

    /// Whether the caller's own prompt will be used
    pub fn uses_prebuilt(&self) -> bool {
        self.prebuilt.is_some()
    }

    /// Build the prompt
    pub fn build(&self) -> String {
        match &self.prebuilt {
            Some(prompt) => prompt.clone(),
            None => format!(
                "Explain heart risk of {:.1}% for patient age {} with BP {}.",
                self.risk_percent, self.age, self.resting_bp
            ),
        }
    }
}

/// Strings render bare, other JSON values as JSON text
fn render_input(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
        None => ABSENT.to_string(),
    }
}
