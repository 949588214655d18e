//! Configuration for the Explainer

use crate::assembler::OutputBounds;
use crate::fallback::CannedContent;
use crate::rules::ExtractionRules;
use serde::{Deserialize, Serialize};

/// Default model identity reported with every response
pub const DEFAULT_MODEL_IDENTITY: &str = "deepseek-coder-1.3b-Q4_K_M";

/// Configuration for the Explainer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExplainerConfig {
    /// Model identity tag attached to responses
    pub model_identity: String,

    /// Line classification tables and thresholds
    pub rules: ExtractionRules,

    /// Fallback strings
    pub canned: CannedContent,

    /// Final output bounds
    pub bounds: OutputBounds,
}

impl Default for ExplainerConfig {
    fn default() -> Self {
        Self {
            model_identity: DEFAULT_MODEL_IDENTITY.to_string(),
            rules: ExtractionRules::default(),
            canned: CannedContent::default(),
            bounds: OutputBounds::default(),
        }
    }
}

impl ExplainerConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.model_identity.trim().is_empty() {
            return Err("model_identity must not be empty".to_string());
        }
        self.rules.validate()?;
        self.canned.validate()?;
        self.bounds.validate()?;
        Ok(())
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}
