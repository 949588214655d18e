//! Sampling parameters passed to the generation backend

use serde::{Deserialize, Serialize};

/// Maximum tokens the backend may produce
pub const DEFAULT_MAX_TOKENS: u32 = 450;

/// Sampling temperature
pub const DEFAULT_TEMPERATURE: f32 = 0.8;

/// Nucleus-sampling threshold
pub const DEFAULT_TOP_P: f32 = 0.92;

/// Top-k cutoff
pub const DEFAULT_TOP_K: u32 = 50;

/// Repetition penalty
pub const DEFAULT_REPEAT_PENALTY: f32 = 1.15;

/// Stop sequences, in the order the backend receives them
pub const DEFAULT_STOP_SEQUENCES: &[&str] = &[
    "PATIENT DATA:",
    "CONTEXT:",
    "YOUR ROLE:",
    "━━━",
    "###",
    "\n\n\n\n",
    "Note:",
    "Disclaimer:",
];

/// Fixed generation parameters
///
/// These are constants of the system rather than per-request knobs. A
/// request's length hint is advisory and never changes `max_tokens`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Maximum output tokens
    pub max_tokens: u32,

    /// Sampling temperature
    pub temperature: f32,

    /// Nucleus-sampling threshold
    pub top_p: f32,

    /// Top-k cutoff
    pub top_k: u32,

    /// Repetition penalty
    pub repeat_penalty: f32,

    /// Ordered stop sequences
    pub stop: Vec<String>,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
            top_p: DEFAULT_TOP_P,
            top_k: DEFAULT_TOP_K,
            repeat_penalty: DEFAULT_REPEAT_PENALTY,
            stop: DEFAULT_STOP_SEQUENCES.iter().map(|s| s.to_string()).collect(),
        }
    }
}
