//! Configuration file parsing for the server.
//!
//! Loads the bind address, backend connection settings, the caller-side
//! request timeout and the explainer tables from a TOML file.

use cardia_explainer::ExplainerConfig;
use cardia_llm::{DEFAULT_ENDPOINT, DEFAULT_NUM_CTX, DEFAULT_NUM_THREAD, DEFAULT_TIMEOUT_SECS};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Server configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    /// Failed to parse TOML
    #[error("Failed to parse config TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// A value was present but unusable
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Server configuration loaded from TOML
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address (e.g., "0.0.0.0")
    pub bind_address: String,

    /// Bind port (e.g., 8000)
    pub bind_port: u16,

    /// Caller-side limit on a whole explain request, in seconds
    pub request_timeout_secs: u64,

    /// Generation backend connection
    pub backend: BackendConfig,

    /// Extraction tables, canned content and bounds
    pub explainer: ExplainerConfig,
}

/// Generation backend configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Ollama endpoint (e.g., "http://localhost:11434")
    pub endpoint: String,

    /// Model name as known to the backend
    pub model: String,

    /// Context window size
    pub num_ctx: u32,

    /// Inference thread count
    pub num_thread: u32,

    /// HTTP timeout for a single generation call, in seconds
    pub timeout_secs: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: "deepseek-coder:1.3b".to_string(),
            num_ctx: DEFAULT_NUM_CTX,
            num_thread: DEFAULT_NUM_THREAD,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0".to_string(),
            bind_port: 8000,
            request_timeout_secs: 180,
            backend: BackendConfig::default(),
            explainer: ExplainerConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    /// Parse and validate configuration from a TOML string
    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        let config: ServerConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Default configuration used when no file is given
    pub fn default_config() -> Self {
        Self::default()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.backend.endpoint.trim().is_empty() {
            return Err(ConfigError::Invalid("backend.endpoint must not be empty".to_string()));
        }
        if self.backend.model.trim().is_empty() {
            return Err(ConfigError::Invalid("backend.model must not be empty".to_string()));
        }
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "request_timeout_secs must be greater than 0".to_string(),
            ));
        }
        self.explainer.validate().map_err(ConfigError::Invalid)
    }

    /// Get the full bind address (address:port)
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.bind_address, self.bind_port)
    }

    /// Caller-side request timeout
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
