//! Configuration loading, validation, and management for the examiner.
//!
//! Loads configuration from `~/.examiner/config.toml` (or an explicit path)
//! with environment variable overrides. Validates all settings at startup.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// The root configuration structure.
///
/// Maps directly to `~/.examiner/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Where the knowledge file lives
    #[serde(default)]
    pub knowledge: KnowledgeConfig,

    /// Context selection caps
    #[serde(default)]
    pub selection: SelectionConfig,

    /// Generation back-ends
    #[serde(default)]
    pub providers: ProvidersConfig,

    /// HTTP front door
    #[serde(default)]
    pub gateway: GatewayConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnowledgeConfig {
    #[serde(default = "default_knowledge_path")]
    pub path: PathBuf,
}

fn default_knowledge_path() -> PathBuf {
    PathBuf::from("data").join("history_data.json")
}

impl Default for KnowledgeConfig {
    fn default() -> Self {
        Self {
            path: default_knowledge_path(),
        }
    }
}

/// Per-region caps applied while assembling the context block.
///
/// Zero is allowed and disables the corresponding region portion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectionConfig {
    #[serde(default = "default_max_qa_pairs")]
    pub max_qa_pairs: usize,

    #[serde(default = "default_raw_text_chars")]
    pub raw_text_chars: usize,

    #[serde(default = "default_max_archive_items")]
    pub max_archive_items: usize,

    #[serde(default = "default_max_marking_examples")]
    pub max_marking_examples: usize,

    #[serde(default = "default_max_marking_points")]
    pub max_marking_points: usize,
}

fn default_max_qa_pairs() -> usize {
    3
}
fn default_raw_text_chars() -> usize {
    1000
}
fn default_max_archive_items() -> usize {
    2
}
fn default_max_marking_examples() -> usize {
    2
}
fn default_max_marking_points() -> usize {
    5
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            max_qa_pairs: default_max_qa_pairs(),
            raw_text_chars: default_raw_text_chars(),
            max_archive_items: default_max_archive_items(),
            max_marking_examples: default_max_marking_examples(),
            max_marking_points: default_max_marking_points(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProvidersConfig {
    /// Chat-completion back-end, tried first
    #[serde(default)]
    pub primary: PrimaryProviderConfig,

    /// Text-generation back-end, tried when the primary fails
    #[serde(default)]
    pub secondary: SecondaryProviderConfig,
}

impl ProvidersConfig {
    /// A provider counts as configured once it has a non-empty API key.
    pub fn primary_configured(&self) -> bool {
        has_key(&self.primary.api_key)
    }

    pub fn secondary_configured(&self) -> bool {
        has_key(&self.secondary.api_key)
    }
}

fn has_key(key: &Option<String>) -> bool {
    key.as_deref().is_some_and(|k| !k.trim().is_empty())
}

#[derive(Clone, Serialize, Deserialize)]
pub struct PrimaryProviderConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// OpenAI-compatible base URL
    #[serde(default = "default_primary_url")]
    pub api_url: String,

    #[serde(default = "default_primary_model")]
    pub model: String,

    #[serde(default = "default_temperature")]
    pub temperature: f32,

    #[serde(default = "default_primary_max_tokens")]
    pub max_tokens: u32,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_primary_url() -> String {
    "https://api.groq.com/openai/v1".into()
}
fn default_primary_model() -> String {
    "llama-3.3-70b-versatile".into()
}
fn default_temperature() -> f32 {
    0.3
}
fn default_primary_max_tokens() -> u32 {
    2500
}
fn default_timeout_secs() -> u64 {
    60
}

impl Default for PrimaryProviderConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_url: default_primary_url(),
            model: default_primary_model(),
            temperature: default_temperature(),
            max_tokens: default_primary_max_tokens(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Clone, Serialize, Deserialize)]
pub struct SecondaryProviderConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Base URL; the model id is appended as a path segment
    #[serde(default = "default_secondary_url")]
    pub api_url: String,

    #[serde(default = "default_secondary_model")]
    pub model: String,

    #[serde(default = "default_secondary_max_new_tokens")]
    pub max_new_tokens: u32,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_secondary_url() -> String {
    "https://router.huggingface.co/hf-inference/models".into()
}
fn default_secondary_model() -> String {
    "Qwen/Qwen2.5-72B-Instruct".into()
}
fn default_secondary_max_new_tokens() -> u32 {
    2000
}

impl Default for SecondaryProviderConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_url: default_secondary_url(),
            model: default_secondary_model(),
            max_new_tokens: default_secondary_max_new_tokens(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Redact a secret for Debug output.
fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

impl std::fmt::Debug for PrimaryProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrimaryProviderConfig")
            .field("api_key", &redact(&self.api_key))
            .field("api_url", &self.api_url)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl std::fmt::Debug for SecondaryProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecondaryProviderConfig")
            .field("api_key", &redact(&self.api_key))
            .field("api_url", &self.api_url)
            .field("model", &self.model)
            .field("max_new_tokens", &self.max_new_tokens)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_host")]
    pub host: String,
}

fn default_port() -> u16 {
    8000
}
fn default_host() -> String {
    "0.0.0.0".into()
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            host: default_host(),
        }
    }
}

impl AppConfig {
    /// Load configuration from `path`, or the default location when `None`.
    ///
    /// Environment variables override file values:
    /// - `GROQ_API_KEY` (primary provider)
    /// - `HF_API_KEY` (secondary provider)
    /// - `EXAMINER_DATA_PATH`
    /// - `EXAMINER_HOST` / `EXAMINER_PORT`
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config_path = match path {
            Some(p) => p.to_path_buf(),
            None => Self::config_dir().join("config.toml"),
        };
        let mut config = Self::load_from(&config_path)?;
        config.apply_env_overrides(|name| std::env::var(name).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Apply overrides from an environment lookup (highest priority).
    pub fn apply_env_overrides(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(key) = lookup("GROQ_API_KEY") {
            self.providers.primary.api_key = Some(key);
        }
        if let Some(key) = lookup("HF_API_KEY") {
            self.providers.secondary.api_key = Some(key);
        }
        if let Some(path) = lookup("EXAMINER_DATA_PATH") {
            self.knowledge.path = PathBuf::from(path);
        }
        if let Some(host) = lookup("EXAMINER_HOST") {
            self.gateway.host = host;
        }
        if let Some(port) = lookup("EXAMINER_PORT") {
            self.gateway.port = port.parse().map_err(|_| {
                ConfigError::ValidationError(format!("EXAMINER_PORT is not a port: {port}"))
            })?;
        }
        Ok(())
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".examiner")
    }

    /// Validate the configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        let primary = &self.providers.primary;
        if !(0.0..=2.0).contains(&primary.temperature) {
            return Err(ConfigError::ValidationError(
                "providers.primary.temperature must be between 0.0 and 2.0".into(),
            ));
        }

        if primary.max_tokens == 0 || self.providers.secondary.max_new_tokens == 0 {
            return Err(ConfigError::ValidationError(
                "provider token ceilings must be > 0".into(),
            ));
        }

        if primary.timeout_secs == 0 || self.providers.secondary.timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "provider timeouts must be > 0 seconds".into(),
            ));
        }

        Ok(())
    }
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}
