use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use litdaily_utils::types::ConfigSource;

/// Default chat-completion endpoint (SiliconFlow, OpenAI-compatible)
pub const DEFAULT_BASE_URL: &str = "https://api.siliconflow.cn/v1/chat/completions";

/// Environment variable holding the API key unless `[ai] api_key_env` says otherwise
pub const DEFAULT_API_KEY_ENV: &str = "SILICONFLOW_API_KEY";

/// Environment variable supplying the model identifier
pub const MODEL_ID_ENV: &str = "SILICONFLOW_MODEL_ID";

/// Default request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Default database file, relative to the working directory
pub const DEFAULT_STORE_PATH: &str = "litdaily.db";

/// Settings for the AI completion endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiConfig {
    /// Full URL of the chat-completions endpoint
    pub base_url: String,
    /// Model identifier; usually supplied by `SILICONFLOW_MODEL_ID`
    pub model: Option<String>,
    /// Name of the environment variable holding the API key
    pub api_key_env: String,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
    pub max_tokens: u32,
    pub temperature: f32,
    pub top_p: f32,
    pub top_k: u32,
    pub frequency_penalty: f32,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            model: None,
            api_key_env: DEFAULT_API_KEY_ENV.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            max_tokens: 1000,
            temperature: 0.7,
            top_p: 0.7,
            top_k: 50,
            frequency_penalty: 0.5,
        }
    }
}

impl AiConfig {
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// How the wait between attempts grows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackoffStrategy {
    /// Same delay before every retry
    #[default]
    Fixed,
    /// Delay doubles per retry, capped by `max_backoff_ms`
    Exponential,
}

impl std::fmt::Display for BackoffStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Fixed => write!(f, "fixed"),
            Self::Exponential => write!(f, "exponential"),
        }
    }
}

/// Bounded retry settings for generation requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Total attempts per prompt, including the first one
    pub max_attempts: u32,
    pub backoff_ms: u64,
    pub strategy: BackoffStrategy,
    pub max_backoff_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 2,
            backoff_ms: 1000,
            strategy: BackoffStrategy::Fixed,
            max_backoff_ms: 8000,
        }
    }
}

/// Content store location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    pub path: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_STORE_PATH),
        }
    }
}

/// Effective configuration for litdaily operations.
///
/// Built by [`Config::discover()`] with precedence
/// CLI arguments > environment > config file > built-in defaults.
/// Each key tracks where its value came from, for `litdaily config`.
///
/// ```rust,no_run
/// use litdaily_config::{CliArgs, Config};
///
/// let config = Config::discover(&CliArgs::default())?;
/// println!("endpoint: {}", config.ai.base_url);
/// # Ok::<(), litdaily_utils::ConfigError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub ai: AiConfig,
    pub retry: RetryConfig,
    pub store: StoreConfig,
    pub verbose: bool,
    /// Config file that was loaded, if any
    pub config_file: Option<PathBuf>,
    pub source_attribution: HashMap<String, ConfigSource>,
}

impl Config {
    /// Source of a configuration key, `Default` when untracked
    #[must_use]
    pub fn source_of(&self, key: &str) -> ConfigSource {
        self.source_attribution
            .get(key)
            .copied()
            .unwrap_or(ConfigSource::Default)
    }
}

/// `[ai]` section as written in the file; every key optional
#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct AiFileSection {
    pub base_url: Option<String>,
    pub model: Option<String>,
    pub api_key_env: Option<String>,
    pub timeout_secs: Option<u64>,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
    pub top_p: Option<f32>,
    pub top_k: Option<u32>,
    pub frequency_penalty: Option<f32>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct RetryFileSection {
    pub max_attempts: Option<u32>,
    pub backoff_ms: Option<u64>,
    pub strategy: Option<BackoffStrategy>,
    pub max_backoff_ms: Option<u64>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct StoreFileSection {
    pub path: Option<PathBuf>,
}

/// TOML configuration file structure
#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct TomlConfig {
    pub ai: Option<AiFileSection>,
    pub retry: Option<RetryFileSection>,
    pub store: Option<StoreFileSection>,
}
