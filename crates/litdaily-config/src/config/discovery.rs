use anyhow::{Context, Result};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use litdaily_utils::ConfigError;
use litdaily_utils::types::ConfigSource;

use super::{
    AiConfig, CliArgs, Config, MODEL_ID_ENV, RetryConfig, StoreConfig, TomlConfig,
};

/// Directory searched for upward from the working directory
pub const CONFIG_DIR: &str = ".litdaily";

/// File name inside [`CONFIG_DIR`]
pub const CONFIG_FILE: &str = "config.toml";

impl Config {
    /// Discover and load configuration with precedence: CLI > env > file > defaults
    ///
    /// Uses the current working directory for config file discovery when no
    /// explicit path is provided in `cli_args`.
    pub fn discover(cli_args: &CliArgs) -> Result<Self, ConfigError> {
        let start_dir = std::env::current_dir().map_err(|e| ConfigError::InvalidFile(format!(
            "Failed to get current directory: {e}"
        )))?;
        Self::discover_from(&start_dir, cli_args)
    }

    /// Discover configuration starting from a specific directory, reading the
    /// process environment.
    pub fn discover_from(start_dir: &Path, cli_args: &CliArgs) -> Result<Self, ConfigError> {
        Self::discover_with_env(start_dir, cli_args, |key| std::env::var(key).ok())
    }

    /// Path- and environment-driven variant used by tests to avoid process-global state.
    pub fn discover_with_env<F>(
        start_dir: &Path,
        cli_args: &CliArgs,
        env: F,
    ) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut source_attribution = HashMap::new();
        let mut ai = AiConfig::default();
        let mut retry = RetryConfig::default();
        let mut store = StoreConfig::default();
        let mut verbose = false;

        for key in [
            "base_url",
            "model",
            "api_key_env",
            "timeout_secs",
            "max_tokens",
            "temperature",
            "top_p",
            "top_k",
            "frequency_penalty",
            "max_attempts",
            "backoff_ms",
            "strategy",
            "max_backoff_ms",
            "store.path",
            "verbose",
        ] {
            source_attribution.insert(key.to_string(), ConfigSource::Default);
        }

        let config_path = match &cli_args.config_path {
            Some(explicit) => {
                if !explicit.exists() {
                    return Err(ConfigError::NotFound {
                        path: explicit.display().to_string(),
                    });
                }
                Some(explicit.clone())
            }
            None => Self::discover_config_file_from(start_dir),
        };

        if let Some(path) = &config_path {
            let file_config = Self::load_config_file(path)
                .map_err(|e| ConfigError::InvalidFile(format!("{e:#}")))?;
            let src = ConfigSource::Config;

            if let Some(section) = file_config.ai {
                macro_rules! apply {
                    ($field:ident) => {
                        if let Some(value) = section.$field {
                            ai.$field = value;
                            source_attribution.insert(stringify!($field).to_string(), src);
                        }
                    };
                }
                apply!(base_url);
                apply!(api_key_env);
                apply!(timeout_secs);
                apply!(max_tokens);
                apply!(temperature);
                apply!(top_p);
                apply!(top_k);
                apply!(frequency_penalty);
                if section.model.is_some() {
                    ai.model = section.model;
                    source_attribution.insert("model".to_string(), src);
                }
            }

            if let Some(section) = file_config.retry {
                if let Some(v) = section.max_attempts {
                    retry.max_attempts = v;
                    source_attribution.insert("max_attempts".to_string(), src);
                }
                if let Some(v) = section.backoff_ms {
                    retry.backoff_ms = v;
                    source_attribution.insert("backoff_ms".to_string(), src);
                }
                if let Some(v) = section.strategy {
                    retry.strategy = v;
                    source_attribution.insert("strategy".to_string(), src);
                }
                if let Some(v) = section.max_backoff_ms {
                    retry.max_backoff_ms = v;
                    source_attribution.insert("max_backoff_ms".to_string(), src);
                }
            }

            if let Some(section) = file_config.store
                && let Some(p) = section.path
            {
                store.path = resolve_relative(path, p);
                source_attribution.insert("store.path".to_string(), src);
            }
        }

        // Environment overrides the file for the model id
        if let Some(model) = env(MODEL_ID_ENV).filter(|m| !m.trim().is_empty()) {
            ai.model = Some(model);
            source_attribution.insert("model".to_string(), ConfigSource::Env);
        }

        // CLI overrides everything
        if let Some(model) = &cli_args.model {
            ai.model = Some(model.clone());
            source_attribution.insert("model".to_string(), ConfigSource::Cli);
        }
        if let Some(base_url) = &cli_args.base_url {
            ai.base_url = base_url.clone();
            source_attribution.insert("base_url".to_string(), ConfigSource::Cli);
        }
        if let Some(timeout) = cli_args.timeout_secs {
            ai.timeout_secs = timeout;
            source_attribution.insert("timeout_secs".to_string(), ConfigSource::Cli);
        }
        if let Some(attempts) = cli_args.max_attempts {
            retry.max_attempts = attempts;
            source_attribution.insert("max_attempts".to_string(), ConfigSource::Cli);
        }
        if let Some(db) = &cli_args.db_path {
            store.path = db.clone();
            source_attribution.insert("store.path".to_string(), ConfigSource::Cli);
        }
        if let Some(v) = cli_args.verbose {
            verbose = v;
            source_attribution.insert("verbose".to_string(), ConfigSource::Cli);
        }

        let config = Config {
            ai,
            retry,
            store,
            verbose,
            config_file: config_path,
            source_attribution,
        };

        config.validate()?;
        Ok(config)
    }

    /// Search upward from `start_dir` for `.litdaily/config.toml`.
    ///
    /// Stops at the filesystem root or at the first repository root marker.
    #[must_use]
    pub fn discover_config_file_from(start_dir: &Path) -> Option<PathBuf> {
        for dir in start_dir.ancestors() {
            let config_path = dir.join(CONFIG_DIR).join(CONFIG_FILE);
            if config_path.is_file() {
                return Some(config_path);
            }
            if dir.join(".git").exists() || dir.join(".hg").exists() {
                break;
            }
        }
        None
    }

    /// Load configuration from TOML file
    pub(crate) fn load_config_file(path: &Path) -> Result<TomlConfig> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: TomlConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse TOML config file: {}", path.display()))?;
        Ok(config)
    }
}

/// Relative store paths in a discovered file are anchored at the project
/// directory (the parent of `.litdaily/`).
fn resolve_relative(config_path: &Path, value: PathBuf) -> PathBuf {
    if value.is_absolute() {
        return value;
    }
    let config_dir = config_path.parent();
    let anchor = match config_dir {
        Some(dir) if dir.file_name().is_some_and(|n| n == CONFIG_DIR) => dir.parent(),
        other => other,
    };
    match anchor {
        Some(base) => base.join(value),
        None => value,
    }
}
