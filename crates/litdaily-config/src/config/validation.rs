use litdaily_utils::ConfigError;

use super::Config;

fn invalid(key: &str, value: impl Into<String>) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.into(),
    }
}

impl Config {
    /// Validate configuration values
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.ai.base_url.trim().is_empty() {
            return Err(invalid("base_url", "must not be empty"));
        }
        if !(self.ai.base_url.starts_with("http://") || self.ai.base_url.starts_with("https://"))
        {
            return Err(invalid("base_url", "must start with http:// or https://"));
        }

        if self.ai.api_key_env.trim().is_empty() {
            return Err(invalid("api_key_env", "must name an environment variable"));
        }

        if self.ai.timeout_secs == 0 {
            return Err(invalid("timeout_secs", "must be greater than 0"));
        }
        if self.ai.timeout_secs > 600 {
            return Err(invalid("timeout_secs", "exceeds maximum limit of 600 seconds"));
        }

        if self.ai.max_tokens == 0 {
            return Err(invalid("max_tokens", "must be greater than 0"));
        }

        if !(0.0..=2.0).contains(&self.ai.temperature) {
            return Err(invalid("temperature", "must be between 0 and 2"));
        }
        if !(self.ai.top_p > 0.0 && self.ai.top_p <= 1.0) {
            return Err(invalid("top_p", "must be in (0, 1]"));
        }
        if !(-2.0..=2.0).contains(&self.ai.frequency_penalty) {
            return Err(invalid("frequency_penalty", "must be between -2 and 2"));
        }

        if self.retry.max_attempts == 0 {
            return Err(invalid("max_attempts", "must be at least 1"));
        }
        if self.retry.max_attempts > 10 {
            return Err(invalid("max_attempts", "exceeds maximum limit of 10"));
        }
        if self.retry.max_backoff_ms < self.retry.backoff_ms {
            return Err(invalid("max_backoff_ms", "must not be smaller than backoff_ms"));
        }

        if self.store.path.as_os_str().is_empty() {
            return Err(invalid("store.path", "must not be empty"));
        }

        Ok(())
    }
}
