use litdaily_utils::ConfigError;

use super::Config;

/// Resolved credential pair needed to call the AI endpoint.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub api_key: String,
    pub model: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &litdaily_utils::redaction::mask_secret(&self.api_key))
            .field("model", &self.model)
            .finish()
    }
}

impl Config {
    /// Resolve the API key and model identifier from the process environment.
    ///
    /// # Errors
    ///
    /// `ConfigError::MissingCredential` when the key variable is unset or blank,
    /// `ConfigError::MissingModel` when no model was configured anywhere.
    pub fn credentials(&self) -> Result<Credentials, ConfigError> {
        self.credentials_with(|key| std::env::var(key).ok())
    }

    /// Same as [`credentials`](Self::credentials) with an injected environment lookup.
    pub fn credentials_with<F>(&self, env: F) -> Result<Credentials, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = env(&self.ai.api_key_env)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .ok_or_else(|| ConfigError::MissingCredential {
                key: self.ai.api_key_env.clone(),
            })?;

        let model = self
            .ai
            .model
            .as_deref()
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .ok_or(ConfigError::MissingModel)?
            .to_string();

        Ok(Credentials { api_key, model })
    }
}
