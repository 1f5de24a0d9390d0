//! Small value types shared across crates

use serde::{Deserialize, Serialize};

/// Where an effective configuration value came from.
///
/// Precedence, highest first: `Cli`, `Env`, `Config`, `Default`.
///
/// ```rust
/// use litdaily_utils::types::ConfigSource;
///
/// assert_eq!(ConfigSource::Env.to_string(), "env");
/// ```
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ConfigSource {
    /// Value provided via CLI argument (highest precedence).
    Cli,
    /// Value read from an environment variable.
    Env,
    /// Value loaded from configuration file.
    Config,
    /// Built-in default value (lowest precedence).
    Default,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cli => write!(f, "cli"),
            Self::Env => write!(f, "env"),
            Self::Config => write!(f, "config"),
            Self::Default => write!(f, "default"),
        }
    }
}
