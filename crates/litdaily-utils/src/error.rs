use std::time::Duration;
use thiserror::Error;

use crate::exit_codes::ExitCode;

/// Library-level error type with rich context and user-friendly reporting.
///
/// `LitDailyError` is what the service layer and the CLI hand around. It
/// wraps the three failure domains of the system:
///
/// | Category | Description |
/// |----------|-------------|
/// | `Config` | Missing credentials, bad config file or CLI values |
/// | `Llm` | Upstream HTTP failures, timeouts, malformed model output |
/// | `Store` | Persistence failures in the content store |
///
/// # Exit Code Mapping
///
/// | Exit Code | Error Type |
/// |-----------|------------|
/// | 2 | Configuration errors (including LLM misconfiguration) |
/// | 70 | Generation failed (terminal upstream error or retries exhausted) |
/// | 74 | Store failure |
///
/// Library code returns `LitDailyError` and does NOT call `std::process::exit()`.
#[derive(Error, Debug)]
pub enum LitDailyError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Generation error: {0}")]
    Llm(#[from] LlmError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Trait for errors that can be rendered for end users.
pub trait UserFriendlyError {
    /// Get a user-friendly error message
    fn user_message(&self) -> String;

    /// Get contextual information about the error
    fn context(&self) -> Option<String>;

    /// Get suggested actions to resolve the error
    fn suggestions(&self) -> Vec<String>;

    /// Get the error category for grouping similar errors
    fn category(&self) -> ErrorCategory;
}

/// Categories of errors for better organization and handling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Upstream,
    Network,
    ModelOutput,
    Storage,
    FileSystem,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing credential: environment variable {key} is not set")]
    MissingCredential { key: String },

    #[error("Missing model identifier")]
    MissingModel,

    #[error("Invalid configuration value for {key}: {value}")]
    InvalidValue { key: String, value: String },

    #[error("Invalid configuration file: {0}")]
    InvalidFile(String),

    #[error("Configuration file not found at {path}")]
    NotFound { path: String },
}

impl UserFriendlyError for ConfigError {
    fn user_message(&self) -> String {
        match self {
            Self::MissingCredential { key } => {
                format!("The AI API key is not configured (expected in ${key})")
            }
            Self::MissingModel => "No model identifier is configured".to_string(),
            Self::InvalidValue { key, value } => {
                format!("Configuration '{key}' has invalid value: {value}")
            }
            Self::InvalidFile(reason) => {
                format!("Configuration file has invalid format: {reason}")
            }
            Self::NotFound { path } => format!("Configuration file not found: {path}"),
        }
    }

    fn context(&self) -> Option<String> {
        match self {
            Self::MissingCredential { .. } | Self::MissingModel => Some(
                "Credentials are checked before any request is sent to the AI provider."
                    .to_string(),
            ),
            Self::InvalidValue { .. } => None,
            Self::InvalidFile(_) => {
                Some("Configuration files use TOML with [ai], [retry] and [store] sections.".to_string())
            }
            Self::NotFound { .. } => None,
        }
    }

    fn suggestions(&self) -> Vec<String> {
        match self {
            Self::MissingCredential { key } => vec![
                format!("Export {key} with your provider API key"),
                "Or point [ai] api_key_env at the variable holding the key".to_string(),
            ],
            Self::MissingModel => vec![
                "Set SILICONFLOW_MODEL_ID, pass --model, or set [ai] model in .litdaily/config.toml"
                    .to_string(),
            ],
            Self::InvalidValue { key, .. } => {
                vec![format!("Fix the value of '{key}' in the config file or CLI flags")]
            }
            Self::InvalidFile(_) => vec!["Check the TOML syntax of the configuration file".to_string()],
            Self::NotFound { .. } => {
                vec!["Check the path passed to --config".to_string()]
            }
        }
    }

    fn category(&self) -> ErrorCategory {
        ErrorCategory::Configuration
    }
}

/// Classified failure of a single generation request.
///
/// Retryable variants are resolved inside the generation client; everything
/// else propagates unchanged to the caller.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LlmError {
    /// Backend could not be constructed (bad base URL, TLS setup, missing settings)
    #[error("Misconfiguration: {0}")]
    Misconfiguration(String),

    /// 400
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// 401
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// 404
    #[error("Not found: {0}")]
    NotFound(String),

    /// 429
    #[error("Rate limited: {0}")]
    RateLimited(String),

    /// 503
    #[error("Service unavailable: {0}")]
    Unavailable(String),

    /// 504
    #[error("Upstream timeout: {0}")]
    UpstreamTimeout(String),

    /// Any other non-2xx status
    #[error("Upstream error ({status}): {message}")]
    UpstreamError { status: u16, message: String },

    /// Request cancelled after the configured timeout
    #[error("Timeout after {duration:?}")]
    Timeout { duration: Duration },

    /// The endpoint could not be reached at all
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// The response arrived but its envelope was unusable (no choices, bad body)
    #[error("Transport error: {0}")]
    Transport(String),

    /// The model answered but the text did not parse or validate
    #[error("Failed to parse AI response: {message}. Raw snippet: {snippet}...")]
    ResponseFormatInvalid { message: String, snippet: String },

    /// Every allowed attempt failed with a retryable error
    #[error("Retries exhausted after {attempts} attempts: {last}")]
    RetriesExhausted { attempts: u32, last: Box<LlmError> },
}

impl LlmError {
    /// Whether a fresh attempt of the same request may plausibly succeed.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Timeout { .. }
                | Self::ConnectionFailed(_)
                | Self::Unavailable(_)
                | Self::UpstreamTimeout(_)
                | Self::ResponseFormatInvalid { .. }
                | Self::RateLimited(_)
        )
    }

    /// Short stable label used in logs.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Misconfiguration(_) => "misconfiguration",
            Self::BadRequest(_) => "bad_request",
            Self::Unauthorized(_) => "unauthorized",
            Self::NotFound(_) => "not_found",
            Self::RateLimited(_) => "rate_limited",
            Self::Unavailable(_) => "unavailable",
            Self::UpstreamTimeout(_) => "upstream_timeout",
            Self::UpstreamError { .. } => "upstream_error",
            Self::Timeout { .. } => "timeout",
            Self::ConnectionFailed(_) => "connection_failed",
            Self::Transport(_) => "transport",
            Self::ResponseFormatInvalid { .. } => "response_format_invalid",
            Self::RetriesExhausted { .. } => "retries_exhausted",
        }
    }

    /// The innermost error, looking through `RetriesExhausted`.
    #[must_use]
    pub fn root(&self) -> &LlmError {
        match self {
            Self::RetriesExhausted { last, .. } => last.root(),
            other => other,
        }
    }
}

impl UserFriendlyError for LlmError {
    fn user_message(&self) -> String {
        match self {
            Self::Misconfiguration(msg) => format!("AI client configuration error: {msg}"),
            Self::BadRequest(msg) => format!("The AI provider rejected the request: {msg}"),
            Self::Unauthorized(_) => "The AI API key is invalid or unauthorized".to_string(),
            Self::NotFound(_) => "The requested AI resource does not exist".to_string(),
            Self::RateLimited(_) => "The AI provider rate limit was exceeded".to_string(),
            Self::Unavailable(_) => "The AI service is temporarily unavailable".to_string(),
            Self::UpstreamTimeout(_) => "The AI service timed out responding".to_string(),
            Self::UpstreamError { status, message } => {
                format!("AI request failed ({status}): {message}")
            }
            Self::Timeout { duration } => {
                format!("AI request timed out after {}s", duration.as_secs())
            }
            Self::ConnectionFailed(_) => "Could not connect to the AI API server".to_string(),
            Self::Transport(msg) => format!("AI response could not be read: {msg}"),
            Self::ResponseFormatInvalid { message, .. } => {
                format!("The AI response was not in the expected format: {message}")
            }
            Self::RetriesExhausted { attempts, last } => format!(
                "Content generation failed after {attempts} attempts: {}",
                last.user_message()
            ),
        }
    }

    fn context(&self) -> Option<String> {
        match self {
            Self::ResponseFormatInvalid { snippet, .. } => {
                Some(format!("Response began with: {snippet}"))
            }
            Self::RetriesExhausted { last, .. } => last.context(),
            Self::Timeout { .. } | Self::ConnectionFailed(_) => Some(
                "Network failures are retried a bounded number of times before giving up."
                    .to_string(),
            ),
            _ => None,
        }
    }

    fn suggestions(&self) -> Vec<String> {
        match self.root() {
            Self::Unauthorized(_) => vec![
                "Check that the API key environment variable holds a valid key".to_string(),
            ],
            Self::RateLimited(_) | Self::Unavailable(_) | Self::UpstreamTimeout(_) => {
                vec!["Wait a few minutes and try again".to_string()]
            }
            Self::Timeout { .. } => vec![
                "Increase [ai] timeout_secs or pass --timeout".to_string(),
                "Check your internet connection".to_string(),
            ],
            Self::ConnectionFailed(_) => vec![
                "Check your network connection and the configured [ai] base_url".to_string(),
            ],
            Self::ResponseFormatInvalid { .. } => vec![
                "Try again; models occasionally answer outside the requested JSON format"
                    .to_string(),
                "Consider a different model via --model".to_string(),
            ],
            Self::BadRequest(_) | Self::NotFound(_) => {
                vec!["Check the configured model identifier and base_url".to_string()]
            }
            _ => vec!["Run with --verbose for detailed request logs".to_string()],
        }
    }

    fn category(&self) -> ErrorCategory {
        match self.root() {
            Self::Misconfiguration(_) => ErrorCategory::Configuration,
            Self::Timeout { .. } | Self::ConnectionFailed(_) | Self::Transport(_) => {
                ErrorCategory::Network
            }
            Self::ResponseFormatInvalid { .. } => ErrorCategory::ModelOutput,
            _ => ErrorCategory::Upstream,
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(String),

    #[error(
        "Database schema version {db_version} is newer than supported {latest_supported}"
    )]
    UnsupportedSchemaVersion { db_version: u32, latest_supported: u32 },

    #[error("Stored record for {date} is corrupt: {reason}")]
    Corrupt { date: String, reason: String },

    #[error("Refusing to store content for {date}: {reason}")]
    Rejected { date: String, reason: String },

    #[error("Store IO error: {0}")]
    Io(String),
}

impl UserFriendlyError for StoreError {
    fn user_message(&self) -> String {
        match self {
            Self::Database(msg) => format!("Content database error: {msg}"),
            Self::UnsupportedSchemaVersion { .. } => {
                "The content database was created by a newer litdaily".to_string()
            }
            Self::Corrupt { date, reason } => {
                format!("Stored content for {date} could not be read: {reason}")
            }
            Self::Rejected { date, reason } => {
                format!("Content for {date} was not stored: {reason}")
            }
            Self::Io(msg) => format!("Content database could not be opened: {msg}"),
        }
    }

    fn context(&self) -> Option<String> {
        match self {
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => Some(format!(
                "Database schema is v{db_version}, this binary supports up to v{latest_supported}."
            )),
            _ => None,
        }
    }

    fn suggestions(&self) -> Vec<String> {
        match self {
            Self::UnsupportedSchemaVersion { .. } => {
                vec!["Upgrade litdaily or point --db at a different file".to_string()]
            }
            Self::Rejected { .. } => {
                vec!["Run `litdaily generate` again to request fresh content".to_string()]
            }
            _ => vec!["Check the [store] path and its permissions".to_string()],
        }
    }

    fn category(&self) -> ErrorCategory {
        ErrorCategory::Storage
    }
}

impl UserFriendlyError for LitDailyError {
    fn user_message(&self) -> String {
        match self {
            Self::Config(e) => e.user_message(),
            Self::Llm(e) => e.user_message(),
            Self::Store(e) => e.user_message(),
            Self::Io(e) => format!("IO error: {e}"),
        }
    }

    fn context(&self) -> Option<String> {
        match self {
            Self::Config(e) => e.context(),
            Self::Llm(e) => e.context(),
            Self::Store(e) => e.context(),
            Self::Io(_) => None,
        }
    }

    fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Config(e) => e.suggestions(),
            Self::Llm(e) => e.suggestions(),
            Self::Store(e) => e.suggestions(),
            Self::Io(_) => vec!["Check file permissions and available disk space".to_string()],
        }
    }

    fn category(&self) -> ErrorCategory {
        match self {
            Self::Config(e) => e.category(),
            Self::Llm(e) => e.category(),
            Self::Store(e) => e.category(),
            Self::Io(_) => ErrorCategory::FileSystem,
        }
    }
}

impl LitDailyError {
    /// Get a user-friendly error message with context and actionable suggestions.
    ///
    /// The rendered text goes through credential redaction before it is returned.
    #[must_use]
    pub fn display_for_user(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!("Error: {}\n", self.user_message()));

        if let Some(ctx) = self.context() {
            output.push_str(&format!("\nContext: {}\n", ctx));
        }

        let suggestions = self.suggestions();
        if !suggestions.is_empty() {
            output.push_str("\nSuggestions:\n");
            for suggestion in suggestions {
                output.push_str(&format!("  • {}\n", suggestion));
            }
        }

        crate::redaction::redact_error_message(&output)
    }

    /// Map this error to the appropriate CLI exit code.
    #[must_use]
    pub fn to_exit_code(&self) -> ExitCode {
        match self {
            Self::Config(_) => ExitCode::CLI_ARGS,
            Self::Llm(LlmError::Misconfiguration(_)) => ExitCode::CLI_ARGS,
            Self::Llm(_) => ExitCode::GENERATION_FAILED,
            Self::Store(_) => ExitCode::STORE_FAILURE,
            Self::Io(_) => ExitCode::INTERNAL,
        }
    }
}
