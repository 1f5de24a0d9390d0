//! Foundation utilities shared by every litdaily crate.
//!
//! - `error`: the error taxonomy (configuration, LLM, store) and user-facing reports
//! - `exit_codes`: stable CLI exit codes
//! - `logging`: tracing subscriber setup
//! - `redaction`: scrubbing of credentials from error text
//! - `types`: small shared value types

pub mod error;
pub mod exit_codes;
pub mod logging;
pub mod redaction;
pub mod types;

pub use error::{
    ConfigError, ErrorCategory, LitDailyError, LlmError, StoreError, UserFriendlyError,
};
pub use exit_codes::ExitCode;
