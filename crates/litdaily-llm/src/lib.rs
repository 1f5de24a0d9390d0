//! Chat-completion backends
//!
//! All providers implement the [`LlmBackend`] trait so the content generator
//! can work against the real HTTP endpoint or a scripted test double without
//! knowing the difference.

pub(crate) mod http_client;
mod siliconflow_backend;
mod types;

pub use litdaily_utils::error::LlmError;
pub use siliconflow_backend::SiliconFlowBackend;
pub use types::{LlmBackend, LlmInvocation, LlmResult, Message, Role, SamplingParams};

use litdaily_config::{Config, Credentials};
use std::sync::Arc;

/// Build the configured backend.
///
/// # Errors
///
/// Returns `LlmError::Misconfiguration` if the HTTP client cannot be constructed.
pub fn from_config(
    config: &Config,
    credentials: &Credentials,
) -> Result<Arc<dyn LlmBackend>, LlmError> {
    let backend = SiliconFlowBackend::new_from_config(config, credentials)?;
    Ok(Arc::new(backend))
}
