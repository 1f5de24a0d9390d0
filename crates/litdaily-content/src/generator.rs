//! Generation client: one prompt kind per call, bounded retries
//!
//! Every attempt re-issues the full request. Retryable failures (network,
//! timeouts, 429/503/504, malformed model output) wait according to the
//! [`RetryPolicy`] and try again until `max_attempts` is reached; anything else
//! is returned immediately.

use std::sync::Arc;
use std::time::{Duration, Instant};

use litdaily_config::{BackoffStrategy, Config, Credentials, RetryConfig};
use litdaily_llm::{LlmBackend, LlmError, LlmInvocation, Message};
use tracing::{debug, info, warn};

use crate::extraction::parse_response;
use crate::model::{GeneratedContent, PromptKind};
use crate::prompts::prompt_for;

/// Per-request settings shared by every prompt kind
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationSettings {
    pub model: String,
    pub timeout: Duration,
}

impl GenerationSettings {
    #[must_use]
    pub fn new(model: impl Into<String>, timeout: Duration) -> Self {
        Self {
            model: model.into(),
            timeout,
        }
    }

    #[must_use]
    pub fn from_config(config: &Config, credentials: &Credentials) -> Self {
        Self::new(credentials.model.clone(), config.ai.timeout())
    }
}

/// How often, and how patiently, a retryable failure is retried
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts including the first; at least 1
    pub max_attempts: u32,
    pub backoff: Duration,
    pub strategy: BackoffStrategy,
    /// Upper bound for exponential delays
    pub max_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_config(&RetryConfig::default())
    }
}

impl RetryPolicy {
    #[must_use]
    pub fn from_config(retry: &RetryConfig) -> Self {
        Self {
            max_attempts: retry.max_attempts.max(1),
            backoff: Duration::from_millis(retry.backoff_ms),
            strategy: retry.strategy,
            max_backoff: Duration::from_millis(retry.max_backoff_ms),
        }
    }

    /// Delay before retry number `retry` (1 = the first retry).
    #[must_use]
    pub fn delay_for(&self, retry: u32) -> Duration {
        match self.strategy {
            BackoffStrategy::Fixed => self.backoff,
            BackoffStrategy::Exponential => {
                let factor = 1u32
                    .checked_shl(retry.saturating_sub(1))
                    .unwrap_or(u32::MAX);
                self.backoff.saturating_mul(factor).min(self.max_backoff)
            }
        }
    }
}

/// Calls the backend for one prompt kind and turns the answer into typed content.
#[derive(Clone)]
pub struct ContentGenerator {
    backend: Arc<dyn LlmBackend>,
    settings: GenerationSettings,
    policy: RetryPolicy,
}

impl std::fmt::Debug for ContentGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContentGenerator")
            .field("settings", &self.settings)
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl ContentGenerator {
    #[must_use]
    pub fn new(
        backend: Arc<dyn LlmBackend>,
        settings: GenerationSettings,
        policy: RetryPolicy,
    ) -> Self {
        Self {
            backend,
            settings,
            policy,
        }
    }

    /// Build the configured HTTP backend and wrap it.
    ///
    /// # Errors
    ///
    /// Returns `LlmError::Misconfiguration` if the backend cannot be constructed.
    pub fn from_config(config: &Config, credentials: &Credentials) -> Result<Self, LlmError> {
        let backend = litdaily_llm::from_config(config, credentials)?;
        Ok(Self::new(
            backend,
            GenerationSettings::from_config(config, credentials),
            RetryPolicy::from_config(&config.retry),
        ))
    }

    /// Generate and validate content for one prompt kind.
    ///
    /// # Errors
    ///
    /// - the first non-retryable error, unchanged
    /// - `LlmError::RetriesExhausted` wrapping the last error once every
    ///   attempt allowed by the policy has failed
    pub async fn generate(&self, kind: PromptKind) -> Result<GeneratedContent, LlmError> {
        let max_attempts = self.policy.max_attempts.max(1);
        let mut attempt = 1;

        loop {
            let err = match self.attempt(kind, attempt).await {
                Ok(content) => return Ok(content),
                Err(err) => err,
            };

            if !err.is_retryable() {
                warn!(kind = %kind, attempt, error_kind = err.kind(), "Generation failed");
                return Err(err);
            }

            if attempt >= max_attempts {
                warn!(
                    kind = %kind,
                    attempts = attempt,
                    error_kind = err.kind(),
                    "Giving up after retryable failures"
                );
                return Err(LlmError::RetriesExhausted {
                    attempts: attempt,
                    last: Box::new(err),
                });
            }

            let delay = self.policy.delay_for(attempt);
            warn!(
                kind = %kind,
                attempt,
                error_kind = err.kind(),
                delay_ms = delay.as_millis() as u64,
                error = %err,
                "Retrying generation"
            );
            tokio::time::sleep(delay).await;
            attempt += 1;
        }
    }

    async fn attempt(&self, kind: PromptKind, attempt: u32) -> Result<GeneratedContent, LlmError> {
        let timeout = self.settings.timeout;
        let invocation = LlmInvocation::new(
            kind.as_str(),
            self.settings.model.clone(),
            timeout,
            vec![Message::user(prompt_for(kind))],
        );

        debug!(kind = %kind, attempt, model = %self.settings.model, "Requesting content");
        let started = Instant::now();

        let result = tokio::time::timeout(timeout, self.backend.invoke(invocation))
            .await
            .map_err(|_| LlmError::Timeout { duration: timeout })??;

        let content = parse_response(kind, &result.raw_response)?;

        info!(
            kind = %kind,
            attempt,
            model = %result.model_used,
            tokens_output = ?result.tokens_output,
            duration_ms = started.elapsed().as_millis() as u64,
            "Content generated"
        );
        Ok(content)
    }
}
