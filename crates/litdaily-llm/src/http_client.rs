//! Shared HTTP client infrastructure for HTTP-based providers
//!
//! One `reqwest::Client` is configured per backend and reused for every
//! request. This layer performs exactly one attempt per call: it applies the
//! per-request timeout and turns transport failures and non-2xx statuses into
//! classified [`LlmError`] values. Retrying happens one level up, in the
//! content generator, so that malformed model output is retried the same way.

use litdaily_utils::redaction::redact_error_message;
use reqwest::{Client, Response, StatusCode};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

use crate::LlmError;

/// Default connect timeout (30 seconds)
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// Maximum number of characters of an error body kept in an error message
const MAX_ERROR_BODY_CHARS: usize = 300;

/// Shared HTTP client for providers
#[derive(Clone)]
pub(crate) struct HttpClient {
    client: Arc<Client>,
}

impl HttpClient {
    /// Create a new HTTP client with default configuration
    ///
    /// # Errors
    ///
    /// Returns `LlmError::Misconfiguration` if the client cannot be constructed
    pub fn new() -> Result<Self, LlmError> {
        let client = Client::builder()
            .connect_timeout(DEFAULT_CONNECT_TIMEOUT)
            .pool_idle_timeout(Duration::from_secs(90))
            .pool_max_idle_per_host(10)
            .build()
            .map_err(|e| {
                LlmError::Misconfiguration(format!("Failed to build HTTP client: {}", e))
            })?;

        Ok(Self {
            client: Arc::new(client),
        })
    }

    /// Start a POST request on the shared client
    pub fn post(&self, url: &str) -> reqwest::RequestBuilder {
        self.client.post(url)
    }

    /// Execute one HTTP request with a timeout and classify the outcome.
    ///
    /// # Errors
    ///
    /// - `LlmError::Timeout` when the request exceeds `timeout`
    /// - `LlmError::ConnectionFailed` for connect and other network failures
    /// - a status-specific variant for non-2xx responses (see [`classify_status`])
    pub async fn execute(
        &self,
        request_builder: reqwest::RequestBuilder,
        timeout: Duration,
        provider_name: &str,
    ) -> Result<Response, LlmError> {
        let request = request_builder
            .timeout(timeout)
            .build()
            .map_err(|e| LlmError::Misconfiguration(format!("Failed to build request: {}", e)))?;

        debug!(
            provider = provider_name,
            url = %request.url(),
            timeout_secs = timeout.as_secs(),
            "Executing HTTP request"
        );

        let started = Instant::now();
        let response = match self.client.execute(request).await {
            Ok(response) => response,
            Err(e) if e.is_timeout() => {
                warn!(provider = provider_name, "Request timed out");
                return Err(LlmError::Timeout { duration: timeout });
            }
            Err(e) => {
                let message = redact_error_message(&format!("{} request failed: {}", provider_name, e));
                warn!(provider = provider_name, error = %message, "Network error");
                return Err(LlmError::ConnectionFailed(message));
            }
        };

        let status = response.status();
        debug!(
            provider = provider_name,
            status = status.as_u16(),
            duration_ms = started.elapsed().as_millis() as u64,
            "HTTP response received"
        );

        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = error_message_from_body(&body, status);
        warn!(
            provider = provider_name,
            status = status.as_u16(),
            error = %message,
            "Provider returned error status"
        );
        Err(classify_status(status, message))
    }
}

/// Map a non-2xx status to its classified error.
///
/// - 400 → `BadRequest`
/// - 401 → `Unauthorized`
/// - 404 → `NotFound`
/// - 429 → `RateLimited`
/// - 503 → `Unavailable`
/// - 504 → `UpstreamTimeout`
/// - anything else → `UpstreamError`
pub(crate) fn classify_status(status: StatusCode, message: String) -> LlmError {
    match status {
        StatusCode::BAD_REQUEST => LlmError::BadRequest(message),
        StatusCode::UNAUTHORIZED => LlmError::Unauthorized(message),
        StatusCode::NOT_FOUND => LlmError::NotFound(message),
        StatusCode::TOO_MANY_REQUESTS => LlmError::RateLimited(message),
        StatusCode::SERVICE_UNAVAILABLE => LlmError::Unavailable(message),
        StatusCode::GATEWAY_TIMEOUT => LlmError::UpstreamTimeout(message),
        other => LlmError::UpstreamError {
            status: other.as_u16(),
            message,
        },
    }
}

/// Pull a human-readable message out of a provider error body.
///
/// Looks for `error.message`, then a top-level `message`, then falls back to
/// the status reason phrase.
pub(crate) fn error_message_from_body(body: &str, status: StatusCode) -> String {
    let from_json = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            v.pointer("/error/message")
                .or_else(|| v.get("message"))
                .and_then(|m| m.as_str())
                .map(str::to_string)
        })
        .filter(|m| !m.trim().is_empty());

    let message = from_json.unwrap_or_else(|| {
        status
            .canonical_reason()
            .map(str::to_string)
            .unwrap_or_else(|| status.as_str().to_string())
    });

    let truncated: String = message.chars().take(MAX_ERROR_BODY_CHARS).collect();
    redact_error_message(&truncated)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_client_construction() {
        assert!(HttpClient::new().is_ok());
    }

    #[test]
    fn test_classify_status_table() {
        let cases = [
            (400, "bad_request"),
            (401, "unauthorized"),
            (404, "not_found"),
            (429, "rate_limited"),
            (503, "unavailable"),
            (504, "upstream_timeout"),
            (500, "upstream_error"),
            (403, "upstream_error"),
            (502, "upstream_error"),
        ];
        for (code, kind) in cases {
            let status = StatusCode::from_u16(code).unwrap();
            let err = classify_status(status, "msg".to_string());
            assert_eq!(err.kind(), kind, "status {code}");
        }
    }

    #[test]
    fn test_other_status_keeps_code_and_message() {
        let err = classify_status(StatusCode::INTERNAL_SERVER_ERROR, "boom".to_string());
        assert_eq!(
            err,
            LlmError::UpstreamError {
                status: 500,
                message: "boom".to_string()
            }
        );
    }

    #[test]
    fn test_error_message_prefers_nested_error_message() {
        let body = r#"{"error":{"message":"Model does not exist","type":"invalid_request"}}"#;
        assert_eq!(
            error_message_from_body(body, StatusCode::BAD_REQUEST),
            "Model does not exist"
        );
    }

    #[test]
    fn test_error_message_accepts_top_level_message() {
        let body = r#"{"code":20012,"message":"Invalid token","data":null}"#;
        assert_eq!(
            error_message_from_body(body, StatusCode::UNAUTHORIZED),
            "Invalid token"
        );
    }

    #[test]
    fn test_error_message_falls_back_to_reason_phrase() {
        assert_eq!(
            error_message_from_body("<html>bad gateway</html>", StatusCode::BAD_GATEWAY),
            "Bad Gateway"
        );
        assert_eq!(
            error_message_from_body("", StatusCode::TOO_MANY_REQUESTS),
            "Too Many Requests"
        );
    }
}
