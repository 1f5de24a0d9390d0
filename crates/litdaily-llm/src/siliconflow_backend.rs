//! SiliconFlow HTTP backend
//!
//! SiliconFlow exposes an OpenAI-compatible chat-completions endpoint. Any
//! other compatible endpoint works by pointing `[ai] base_url` at it.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::LlmError;
use crate::http_client::HttpClient;
use crate::types::{LlmBackend, LlmInvocation, LlmResult, Message, Role, SamplingParams};
use litdaily_config::{Config, Credentials, DEFAULT_BASE_URL};

const PROVIDER: &str = "siliconflow";

/// Backend for an OpenAI-compatible chat-completions endpoint
#[derive(Clone)]
pub struct SiliconFlowBackend {
    client: HttpClient,
    base_url: String,
    api_key: String,
    default_model: String,
    default_sampling: SamplingParams,
}

impl std::fmt::Debug for SiliconFlowBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SiliconFlowBackend")
            .field("base_url", &self.base_url)
            .field("default_model", &self.default_model)
            .finish_non_exhaustive()
    }
}

impl SiliconFlowBackend {
    /// Create a new backend
    ///
    /// # Errors
    ///
    /// Returns `LlmError::Misconfiguration` if the HTTP client cannot be constructed
    pub fn new(
        api_key: String,
        base_url: Option<String>,
        default_model: String,
        default_sampling: SamplingParams,
    ) -> Result<Self, LlmError> {
        Ok(Self {
            client: HttpClient::new()?,
            base_url: base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            api_key,
            default_model,
            default_sampling,
        })
    }

    /// Create a backend from resolved configuration and credentials
    ///
    /// # Errors
    ///
    /// Returns `LlmError::Misconfiguration` if the HTTP client cannot be constructed
    pub fn new_from_config(config: &Config, credentials: &Credentials) -> Result<Self, LlmError> {
        Self::new(
            credentials.api_key.clone(),
            Some(config.ai.base_url.clone()),
            credentials.model.clone(),
            SamplingParams::from_ai_config(&config.ai),
        )
    }

    fn resolve_model(&self, inv: &LlmInvocation) -> String {
        if inv.model.is_empty() {
            self.default_model.clone()
        } else {
            inv.model.clone()
        }
    }

    fn build_request_body(&self, inv: &LlmInvocation) -> ChatRequest {
        let sampling = self.default_sampling;
        ChatRequest {
            model: self.resolve_model(inv),
            messages: convert_messages(&inv.messages),
            stream: false,
            max_tokens: sampling.max_tokens,
            temperature: sampling.temperature,
            top_p: sampling.top_p,
            top_k: sampling.top_k,
            frequency_penalty: sampling.frequency_penalty,
            n: 1,
            response_format: ResponseFormat { kind: "text" },
        }
    }
}

fn convert_messages(messages: &[Message]) -> Vec<ChatMessage> {
    messages
        .iter()
        .map(|msg| ChatMessage {
            role: msg.role,
            content: msg.content.clone(),
        })
        .collect()
}

#[async_trait]
impl LlmBackend for SiliconFlowBackend {
    async fn invoke(&self, inv: LlmInvocation) -> Result<LlmResult, LlmError> {
        let body = self.build_request_body(&inv);
        let model = body.model.clone();

        debug!(
            provider = PROVIDER,
            purpose = %inv.purpose,
            model = %model,
            max_tokens = body.max_tokens,
            temperature = body.temperature,
            timeout_secs = inv.timeout.as_secs(),
            "Invoking chat completion"
        );

        let request = self
            .client
            .post(&self.base_url)
            .bearer_auth(&self.api_key)
            .header("Content-Type", "application/json")
            .json(&body);

        let response = self.client.execute(request, inv.timeout, PROVIDER).await?;

        let text = response.text().await.map_err(|e| {
            if e.is_timeout() {
                LlmError::Timeout {
                    duration: inv.timeout,
                }
            } else {
                LlmError::ConnectionFailed(format!("Failed to read {PROVIDER} response: {e}"))
            }
        })?;

        let response_body: ChatResponse = serde_json::from_str(&text).map_err(|e| {
            LlmError::Transport(format!("Failed to parse {PROVIDER} response envelope: {e}"))
        })?;

        let choice = response_body.choices.into_iter().next().ok_or_else(|| {
            LlmError::Transport(format!("{PROVIDER} response missing choices[0]"))
        })?;

        let content = choice.message.content.ok_or_else(|| {
            LlmError::Transport(format!("{PROVIDER} response missing content in choices[0]"))
        })?;

        let mut result = LlmResult::new(content, PROVIDER, response_body.model.unwrap_or(model));
        if let Some(usage) = response_body.usage {
            result = result.with_tokens(usage.prompt_tokens, usage.completion_tokens);
        }

        debug!(
            provider = PROVIDER,
            purpose = %inv.purpose,
            tokens_input = ?result.tokens_input,
            tokens_output = ?result.tokens_output,
            "Chat completion finished"
        );

        Ok(result)
    }
}

/// OpenAI-compatible message format for requests
#[derive(Debug, Clone, Serialize)]
struct ChatMessage {
    role: Role,
    content: String,
}

#[derive(Debug, Clone, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

/// Request body
#[derive(Debug, Clone, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    stream: bool,
    max_tokens: u32,
    temperature: f32,
    top_p: f32,
    top_k: u32,
    frequency_penalty: f32,
    n: u32,
    response_format: ResponseFormat,
}

/// Response body
#[derive(Debug, Clone, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    choices: Vec<Choice>,
    usage: Option<Usage>,
}

#[derive(Debug, Clone, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Clone, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct Usage {
    prompt_tokens: u64,
    completion_tokens: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn backend() -> SiliconFlowBackend {
        SiliconFlowBackend::new(
            "test-key".to_string(),
            None,
            "default-model".to_string(),
            SamplingParams::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_request_body_shape() {
        let inv = LlmInvocation::new(
            "concept",
            "",
            Duration::from_secs(60),
            vec![Message::user("请解释一个文学概念")],
        );
        let body = serde_json::to_value(backend().build_request_body(&inv)).unwrap();

        assert_eq!(body["model"], "default-model");
        assert_eq!(body["stream"], false);
        assert_eq!(body["n"], 1);
        assert_eq!(body["max_tokens"], 1000);
        assert_eq!(body["top_k"], 50);
        assert_eq!(body["response_format"]["type"], "text");
        assert_eq!(body["messages"].as_array().unwrap().len(), 1);
        assert_eq!(body["messages"][0]["role"], "user");
        assert_eq!(body["messages"][0]["content"], "请解释一个文学概念");
    }

    #[test]
    fn test_configured_sampling_is_sent() {
        let backend = SiliconFlowBackend::new(
            "test-key".to_string(),
            None,
            "default-model".to_string(),
            SamplingParams {
                temperature: 0.1,
                ..SamplingParams::default()
            },
        )
        .unwrap();
        let inv = LlmInvocation::new("question", "", Duration::from_secs(1), vec![]);
        let body = backend.build_request_body(&inv);
        assert_eq!(body.temperature, 0.1);
        assert_eq!(body.top_k, 50);
    }

    #[test]
    fn test_invocation_model_overrides_default() {
        let inv = LlmInvocation::new("review", "custom", Duration::from_secs(1), vec![]);
        assert_eq!(backend().resolve_model(&inv), "custom");
    }

    #[test]
    fn test_debug_shows_endpoint_but_hides_api_key() {
        let debug = format!("{:?}", backend());
        assert!(debug.contains(DEFAULT_BASE_URL));
        assert!(!debug.contains("test-key"));
    }

    #[test]
    fn test_response_envelope_parses() {
        let raw = r#"{
            "id": "x",
            "model": "Qwen/Qwen2.5-7B-Instruct",
            "choices": [{"index": 0, "message": {"role": "assistant", "content": "{\"title\":\"t\"}"}, "finish_reason": "stop"}],
            "usage": {"prompt_tokens": 12, "completion_tokens": 34, "total_tokens": 46}
        }"#;
        let parsed: ChatResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.choices.len(), 1);
        assert_eq!(
            parsed.choices[0].message.content.as_deref(),
            Some("{\"title\":\"t\"}")
        );
        assert_eq!(parsed.usage.unwrap().completion_tokens, 34);
    }
}
