//! Scripted backend shared by the generation tests

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use litdaily_config::BackoffStrategy;
use litdaily_content::{GenerationSettings, RetryPolicy};
use litdaily_llm::{LlmBackend, LlmError, LlmInvocation, LlmResult};

/// What the backend does for one call
pub enum Step {
    Reply(String),
    Fail(LlmError),
    /// Never answers; only a timeout ends the call
    Hang,
}

/// Backend that plays back a queue of steps per prompt kind
#[derive(Default)]
pub struct ScriptedBackend {
    scripts: Mutex<HashMap<String, VecDeque<Step>>>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn script(self, purpose: &str, steps: Vec<Step>) -> Self {
        self.scripts
            .lock()
            .unwrap()
            .insert(purpose.to_string(), steps.into_iter().collect());
        self
    }

    pub fn calls_for(&self, purpose: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|p| p.as_str() == purpose)
            .count()
    }

    pub fn total_calls(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl LlmBackend for ScriptedBackend {
    async fn invoke(&self, inv: LlmInvocation) -> Result<LlmResult, LlmError> {
        self.calls.lock().unwrap().push(inv.purpose.clone());
        let step = self
            .scripts
            .lock()
            .unwrap()
            .get_mut(&inv.purpose)
            .and_then(VecDeque::pop_front);

        match step {
            Some(Step::Reply(text)) => Ok(LlmResult::new(text, "scripted", inv.model).with_tokens(10, 20)),
            Some(Step::Fail(err)) => Err(err),
            Some(Step::Hang) => std::future::pending().await,
            None => Err(LlmError::Transport(format!(
                "script for {} exhausted",
                inv.purpose
            ))),
        }
    }
}

pub fn review_reply() -> Step {
    Step::Reply(
        "```json\n{\"review_title\": \"论《红楼梦》的悲剧意识\", \"review_content\": \"曹雪芹以家族兴衰写尽人生无常。\", \"review_author\": \"林清\", \"review_tag\": \"#经典 #文学评论\"}\n```"
            .to_string(),
    )
}

pub fn concept_reply() -> Step {
    Step::Reply(
        "以下是解释：{\"title\": \"意象\", \"content\": \"意象是寓意于象的艺术形象。\"} 希望有帮助。".to_string(),
    )
}

pub fn question_reply() -> Step {
    Step::Reply(
        "{\"title\": \"论鲁迅小说的启蒙主题\", \"content\": \"结合《呐喊》分析其叙事策略。\"}".to_string(),
    )
}

pub fn settings() -> GenerationSettings {
    GenerationSettings::new("Qwen/Qwen2.5-7B-Instruct", Duration::from_secs(60))
}

/// Retries without waiting
pub fn immediate(max_attempts: u32) -> RetryPolicy {
    RetryPolicy {
        max_attempts,
        backoff: Duration::ZERO,
        strategy: BackoffStrategy::Fixed,
        max_backoff: Duration::ZERO,
    }
}
