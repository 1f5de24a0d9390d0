//! JSON payload extraction and per-kind validation of model output
//!
//! Models answer in free-form text. The payload is located in this order:
//!
//! 1. the body of a ```` ```json ```` fenced block, if one is present
//! 2. otherwise the span from the first `{` to the last `}`
//! 3. otherwise the raw text, which will then fail to parse
//!
//! Any parse or validation failure becomes `LlmError::ResponseFormatInvalid`
//! carrying the first 200 characters of the raw text.

use litdaily_utils::LlmError;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use crate::model::{ContentItem, GeneratedContent, PromptKind, ReviewContent};

/// Number of characters of raw model text kept for diagnostics
pub const SNIPPET_CHARS: usize = 200;

static FENCED_JSON: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)```json[ \t]*\r?\n(.*?)\r?\n[ \t]*```").unwrap());

/// Locate the JSON payload inside a model answer.
#[must_use]
pub fn extract_json_payload(text: &str) -> &str {
    if let Some(inner) = FENCED_JSON.captures(text).and_then(|caps| caps.get(1)) {
        return inner.as_str();
    }

    if let (Some(first), Some(last)) = (text.find('{'), text.rfind('}'))
        && last > first
    {
        return &text[first..=last];
    }

    text
}

/// First [`SNIPPET_CHARS`] characters of `raw`
#[must_use]
pub fn snippet(raw: &str) -> String {
    raw.chars().take(SNIPPET_CHARS).collect()
}

/// Extract, parse and validate a model answer for the given prompt kind.
///
/// # Errors
///
/// Returns `LlmError::ResponseFormatInvalid` when the payload is not JSON or
/// the kind's required fields are missing, not strings, or blank.
pub fn parse_response(kind: PromptKind, raw: &str) -> Result<GeneratedContent, LlmError> {
    let invalid = |message: String| LlmError::ResponseFormatInvalid {
        message,
        snippet: snippet(raw),
    };

    let value: Value = serde_json::from_str(extract_json_payload(raw))
        .map_err(|e| invalid(e.to_string()))?;

    match kind {
        PromptKind::Review => {
            let title = required_text(&value, "review_title").map_err(invalid)?;
            let content = required_text(&value, "review_content").map_err(invalid)?;
            Ok(GeneratedContent::Review(ReviewContent {
                title,
                content,
                author: optional_text(&value, "review_author"),
                tag: optional_text(&value, "review_tag"),
                source: optional_text(&value, "review_source"),
            }))
        }
        PromptKind::Concept | PromptKind::Question => {
            let title = required_text(&value, "title").map_err(invalid)?;
            let content = required_text(&value, "content").map_err(invalid)?;
            let item = ContentItem { title, content };
            Ok(if kind == PromptKind::Concept {
                GeneratedContent::Concept(item)
            } else {
                GeneratedContent::Question(item)
            })
        }
    }
}

fn required_text(value: &Value, field: &str) -> Result<String, String> {
    match value.get(field) {
        Some(Value::String(s)) if !s.trim().is_empty() => Ok(s.clone()),
        Some(Value::String(_)) => Err(format!("AI response field '{field}' is empty")),
        Some(_) => Err(format!("AI response field '{field}' is not a string")),
        None => Err(format!("AI response format is incorrect: missing {field}")),
    }
}

/// Optional metadata: blank strings and non-text values count as absent;
/// a list of strings (tag lists, typically) is joined with spaces.
fn optional_text(value: &Value, field: &str) -> Option<String> {
    let text = match value.get(field)? {
        Value::String(s) => s.clone(),
        Value::Array(items) => {
            let parts: Vec<&str> = items.iter().filter_map(Value::as_str).collect();
            if parts.len() != items.len() {
                return None;
            }
            parts.join(" ")
        }
        _ => return None,
    };

    (!text.trim().is_empty()).then_some(text)
}
