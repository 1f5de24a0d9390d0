//! Terminal and JSON rendering of daily content and configuration

use std::fmt::Write as _;

use litdaily_config::Config;
use litdaily_content::{ContentItem, DailyBundle, DailyPair, ReviewContent};
use litdaily_utils::redaction::mask_secret;
use serde::Serialize;

/// Pretty-printed JSON followed by a newline
///
/// # Errors
///
/// Propagates serialization failures.
pub fn json<T: Serialize>(value: &T) -> Result<String, serde_json::Error> {
    let mut out = serde_json::to_string_pretty(value)?;
    out.push('\n');
    Ok(out)
}

#[must_use]
pub fn pair_text(pair: &DailyPair) -> String {
    let mut out = bundle_text("今日", &pair.today);
    out.push('\n');
    out.push_str(&bundle_text("昨日", &pair.yesterday));
    out
}

#[must_use]
pub fn bundle_text(label: &str, bundle: &DailyBundle) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "=== {label} · {} ===", bundle.date);
    out.push('\n');
    review_section(&mut out, &bundle.review);
    item_section(&mut out, "文学概念", &bundle.concept);
    item_section(&mut out, "考研题目", &bundle.question);
    out
}

fn review_section(out: &mut String, review: &ReviewContent) {
    let _ = writeln!(out, "【文学评论】{}", review.title);
    let attribution: Vec<&str> = [&review.author, &review.tag, &review.source]
        .into_iter()
        .filter_map(|v| v.as_deref())
        .collect();
    if !attribution.is_empty() {
        let _ = writeln!(out, "{}", attribution.join(" · "));
    }
    let _ = writeln!(out, "{}", review.content.trim_end());
    out.push('\n');
}

fn item_section(out: &mut String, heading: &str, item: &ContentItem) {
    let _ = writeln!(out, "【{heading}】{}", item.title);
    let _ = writeln!(out, "{}", item.content.trim_end());
    out.push('\n');
}

/// Effective configuration with the source of each value.
///
/// `api_key` is the resolved key, if any; only a masked prefix is shown.
#[must_use]
pub fn config_text(config: &Config, api_key: Option<&str>) -> String {
    let mut out = String::new();
    let mut line = |key: &str, value: String| {
        let _ = writeln!(out, "  {key:<18} = {value:<50} ({})", config.source_of(key));
    };

    line("base_url", config.ai.base_url.clone());
    line(
        "model",
        config.ai.model.clone().unwrap_or_else(|| "<unset>".to_string()),
    );
    line("api_key_env", config.ai.api_key_env.clone());
    line("timeout_secs", config.ai.timeout_secs.to_string());
    line("max_tokens", config.ai.max_tokens.to_string());
    line("temperature", config.ai.temperature.to_string());
    line("top_p", config.ai.top_p.to_string());
    line("top_k", config.ai.top_k.to_string());
    line("frequency_penalty", config.ai.frequency_penalty.to_string());
    line("max_attempts", config.retry.max_attempts.to_string());
    line("backoff_ms", config.retry.backoff_ms.to_string());
    line("strategy", config.retry.strategy.to_string());
    line("max_backoff_ms", config.retry.max_backoff_ms.to_string());
    line("store.path", config.store.path.display().to_string());

    let mut header = String::from("Effective configuration:\n");
    header.push_str(&out);
    header.push('\n');

    let _ = writeln!(
        header,
        "Config file: {}",
        config
            .config_file
            .as_ref()
            .map_or_else(|| "<none>".to_string(), |p| p.display().to_string())
    );
    let _ = writeln!(
        header,
        "API key ({}): {}",
        config.ai.api_key_env,
        api_key.map_or_else(|| "<not set>".to_string(), mask_secret)
    );
    header
}
