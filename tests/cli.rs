//! End-to-end tests for the `litdaily` binary
//!
//! Every invocation runs in a fresh temp directory with the provider
//! variables cleared, so no developer config or key leaks into the run.

use std::path::Path;
use std::process::Command;

use assert_cmd::assert::OutputAssertExt;
use litdaily_content::prompts::{CONCEPT_PROMPT, QUESTION_PROMPT, REVIEW_PROMPT};
use mockito::{Matcher, Mock, ServerGuard};
use predicates::prelude::*;
use tempfile::TempDir;

fn litdaily(dir: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("litdaily"));
    cmd.current_dir(dir)
        .env_remove("SILICONFLOW_API_KEY")
        .env_remove("SILICONFLOW_MODEL_ID")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_help_lists_commands() {
    let dir = TempDir::new().unwrap();
    litdaily(dir.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("today"))
        .stdout(predicate::str::contains("generate"))
        .stdout(predicate::str::contains("preview"))
        .stdout(predicate::str::contains("show"));
}

#[test]
fn test_preview_without_key_exits_with_config_code() {
    let dir = TempDir::new().unwrap();
    litdaily(dir.path())
        .args(["preview", "--model", "Qwen/Qwen2.5-7B-Instruct"])
        // unroutable: a request would fail differently than the missing key
        .args(["--base-url", "http://127.0.0.1:9/v1/chat/completions"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("SILICONFLOW_API_KEY"));
}

#[test]
fn test_config_masks_key_and_reports_sources() {
    let dir = TempDir::new().unwrap();
    litdaily(dir.path())
        .env("SILICONFLOW_API_KEY", "sk-abcdefghijklmnopqrstuvwxyz")
        .env("SILICONFLOW_MODEL_ID", "Qwen/Qwen2.5-7B-Instruct")
        .args(["config", "--max-attempts", "5"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Qwen/Qwen2.5-7B-Instruct"))
        .stdout(predicate::str::contains("(env)"))
        .stdout(predicate::str::contains("(cli)"))
        .stdout(predicate::str::contains("Config file: <none>"))
        .stdout(predicate::str::contains("abcdefghijklmnop").not());
}

#[test]
fn test_config_file_is_discovered_from_parent_directory() {
    let dir = TempDir::new().unwrap();
    std::fs::create_dir_all(dir.path().join(".litdaily")).unwrap();
    std::fs::write(
        dir.path().join(".litdaily/config.toml"),
        "[ai]\nmodel = \"deepseek-ai/DeepSeek-V3\"\n\n[retry]\nmax_attempts = 4\n",
    )
    .unwrap();
    let nested = dir.path().join("a/b");
    std::fs::create_dir_all(&nested).unwrap();

    litdaily(&nested)
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("deepseek-ai/DeepSeek-V3"))
        .stdout(predicate::str::contains("(config)"))
        .stdout(predicate::str::contains("config.toml"));
}

#[test]
fn test_missing_explicit_config_file_fails() {
    let dir = TempDir::new().unwrap();
    litdaily(dir.path())
        .args(["config", "--config", "nope.toml"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("nope.toml"));
}

#[test]
fn test_show_unknown_date_exits_one() {
    let dir = TempDir::new().unwrap();
    litdaily(dir.path())
        .args(["show", "2025-01-01", "--db"])
        .arg(dir.path().join("content.db"))
        .assert()
        .code(1)
        .stderr(predicate::str::contains("No content stored for 2025-01-01"));
}

#[test]
fn test_show_rejects_malformed_date() {
    let dir = TempDir::new().unwrap();
    litdaily(dir.path())
        .args(["show", "2025-13-40"])
        .assert()
        .failure()
        .code(2);
}

fn completion(content: &str) -> String {
    serde_json::json!({
        "model": "Qwen/Qwen2.5-7B-Instruct",
        "choices": [{"message": {"role": "assistant", "content": content}}],
        "usage": {"prompt_tokens": 10, "completion_tokens": 20}
    })
    .to_string()
}

/// Provider endpoint answering each of the three prompts exactly once.
///
/// Returns the server (keep it alive for the test), its endpoint URL and the
/// mocks to assert on.
fn provider_stub() -> (ServerGuard, String, Vec<Mock>) {
    let mut server = mockito::Server::new();
    let replies = [
        (
            REVIEW_PROMPT,
            r#"{"review_title": "论《红楼梦》的悲剧意识", "review_content": "评论正文", "review_author": "林清"}"#,
        ),
        (
            CONCEPT_PROMPT,
            "```json\n{\"title\": \"意象\", \"content\": \"象外之象\"}\n```",
        ),
        (
            QUESTION_PROMPT,
            r#"{"title": "比较题", "content": "试比较李白与杜甫"}"#,
        ),
    ];

    let mocks = replies
        .into_iter()
        .map(|(prompt, content)| {
            server
                .mock("POST", "/v1/chat/completions")
                .match_header("authorization", "Bearer sk-test")
                .match_body(Matcher::PartialJson(serde_json::json!({
                    "messages": [{"role": "user", "content": prompt}]
                })))
                .with_status(200)
                .with_header("content-type", "application/json")
                .with_body(completion(content))
                .expect(1)
                .create()
        })
        .collect();

    let url = format!("{}/v1/chat/completions", server.url());
    (server, url, mocks)
}

#[test]
fn test_preview_json_against_stub_provider() {
    let dir = TempDir::new().unwrap();
    let (_server, url, mocks) = provider_stub();

    let output = litdaily(dir.path())
        .env("SILICONFLOW_API_KEY", "sk-test")
        .env("SILICONFLOW_MODEL_ID", "Qwen/Qwen2.5-7B-Instruct")
        .args(["preview", "--json", "--base-url", &url, "--timeout", "10"])
        .output()
        .unwrap();
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let pair: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(pair["today"]["review"]["title"], "论《红楼梦》的悲剧意识");
    assert_eq!(pair["today"]["review"]["author"], "林清");
    assert!(pair["today"]["review"].get("tag").is_none());
    assert_eq!(pair["today"]["concept"]["title"], "意象");
    assert_eq!(pair["today"]["question"]["content"], "试比较李白与杜甫");
    assert_eq!(pair["yesterday"]["review"]["title"], "昨日文学评论");
    assert!(!dir.path().join("litdaily.db").exists());
    for mock in mocks {
        mock.assert();
    }
}

#[test]
fn test_generate_then_show_round_trip_through_store() {
    let dir = TempDir::new().unwrap();
    let db = dir.path().join("data/content.db");
    let (_server, url, mocks) = provider_stub();

    litdaily(dir.path())
        .env("SILICONFLOW_API_KEY", "sk-test")
        .env("SILICONFLOW_MODEL_ID", "Qwen/Qwen2.5-7B-Instruct")
        .args(["generate", "--base-url", &url, "--timeout", "10", "--db"])
        .arg(&db)
        .assert()
        .success()
        .stdout(predicate::str::contains("Generated and stored content"));

    // second run is served from the store; no key, no provider needed
    litdaily(dir.path())
        .args(["generate", "--db"])
        .arg(&db)
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));
    for mock in &mocks {
        mock.assert();
    }

    let today = chrono::Utc::now().date_naive().to_string();
    litdaily(dir.path())
        .args(["show", &today, "--db"])
        .arg(&db)
        .assert()
        .success()
        .stdout(predicate::str::contains("【文学评论】论《红楼梦》的悲剧意识"))
        .stdout(predicate::str::contains("【文学概念】意象"))
        .stdout(predicate::str::contains("【考研题目】比较题"));
}
