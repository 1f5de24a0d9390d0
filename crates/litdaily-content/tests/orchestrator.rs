//! End-to-end behaviour of the daily orchestrator against a scripted backend

mod common;

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use common::*;
use litdaily_content::{
    ContentGenerator, ContentItem, ContentOrchestrator, ReviewContent, synthetic_yesterday,
};
use litdaily_llm::LlmError;

fn orchestrator(backend: &Arc<ScriptedBackend>) -> ContentOrchestrator {
    ContentOrchestrator::new(ContentGenerator::new(backend.clone(), settings(), immediate(3)))
}

fn all_succeed() -> Arc<ScriptedBackend> {
    Arc::new(
        ScriptedBackend::new()
            .script("review", vec![review_reply()])
            .script("concept", vec![concept_reply()])
            .script("question", vec![question_reply()]),
    )
}

#[tokio::test]
async fn test_three_successes_produce_bundle_dated_today_utc() {
    let backend = all_succeed();

    let before = Utc::now().date_naive();
    let pair = orchestrator(&backend).generate_daily_content().await.unwrap();
    let after = Utc::now().date_naive();

    assert!(pair.today.date == before || pair.today.date == after);
    assert_eq!(pair.today.review.title, "论《红楼梦》的悲剧意识");
    assert_eq!(pair.today.concept, ContentItem::new("意象", "意象是寓意于象的艺术形象。"));
    assert_eq!(pair.today.question.title, "论鲁迅小说的启蒙主题");

    assert_eq!(pair.yesterday, synthetic_yesterday(pair.today.date));
    assert_eq!(
        pair.yesterday.review,
        ReviewContent::new("昨日文学评论", "昨日评论内容")
    );
    assert_eq!(
        pair.yesterday.concept,
        ContentItem::new("昨日文学概念", "昨日概念内容")
    );
    assert_eq!(
        pair.yesterday.question,
        ContentItem::new("昨日考研题目", "昨日题目内容")
    );
    assert_eq!(backend.total_calls(), 3);
}

#[tokio::test]
async fn test_explicit_date_is_stamped_and_serialized_iso() {
    let backend = all_succeed();
    let date = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();

    let pair = orchestrator(&backend)
        .generate_daily_content_on(date)
        .await
        .unwrap();

    assert_eq!(pair.today.date, date);
    assert_eq!(pair.yesterday.date, NaiveDate::from_ymd_opt(2024, 12, 31).unwrap());

    let json = serde_json::to_value(&pair).unwrap();
    assert_eq!(json["today"]["date"], "2025-01-01");
    assert_eq!(json["yesterday"]["date"], "2024-12-31");
    assert_eq!(json["today"]["review"]["author"], "林清");
    assert!(json["yesterday"]["review"].get("author").is_none());
}

#[tokio::test]
async fn test_terminal_concept_failure_fails_whole_bundle() {
    let backend = Arc::new(
        ScriptedBackend::new()
            .script("review", vec![review_reply()])
            .script(
                "concept",
                vec![Step::Fail(LlmError::Unauthorized("Invalid token".to_string()))],
            )
            .script("question", vec![question_reply()]),
    );

    let result = orchestrator(&backend).generate_daily_content().await;

    assert_eq!(
        result.unwrap_err(),
        LlmError::Unauthorized("Invalid token".to_string())
    );
    assert_eq!(backend.calls_for("concept"), 1);
}

#[tokio::test]
async fn test_retry_in_one_kind_does_not_disturb_the_others() {
    let backend = Arc::new(
        ScriptedBackend::new()
            .script("review", vec![review_reply()])
            .script(
                "concept",
                vec![
                    Step::Fail(LlmError::Unavailable("busy".to_string())),
                    Step::Reply("not json at all".to_string()),
                    concept_reply(),
                ],
            )
            .script("question", vec![question_reply()]),
    );

    let pair = orchestrator(&backend).generate_daily_content().await.unwrap();

    assert_eq!(pair.today.concept.title, "意象");
    assert_eq!(backend.calls_for("review"), 1);
    assert_eq!(backend.calls_for("concept"), 3);
    assert_eq!(backend.calls_for("question"), 1);
}

#[tokio::test(start_paused = true)]
async fn test_failure_is_reported_without_waiting_for_hung_siblings() {
    let backend = Arc::new(
        ScriptedBackend::new()
            .script("review", vec![Step::Hang])
            .script(
                "concept",
                vec![Step::Fail(LlmError::NotFound("no such model".to_string()))],
            )
            .script("question", vec![Step::Hang]),
    );

    let started = tokio::time::Instant::now();
    let err = orchestrator(&backend).generate_daily_content().await.unwrap_err();

    assert!(matches!(err, LlmError::NotFound(_)));
    assert!(started.elapsed() < std::time::Duration::from_secs(60));
}
