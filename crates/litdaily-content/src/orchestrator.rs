//! Daily content orchestration
//!
//! Runs the generator for review, concept and question concurrently and
//! assembles the dated bundle. Persistence and the real "yesterday" lookup are
//! the caller's business; the pair returned here always carries a synthetic
//! yesterday.

use std::time::Instant;

use chrono::{NaiveDate, Utc};
use litdaily_config::{Config, Credentials};
use litdaily_llm::LlmError;
use tracing::info;

use crate::generator::ContentGenerator;
use crate::model::{ContentItem, DailyBundle, DailyPair, PromptKind, ReviewContent};

/// Fixed stand-in for the previous day, dated `today - 1`
#[must_use]
pub fn synthetic_yesterday(today: NaiveDate) -> DailyBundle {
    DailyBundle {
        date: today.pred_opt().unwrap_or(today),
        review: ReviewContent::new("昨日文学评论", "昨日评论内容"),
        concept: ContentItem::new("昨日文学概念", "昨日概念内容"),
        question: ContentItem::new("昨日考研题目", "昨日题目内容"),
    }
}

#[derive(Debug, Clone)]
pub struct ContentOrchestrator {
    generator: ContentGenerator,
}

impl ContentOrchestrator {
    #[must_use]
    pub fn new(generator: ContentGenerator) -> Self {
        Self { generator }
    }

    /// # Errors
    ///
    /// Returns `LlmError::Misconfiguration` if the backend cannot be constructed.
    pub fn from_config(config: &Config, credentials: &Credentials) -> Result<Self, LlmError> {
        Ok(Self::new(ContentGenerator::from_config(config, credentials)?))
    }

    /// Generate today's bundle, dated with the current UTC date.
    ///
    /// # Errors
    ///
    /// See [`Self::generate_daily_content_on`].
    pub async fn generate_daily_content(&self) -> Result<DailyPair, LlmError> {
        self.generate_daily_content_on(Utc::now().date_naive()).await
    }

    /// Generate the bundle for `date`.
    ///
    /// All three kinds are requested concurrently. The first terminal failure
    /// fails the whole call and the remaining requests are dropped; no partial
    /// bundle is ever returned.
    ///
    /// # Errors
    ///
    /// The generator's error for whichever kind failed first.
    pub async fn generate_daily_content_on(&self, date: NaiveDate) -> Result<DailyPair, LlmError> {
        info!(date = %date, "Generating daily content");
        let started = Instant::now();

        let (review, concept, question) = tokio::try_join!(
            self.generator.generate(PromptKind::Review),
            self.generator.generate(PromptKind::Concept),
            self.generator.generate(PromptKind::Question),
        )?;

        let today = DailyBundle {
            date,
            review: review.into_review(),
            concept: concept.into_item(),
            question: question.into_item(),
        };

        info!(
            date = %date,
            duration_ms = started.elapsed().as_millis() as u64,
            "Daily content generated"
        );

        Ok(DailyPair {
            yesterday: synthetic_yesterday(date),
            today,
        })
    }
}
