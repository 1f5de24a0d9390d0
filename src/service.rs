//! Daily content service
//!
//! Composes the content store with a generator:
//!
//! - [`DailyContentService::fetch_daily`] serves `{today, yesterday}`, generating
//!   and persisting today's bundle on first request
//! - [`DailyContentService::ensure_today`] is the scheduled path: generate and
//!   persist only if nothing is stored yet
//!
//! The store's uniqueness on `date` decides races between concurrent callers;
//! whoever loses reads back the winner's bundle.

use std::time::Instant;

use async_trait::async_trait;
use chrono::NaiveDate;
use litdaily_config::Config;
use litdaily_content::{ContentOrchestrator, DailyBundle, DailyPair};
use litdaily_store::{ContentStore, InsertOutcome};
use litdaily_utils::LitDailyError;
use litdaily_utils::logging::log_operation_complete;
use tracing::{debug, info, warn};

pub const PENDING_TITLE: &str = "昨日内容待生成";
pub const PENDING_CONTENT: &str = "请等待AI生成昨日内容";

/// Shown as "yesterday" when nothing was stored for the previous day
#[must_use]
pub fn pending_yesterday(date: NaiveDate) -> DailyBundle {
    DailyBundle::uniform(date, PENDING_TITLE, PENDING_CONTENT)
}

/// Produces the bundle for a date
#[async_trait]
pub trait DailyGenerator: Send + Sync {
    async fn generate(&self, date: NaiveDate) -> Result<DailyBundle, LitDailyError>;
}

#[async_trait]
impl DailyGenerator for ContentOrchestrator {
    async fn generate(&self, date: NaiveDate) -> Result<DailyBundle, LitDailyError> {
        Ok(self.generate_daily_content_on(date).await?.today)
    }
}

/// Generator built from configuration on first use.
///
/// Credentials are only resolved when generation is actually needed, so
/// serving an already-stored day works without an API key.
#[derive(Debug, Clone)]
pub struct ConfiguredGenerator {
    config: Config,
}

impl ConfiguredGenerator {
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self { config }
    }
}

#[async_trait]
impl DailyGenerator for ConfiguredGenerator {
    async fn generate(&self, date: NaiveDate) -> Result<DailyBundle, LitDailyError> {
        let credentials = self.config.credentials()?;
        let orchestrator = ContentOrchestrator::from_config(&self.config, &credentials)?;
        orchestrator.generate(date).await
    }
}

/// Outcome of [`DailyContentService::ensure_today`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnsureOutcome {
    AlreadyExists(NaiveDate),
    Generated(NaiveDate),
}

pub struct DailyContentService<S, G> {
    store: S,
    generator: G,
}

impl<S, G> DailyContentService<S, G>
where
    S: ContentStore,
    G: DailyGenerator,
{
    pub fn new(store: S, generator: G) -> Self {
        Self { store, generator }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Today's bundle (generated if missing) plus yesterday's.
    ///
    /// # Errors
    ///
    /// - a store error while reading today's bundle
    /// - any generation error when today has to be generated
    ///
    /// Failing to persist a freshly generated bundle, or to read yesterday's,
    /// is logged and does not fail the call.
    pub async fn fetch_daily(&self, today: NaiveDate) -> Result<DailyPair, LitDailyError> {
        let started = Instant::now();

        let today_bundle = match self.store.find_by_date(today).await? {
            Some(bundle) => {
                debug!(date = %today, "Serving stored content");
                bundle
            }
            None => self.generate_and_store(today).await?,
        };
        let yesterday = self.yesterday_of(today).await;

        log_operation_complete("fetch_daily", &today.to_string(), started.elapsed());
        Ok(DailyPair {
            today: today_bundle,
            yesterday,
        })
    }

    /// Generate and store today's bundle unless one already exists.
    ///
    /// # Errors
    ///
    /// Store failures (read or write) and generation failures.
    pub async fn ensure_today(&self, today: NaiveDate) -> Result<EnsureOutcome, LitDailyError> {
        let started = Instant::now();

        if self.store.find_by_date(today).await?.is_some() {
            info!(date = %today, "Content already exists, skipping generation");
            return Ok(EnsureOutcome::AlreadyExists(today));
        }

        let bundle = self.generator.generate(today).await?;
        let outcome = match self.store.insert(&bundle).await? {
            InsertOutcome::Inserted => EnsureOutcome::Generated(today),
            InsertOutcome::Conflict => {
                info!(date = %today, "Content was stored concurrently, discarding ours");
                EnsureOutcome::AlreadyExists(today)
            }
        };

        log_operation_complete("ensure_today", &today.to_string(), started.elapsed());
        Ok(outcome)
    }

    async fn generate_and_store(&self, today: NaiveDate) -> Result<DailyBundle, LitDailyError> {
        info!(date = %today, "No stored content, generating");
        let bundle = self.generator.generate(today).await?;

        match self.store.insert(&bundle).await {
            Ok(InsertOutcome::Inserted) => {
                info!(date = %today, "Stored generated content");
                Ok(bundle)
            }
            Ok(InsertOutcome::Conflict) => match self.store.find_by_date(today).await {
                Ok(Some(stored)) => {
                    info!(date = %today, "Content was stored concurrently, serving stored copy");
                    Ok(stored)
                }
                Ok(None) => Ok(bundle),
                Err(err) => {
                    warn!(date = %today, error = %err, "Re-reading stored content failed");
                    Ok(bundle)
                }
            },
            Err(err) => {
                warn!(date = %today, error = %err, "Failed to store generated content");
                Ok(bundle)
            }
        }
    }

    async fn yesterday_of(&self, today: NaiveDate) -> DailyBundle {
        let Some(date) = today.pred_opt() else {
            return pending_yesterday(today);
        };

        match self.store.find_by_date(date).await {
            Ok(Some(bundle)) => bundle,
            Ok(None) => {
                debug!(date = %date, "No content stored for yesterday");
                pending_yesterday(date)
            }
            Err(err) => {
                warn!(date = %date, error = %err, "Failed to read yesterday's content");
                pending_yesterday(date)
            }
        }
    }
}
