//! CLI command implementations

use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use std::io::Write;

use crate::render;
use crate::service::{ConfiguredGenerator, DailyContentService, EnsureOutcome};
use crate::{Config, ContentOrchestrator, ContentStore, ExitCode, LitDailyError, SqliteStore};

fn open_store(config: &Config) -> Result<SqliteStore, LitDailyError> {
    Ok(SqliteStore::open(&config.store.path)?)
}

fn emit(text: &str) -> Result<()> {
    let mut stdout = std::io::stdout().lock();
    stdout
        .write_all(text.as_bytes())
        .and_then(|()| stdout.flush())
        .context("Failed to write to stdout")
}

/// `today`: serve today's and yesterday's content, generating today's if needed
pub async fn execute_today_command(config: &Config, json: bool) -> Result<ExitCode> {
    let service = DailyContentService::new(
        open_store(config)?,
        ConfiguredGenerator::new(config.clone()),
    );
    let pair = service.fetch_daily(Utc::now().date_naive()).await?;

    if json {
        emit(&render::json(&pair)?)?;
    } else {
        emit(&render::pair_text(&pair))?;
    }
    Ok(ExitCode::SUCCESS)
}

/// `generate`: make sure today's content is stored
pub async fn execute_generate_command(config: &Config) -> Result<ExitCode> {
    let service = DailyContentService::new(
        open_store(config)?,
        ConfiguredGenerator::new(config.clone()),
    );

    match service.ensure_today(Utc::now().date_naive()).await? {
        EnsureOutcome::Generated(date) => {
            emit(&format!("✓ Generated and stored content for {date}\n"))?;
        }
        EnsureOutcome::AlreadyExists(date) => {
            emit(&format!("Content for {date} already exists, nothing to do\n"))?;
        }
    }
    Ok(ExitCode::SUCCESS)
}

/// `preview`: run the generators without the store
pub async fn execute_preview_command(config: &Config, json: bool) -> Result<ExitCode> {
    let credentials = config.credentials().map_err(LitDailyError::from)?;
    let orchestrator =
        ContentOrchestrator::from_config(config, &credentials).map_err(LitDailyError::from)?;
    let pair = orchestrator
        .generate_daily_content()
        .await
        .map_err(LitDailyError::from)?;

    if json {
        emit(&render::json(&pair)?)?;
    } else {
        emit(&render::pair_text(&pair))?;
    }
    Ok(ExitCode::SUCCESS)
}

/// `show`: print a stored bundle; exit 1 when the date has none
pub async fn execute_show_command(config: &Config, date: NaiveDate, json: bool) -> Result<ExitCode> {
    let store = open_store(config)?;

    let Some(bundle) = store.find_by_date(date).await.map_err(LitDailyError::from)? else {
        eprintln!("No content stored for {date}");
        return Ok(ExitCode::INTERNAL);
    };

    if json {
        emit(&render::json(&bundle)?)?;
    } else {
        emit(&render::bundle_text("存档", &bundle))?;
    }
    Ok(ExitCode::SUCCESS)
}

/// `config`: effective configuration with sources
pub fn execute_config_command(config: &Config) -> Result<ExitCode> {
    let api_key = std::env::var(&config.ai.api_key_env)
        .ok()
        .filter(|k| !k.trim().is_empty());
    emit(&render::config_text(config, api_key.as_deref()))?;
    Ok(ExitCode::SUCCESS)
}
