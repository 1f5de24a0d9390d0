//! litdaily - a literary review, concept and exam question, once a day
//!
//! Each calendar date gets one bundle of three AI-generated items. The first
//! request for a date generates the bundle (three concurrent prompts with
//! bounded retries) and stores it; every later request is served from the
//! store together with the previous day's bundle.
//!
//! litdaily can be used in two ways:
//! - **CLI**: `litdaily today`, `litdaily generate`, `litdaily preview`, ...
//! - **Library**: embed [`DailyContentService`] with any [`ContentStore`] and
//!   [`DailyGenerator`]
//!
//! # Quick Start (Library)
//!
//! ```rust,no_run
//! use litdaily::{CliArgs, Config, ConfiguredGenerator, DailyContentService, SqliteStore};
//!
//! # async fn example() -> Result<(), litdaily::LitDailyError> {
//! let config = Config::discover(&CliArgs::default())?;
//! let store = SqliteStore::open(&config.store.path)?;
//! let service = DailyContentService::new(store, ConfiguredGenerator::new(config));
//!
//! let pair = service.fetch_daily(chrono::Utc::now().date_naive()).await?;
//! println!("{}", pair.today.review.title);
//! # Ok(())
//! # }
//! ```
//!
//! # Crates
//!
//! | Crate | Concern |
//! |-------|---------|
//! | `litdaily-utils` | errors, exit codes, logging, redaction |
//! | `litdaily-config` | configuration discovery and credentials |
//! | `litdaily-llm` | chat-completion backend over HTTP |
//! | `litdaily-content` | prompts, extraction, generation, orchestration |
//! | `litdaily-store` | date-keyed store (memory, SQLite) |

pub mod cli;
pub mod render;
pub mod service;

pub use litdaily_config::{CliArgs, Config, Credentials};
pub use litdaily_content::{
    ContentGenerator, ContentItem, ContentOrchestrator, DailyBundle, DailyPair,
    GeneratedContent, GenerationSettings, PromptKind, RetryPolicy, ReviewContent,
};
pub use litdaily_store::{ContentStore, InsertOutcome, MemoryStore, SqliteStore};
pub use litdaily_utils::{
    ConfigError, ExitCode, LitDailyError, LlmError, StoreError, UserFriendlyError,
};
pub use service::{
    ConfiguredGenerator, DailyContentService, DailyGenerator, EnsureOutcome, pending_yesterday,
};
