//! Daily literary content generation
//!
//! - [`prompts`]: the three fixed instructions sent to the model
//! - [`extraction`]: pulls a JSON payload out of free-form model text and
//!   validates it per prompt kind
//! - [`ContentGenerator`]: one prompt kind, one bounded retry loop
//! - [`ContentOrchestrator`]: all three kinds concurrently, assembled into a
//!   dated bundle

pub mod extraction;
mod generator;
mod model;
mod orchestrator;
pub mod prompts;

pub use generator::{ContentGenerator, GenerationSettings, RetryPolicy};
pub use model::{ContentItem, DailyBundle, DailyPair, GeneratedContent, PromptKind, ReviewContent};
pub use orchestrator::{ContentOrchestrator, synthetic_yesterday};
