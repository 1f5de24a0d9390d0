//! Configuration management for litdaily
//!
//! Hierarchical configuration with discovery and precedence:
//! CLI > environment > file > defaults. Files are TOML with `[ai]`, `[retry]`
//! and `[store]` sections.

mod cli_args;
mod credentials;
mod discovery;
mod model;
mod validation;

pub use cli_args::CliArgs;
pub use credentials::Credentials;
pub use model::*;
