//! CLI argument definitions and parsing structures

use chrono::NaiveDate;
use clap::{CommandFactory, Parser, Subcommand};
use std::path::PathBuf;

use crate::CliArgs;

/// litdaily - a literary review, concept and exam question, once a day
#[derive(Parser, Debug)]
#[command(name = "litdaily")]
#[command(about = "Daily literary review, concept and exam question, generated once per day and cached")]
#[command(long_about = r#"
litdaily asks an OpenAI-compatible chat-completion endpoint (SiliconFlow by
default) for three pieces of content each day: a review of a classic work, an
explanation of a literary concept, and a graduate-entrance exam question. The
result is stored per calendar date so every later request for that day is
served from the store.

EXAMPLES:
  # Show today's and yesterday's content, generating today's if needed
  litdaily today

  # Scheduled job: make sure today's content exists
  litdaily generate

  # Generate without touching the store
  litdaily preview --json

  # Print what was stored for a given date
  litdaily show 2025-05-20

CONFIGURATION:
  Precedence: CLI flags > environment > config file > defaults
  The config file is discovered by searching upward from CWD for .litdaily/config.toml
  The API key is read from $SILICONFLOW_API_KEY (see [ai] api_key_env)
  The model id is read from $SILICONFLOW_MODEL_ID, [ai] model, or --model
"#)]
#[command(version)]
pub struct Cli {
    /// Path to configuration file (overrides discovery)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Model identifier sent to the provider
    #[arg(long, global = true)]
    pub model: Option<String>,

    /// Chat-completions endpoint URL
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Path to the SQLite content database
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Per-request timeout in seconds (default: 60)
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    /// Attempts per prompt before giving up (default: 2)
    #[arg(long, global = true)]
    pub max_attempts: Option<u32>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show today's and yesterday's content, generating today's if missing
    Today {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Generate and store today's content unless it already exists
    Generate,

    /// Generate content without reading or writing the store
    Preview {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the content stored for a date (YYYY-MM-DD)
    Show {
        date: NaiveDate,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the effective configuration and where each value came from
    Config,
}

impl Cli {
    /// Overrides for configuration discovery
    #[must_use]
    pub fn to_cli_args(&self) -> CliArgs {
        CliArgs {
            config_path: self.config.clone(),
            model: self.model.clone(),
            base_url: self.base_url.clone(),
            db_path: self.db.clone(),
            timeout_secs: self.timeout,
            max_attempts: self.max_attempts,
            verbose: self.verbose.then_some(true),
        }
    }

    /// Label used in logs and error reports
    #[must_use]
    pub fn operation(&self) -> &'static str {
        match self.command {
            Commands::Today { .. } => "today",
            Commands::Generate => "generate",
            Commands::Preview { .. } => "preview",
            Commands::Show { .. } => "show",
            Commands::Config => "config",
        }
    }
}

/// Build the clap command, for completions and tests
#[must_use]
pub fn build_cli() -> clap::Command {
    Cli::command()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_consistent() {
        build_cli().debug_assert();
    }

    #[test]
    fn test_global_flags_map_to_cli_args() {
        let cli = Cli::try_parse_from([
            "litdaily",
            "today",
            "--model",
            "deepseek-ai/DeepSeek-V3",
            "--db",
            "/tmp/x.db",
            "--timeout",
            "30",
            "--max-attempts",
            "2",
        ])
        .unwrap();
        let args = cli.to_cli_args();

        assert_eq!(args.model.as_deref(), Some("deepseek-ai/DeepSeek-V3"));
        assert_eq!(args.db_path, Some(PathBuf::from("/tmp/x.db")));
        assert_eq!(args.timeout_secs, Some(30));
        assert_eq!(args.max_attempts, Some(2));
        assert_eq!(args.verbose, None);
        assert_eq!(cli.operation(), "today");
    }

    #[test]
    fn test_show_parses_iso_date() {
        let cli = Cli::try_parse_from(["litdaily", "show", "2025-05-20", "--json"]).unwrap();
        match cli.command {
            Commands::Show { date, json } => {
                assert_eq!(date, NaiveDate::from_ymd_opt(2025, 5, 20).unwrap());
                assert!(json);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_show_rejects_bad_date() {
        assert!(Cli::try_parse_from(["litdaily", "show", "20-05-2025"]).is_err());
    }
}
