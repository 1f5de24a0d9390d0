use std::path::PathBuf;

/// Values supplied on the command line; `None` means "not given".
#[derive(Debug, Clone, Default)]
pub struct CliArgs {
    pub config_path: Option<PathBuf>,
    pub model: Option<String>,
    pub base_url: Option<String>,
    pub db_path: Option<PathBuf>,
    pub timeout_secs: Option<u64>,
    pub max_attempts: Option<u32>,
    pub verbose: Option<bool>,
}
