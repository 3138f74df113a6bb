use std::path::PathBuf;

use clap::Parser;

use crate::config::DEFAULT_API_ADDRESS;

/// Command-line flags for the `ofactest` binary.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "ofactest",
    version,
    about = "Verify a deployed OFAC service: liveness, data freshness and search results"
)]
pub struct Cli {
    /// Moov API address
    #[arg(long, default_value = DEFAULT_API_ADDRESS)]
    pub address: String,

    /// Use local HTTP addresses
    #[arg(long)]
    pub local: bool,

    /// OAuth bearer token (required unless --local)
    #[arg(long, env = "OAUTH_TOKEN", hide_env_values = true)]
    pub oauth_token: Option<String>,

    /// Per-request timeout
    #[arg(long, default_value_t = 10)]
    pub timeout_seconds: u64,

    /// How long idle connections are kept open
    #[arg(long, default_value_t = 60)]
    pub idle_timeout_seconds: u64,

    /// Abort the whole run after this many seconds
    #[arg(long)]
    pub deadline_seconds: Option<u64>,

    /// Fail when the latest data refresh is older than this
    #[arg(long)]
    pub max_download_age_hours: Option<u64>,

    /// JSON file of search cases replacing the built-in fixtures
    #[arg(long)]
    pub search_cases: Option<PathBuf>,

    /// Results requested per search query
    #[arg(long, default_value_t = 5)]
    pub search_limit: u32,

    /// Keep going after a failure and report every failing check
    #[arg(long)]
    pub run_all: bool,
}
