//! Harness configuration.

use std::path::{Path, PathBuf};
use std::time::Duration;

use ofactest_client::ClientOptions;

use crate::checks::{default_cases, SearchCase};
use crate::cli::Cli;
use crate::harness::FailurePolicy;

/// Production API address.
pub const DEFAULT_API_ADDRESS: &str = "https://api.moov.io";

/// Address of a locally running OFAC service.
pub const DEFAULT_LOCAL_ADDRESS: &str = "http://localhost:8084";

/// Path prefix of the OFAC API behind the production gateway.
const PRODUCTION_API_PREFIX: &str = "/v1/ofac";

/// Errors building a [`HarnessConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Remote runs need a bearer token.
    #[error("no OAuth token provided")]
    MissingToken,

    /// Search case file could not be read.
    #[error("failed to read search cases from {}: {source}", .path.display())]
    ReadCases {
        /// File that was read.
        path: PathBuf,
        /// I/O error.
        source: std::io::Error,
    },

    /// Search case file is not valid JSON.
    #[error("invalid search cases in {}: {source}", .path.display())]
    ParseCases {
        /// File that was parsed.
        path: PathBuf,
        /// Decoder error.
        source: serde_json::Error,
    },

    /// Search case file holds no cases.
    #[error("no search cases in {}", .0.display())]
    EmptyCases(PathBuf),

    /// Staleness bound does not fit in a duration.
    #[error("max download age of {0} hours is out of range")]
    DownloadAgeOutOfRange(u64),
}

/// Immutable settings for one harness run.
#[derive(Debug, Clone)]
pub struct HarnessConfig {
    /// Base URL of the OFAC API.
    pub base_url: String,

    /// User-Agent sent with every request.
    pub user_agent: String,

    /// OAuth bearer token.
    pub oauth_token: Option<String>,

    /// Per-request timeout.
    pub request_timeout: Duration,

    /// Idle connection timeout.
    pub idle_timeout: Duration,

    /// Overall run deadline.
    pub deadline: Option<Duration>,

    /// Staleness bound for the latest data refresh; `None` only rejects zero timestamps.
    pub max_download_age: Option<Duration>,

    /// Results requested per search query.
    pub search_limit: u32,

    /// Search correctness fixtures.
    pub search_cases: Vec<SearchCase>,

    /// What to do after a failed check.
    pub failure_policy: FailurePolicy,
}

impl HarnessConfig {
    /// Build the configuration from parsed command line arguments.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingToken`] for a remote run without a token,
    /// or an error loading the search case file.
    pub fn from_cli(cli: &Cli) -> Result<Self, ConfigError> {
        let oauth_token = cli.oauth_token.clone().filter(|t| !t.is_empty());
        if oauth_token.is_none() && !cli.local {
            return Err(ConfigError::MissingToken);
        }

        let search_cases = match &cli.search_cases {
            Some(path) => {
                let cases = load_search_cases(path)?;
                tracing::info!(path = %path.display(), count = cases.len(), "Loaded search cases from file");
                cases
            }
            None => default_cases(),
        };

        let max_download_age = match cli.max_download_age_hours {
            Some(hours) => Some(
                hours
                    .checked_mul(3600)
                    .map(Duration::from_secs)
                    .ok_or(ConfigError::DownloadAgeOutOfRange(hours))?,
            ),
            None => None,
        };

        Ok(Self {
            base_url: resolve_base_url(&cli.address, cli.local),
            oauth_token,
            request_timeout: Duration::from_secs(cli.timeout_seconds),
            idle_timeout: Duration::from_secs(cli.idle_timeout_seconds),
            deadline: cli.deadline_seconds.map(Duration::from_secs),
            max_download_age,
            search_limit: cli.search_limit,
            search_cases,
            failure_policy: if cli.run_all {
                FailurePolicy::RunAll
            } else {
                FailurePolicy::FailFast
            },
            ..Self::default()
        })
    }

    /// HTTP client options derived from this configuration.
    #[must_use]
    pub fn client_options(&self) -> ClientOptions {
        ClientOptions {
            timeout: self.request_timeout,
            idle_timeout: self.idle_timeout,
            user_agent: self.user_agent.clone(),
            bearer_token: self.oauth_token.clone(),
        }
    }
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_LOCAL_ADDRESS.into(),
            user_agent: format!("moov/ofactest:{}", env!("CARGO_PKG_VERSION")),
            oauth_token: None,
            request_timeout: Duration::from_secs(10),
            idle_timeout: Duration::from_secs(60),
            deadline: None,
            max_download_age: None,
            search_limit: 5,
            search_cases: default_cases(),
            failure_policy: FailurePolicy::FailFast,
        }
    }
}

/// Pick the API base URL.
///
/// An explicit address always wins. Otherwise local runs use
/// [`DEFAULT_LOCAL_ADDRESS`] and remote runs go through the production gateway.
#[must_use]
pub fn resolve_base_url(address: &str, local: bool) -> String {
    match (local, address == DEFAULT_API_ADDRESS) {
        (_, false) => address.to_string(),
        (true, true) => DEFAULT_LOCAL_ADDRESS.to_string(),
        (false, true) => format!("{address}{PRODUCTION_API_PREFIX}"),
    }
}

/// Load search cases from a JSON file.
///
/// # Errors
///
/// Returns an error if the file cannot be read, is not a JSON list of
/// cases, or is empty.
pub fn load_search_cases(path: &Path) -> Result<Vec<SearchCase>, ConfigError> {
    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadCases {
        path: path.to_path_buf(),
        source,
    })?;
    let cases: Vec<SearchCase> =
        serde_json::from_str(&contents).map_err(|source| ConfigError::ParseCases {
            path: path.to_path_buf(),
            source,
        })?;
    if cases.is_empty() {
        return Err(ConfigError::EmptyCases(path.to_path_buf()));
    }
    Ok(cases)
}
