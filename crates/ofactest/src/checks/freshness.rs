use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use ofactest_client::{Download, OfacClient};
use tracing::debug;

use super::Check;
use crate::context::CheckContext;
use crate::error::{CheckError, SemanticError};

const OPERATION: &str = "download";

/// Tolerated clock difference between the harness and the service.
const CLOCK_SKEW_ALLOWANCE_SECS: i64 = 60;

/// Passes when the newest download record has a real timestamp, optionally
/// no older than `max_age`.
#[derive(Debug, Clone, Default)]
pub struct FreshnessCheck {
    max_age: Option<Duration>,
}

impl FreshnessCheck {
    /// Create a check; `None` disables the staleness bound.
    #[must_use]
    pub fn new(max_age: Option<Duration>) -> Self {
        Self { max_age }
    }
}

#[async_trait]
impl Check for FreshnessCheck {
    fn name(&self) -> &'static str {
        "downloads"
    }

    async fn run(&self, client: &OfacClient, ctx: &CheckContext) -> Result<String, CheckError> {
        // The service orders downloads newest first.
        let downloads = ctx
            .run(OPERATION, client.latest_downloads(1))
            .await?
            .map_err(|e| CheckError::from_client(OPERATION, e))?;

        let age = assess_downloads(&downloads, Utc::now(), self.max_age)?;
        debug!(age_secs = age.as_secs(), "latest download assessed");

        Ok(format!("last download was: {} ago", format_elapsed(age)))
    }
}

/// Judge the newest record and return its age truncated to whole seconds.
///
/// # Errors
///
/// Fails when the list is empty, the newest timestamp is zero or in the
/// future, or it is older than `max_age`.
pub fn assess_downloads(
    downloads: &[Download],
    now: DateTime<Utc>,
    max_age: Option<Duration>,
) -> Result<Duration, SemanticError> {
    let latest = downloads.first().ok_or(SemanticError::EmptyDownloads)?;
    let timestamp = latest.refreshed_at().ok_or(SemanticError::ZeroTimestamp)?;

    let elapsed = now.signed_duration_since(timestamp);
    if elapsed < -chrono::Duration::seconds(CLOCK_SKEW_ALLOWANCE_SECS) {
        return Err(SemanticError::FutureTimestamp { timestamp });
    }

    // Small negative ages from clock skew clamp to zero.
    let age = Duration::from_secs(elapsed.to_std().unwrap_or_default().as_secs());

    if let Some(limit) = max_age {
        if age > limit {
            return Err(SemanticError::StaleDownload { age, limit });
        }
    }
    Ok(age)
}

/// Format a duration as `26h3m4s`, `3m4s` or `4s`.
#[must_use]
pub fn format_elapsed(duration: Duration) -> String {
    let total = duration.as_secs();
    let (hours, minutes, seconds) = (total / 3600, (total % 3600) / 60, total % 60);

    if hours > 0 {
        format!("{hours}h{minutes}m{seconds}s")
    } else if minutes > 0 {
        format!("{minutes}m{seconds}s")
    } else {
        format!("{seconds}s")
    }
}
