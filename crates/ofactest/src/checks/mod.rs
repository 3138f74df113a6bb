//! The verification checks run against an OFAC service.
//!
//! Each check takes the shared client and context and reports independently:
//!
//! - [`LivenessCheck`] - the service answers `/ping`
//! - [`FreshnessCheck`] - the sanctions data was refreshed recently
//! - [`SearchCheck`] - fuzzy search returns the expected entities

mod freshness;
mod liveness;
mod search;

use async_trait::async_trait;
use ofactest_client::OfacClient;

use crate::context::CheckContext;
use crate::error::CheckError;

pub use freshness::{assess_downloads, format_elapsed, FreshnessCheck};
pub use liveness::LivenessCheck;
pub use search::{default_cases, evaluate, Expectation, SearchCase, SearchCheck};

/// A single verification step.
#[async_trait]
pub trait Check: Send + Sync {
    /// Name used in logs and reports.
    fn name(&self) -> &'static str;

    /// Run the check, returning a success message for the operator.
    async fn run(&self, client: &OfacClient, ctx: &CheckContext) -> Result<String, CheckError>;
}
