use async_trait::async_trait;
use ofactest_client::OfacClient;
use tracing::debug;

use super::Check;
use crate::context::CheckContext;
use crate::error::CheckError;

const OPERATION: &str = "ping";

/// Passes when `/ping` answers with a 2xx status.
#[derive(Debug, Clone, Copy, Default)]
pub struct LivenessCheck;

#[async_trait]
impl Check for LivenessCheck {
    fn name(&self) -> &'static str {
        "ping"
    }

    async fn run(&self, client: &OfacClient, ctx: &CheckContext) -> Result<String, CheckError> {
        debug!(base_url = %client.base_url(), "pinging service");
        ctx.run(OPERATION, client.ping())
            .await?
            .map_err(|e| CheckError::from_client(OPERATION, e))?;
        Ok("ping".to_string())
    }
}
