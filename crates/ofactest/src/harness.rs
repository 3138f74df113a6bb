//! Runs checks in order and collects their outcomes.

use std::time::{Duration, Instant};

use ofactest_client::OfacClient;
use tracing::{error, info, warn};

use crate::checks::{Check, FreshnessCheck, LivenessCheck, SearchCheck};
use crate::config::HarnessConfig;
use crate::context::CheckContext;
use crate::error::CheckError;

/// What to do after a check fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Stop at the first failure; later checks are skipped.
    #[default]
    FailFast,
    /// Run every check and report every failure.
    RunAll,
}

/// Result of running one check.
#[derive(Debug)]
pub struct CheckOutcome {
    /// Check name.
    pub check: &'static str,
    /// Wall time spent in the check.
    pub elapsed: Duration,
    /// Success message, or why it failed.
    pub result: Result<String, CheckError>,
}

impl CheckOutcome {
    /// Whether the check passed.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }

    /// HTTP status code of a protocol failure.
    #[must_use]
    pub fn status_code(&self) -> Option<u16> {
        self.result.as_ref().err().and_then(CheckError::status_code)
    }

    /// Operator-facing message for either outcome.
    #[must_use]
    pub fn message(&self) -> String {
        match &self.result {
            Ok(message) => message.clone(),
            Err(err) => err.to_string(),
        }
    }
}

/// Outcomes of a harness run, in execution order.
#[derive(Debug, Default)]
pub struct HarnessReport {
    /// Outcomes of the checks that ran.
    pub outcomes: Vec<CheckOutcome>,
    /// Checks that never ran because an earlier one failed or the run was aborted.
    pub skipped: Vec<&'static str>,
}

impl HarnessReport {
    /// True when every check ran and passed.
    #[must_use]
    pub fn passed(&self) -> bool {
        self.skipped.is_empty() && self.outcomes.iter().all(CheckOutcome::is_success)
    }

    /// Outcomes of failed checks.
    pub fn failures(&self) -> impl Iterator<Item = &CheckOutcome> {
        self.outcomes.iter().filter(|o| !o.is_success())
    }
}

/// Ordered set of checks plus the policy for handling failures.
pub struct Harness {
    checks: Vec<Box<dyn Check>>,
    policy: FailurePolicy,
}

impl std::fmt::Debug for Harness {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Harness")
            .field("checks", &self.check_names())
            .field("policy", &self.policy)
            .finish()
    }
}

impl Harness {
    /// Empty harness.
    #[must_use]
    pub fn new(policy: FailurePolicy) -> Self {
        Self {
            checks: Vec::new(),
            policy,
        }
    }

    /// Standard run: liveness, then freshness, then search correctness.
    #[must_use]
    pub fn from_config(config: &HarnessConfig) -> Self {
        Self::new(config.failure_policy)
            .with_check(LivenessCheck)
            .with_check(FreshnessCheck::new(config.max_download_age))
            .with_check(SearchCheck::new(
                config.search_cases.clone(),
                config.search_limit,
            ))
    }

    /// Append a check.
    #[must_use]
    pub fn with_check(mut self, check: impl Check + 'static) -> Self {
        self.checks.push(Box::new(check));
        self
    }

    /// Names of the configured checks, in order.
    #[must_use]
    pub fn check_names(&self) -> Vec<&'static str> {
        self.checks.iter().map(|c| c.name()).collect()
    }

    /// Run the checks in order. Never retries.
    pub async fn run(&self, client: &OfacClient, ctx: &CheckContext) -> HarnessReport {
        let mut report = HarnessReport::default();

        for (index, check) in self.checks.iter().enumerate() {
            let started = Instant::now();
            let result = check.run(client, ctx).await;
            let elapsed = started.elapsed();

            let stop = match &result {
                Ok(message) => {
                    info!(check = check.name(), elapsed = ?elapsed, "[SUCCESS] {message}");
                    false
                }
                Err(err) => {
                    error!(
                        check = check.name(),
                        kind = err.kind(),
                        status = ?err.status_code(),
                        elapsed = ?elapsed,
                        "[FAILURE] {}: {err}",
                        check.name()
                    );
                    err.is_abort() || self.policy == FailurePolicy::FailFast
                }
            };

            report.outcomes.push(CheckOutcome {
                check: check.name(),
                elapsed,
                result,
            });

            if stop {
                report.skipped = self.checks[index + 1..].iter().map(|c| c.name()).collect();
                if !report.skipped.is_empty() {
                    warn!(skipped = ?report.skipped, "remaining checks skipped");
                }
                break;
            }
        }

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SemanticError;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct Scripted {
        name: &'static str,
        fail: bool,
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl Check for Scripted {
        fn name(&self) -> &'static str {
            self.name
        }

        async fn run(&self, _: &OfacClient, _: &CheckContext) -> Result<String, CheckError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                Err(SemanticError::EmptyDownloads.into())
            } else {
                Ok(format!("{} ok", self.name))
            }
        }
    }

    fn harness(policy: FailurePolicy, fails: &[bool], calls: &Arc<AtomicUsize>) -> Harness {
        const NAMES: [&str; 3] = ["first", "second", "third"];
        fails
            .iter()
            .zip(NAMES)
            .fold(Harness::new(policy), |h, (&fail, name)| {
                h.with_check(Scripted {
                    name,
                    fail,
                    calls: Arc::clone(calls),
                })
            })
    }

    fn client() -> OfacClient {
        OfacClient::new("http://localhost:8084").unwrap()
    }

    #[tokio::test]
    async fn all_passing_checks_pass_the_run() {
        let calls = Arc::new(AtomicUsize::new(0));
        let report = harness(FailurePolicy::FailFast, &[false, false, false], &calls)
            .run(&client(), &CheckContext::background())
            .await;

        assert!(report.passed());
        assert_eq!(report.outcomes.len(), 3);
        assert_eq!(report.outcomes[1].message(), "second ok");
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn fail_fast_skips_remaining_checks() {
        let calls = Arc::new(AtomicUsize::new(0));
        let report = harness(FailurePolicy::FailFast, &[false, true, false], &calls)
            .run(&client(), &CheckContext::background())
            .await;

        assert!(!report.passed());
        assert_eq!(report.outcomes.len(), 2);
        assert_eq!(report.skipped, vec!["third"]);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn run_all_reports_every_failure() {
        let calls = Arc::new(AtomicUsize::new(0));
        let report = harness(FailurePolicy::RunAll, &[true, false, true], &calls)
            .run(&client(), &CheckContext::background())
            .await;

        assert!(!report.passed());
        assert!(report.skipped.is_empty());
        let failed: Vec<_> = report.failures().map(|o| o.check).collect();
        assert_eq!(failed, vec!["first", "third"]);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn standard_harness_orders_checks() {
        let harness = Harness::from_config(&HarnessConfig::default());
        assert_eq!(harness.check_names(), vec!["ping", "downloads", "search"]);
    }
}
