//! OFAC service verification harness.
//!
//! Exercises a deployed OFAC sanctions screening service through its public
//! API and reports whether it is healthy:
//!
//! 1. **Liveness** - `/ping` answers with a 2xx status
//! 2. **Freshness** - the newest `/downloads` record has a real, recent timestamp
//! 3. **Search correctness** - `/search` returns known entities above a score
//!    threshold and no strong false positives
//!
//! Checks run in that order. By default the run stops at the first failure;
//! [`FailurePolicy::RunAll`] reports every failure instead.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod checks;
pub mod cli;
pub mod config;
pub mod context;
pub mod error;
pub mod harness;

pub use checks::{Check, Expectation, FreshnessCheck, LivenessCheck, SearchCase, SearchCheck};
pub use cli::Cli;
pub use config::{ConfigError, HarnessConfig};
pub use context::{CancelHandle, CheckContext};
pub use error::{CheckError, SemanticError};
pub use harness::{CheckOutcome, FailurePolicy, Harness, HarnessReport};
