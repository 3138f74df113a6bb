//! ofactest - verify a deployed OFAC service.
//!
//! With no arguments this runs against the production API and needs an
//! `OAUTH_TOKEN` in the environment. `--local` targets a service on localhost.

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ofactest::{CheckContext, Cli, Harness, HarnessConfig};
use ofactest_client::OfacClient;

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,ofactest=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "Starting moov/ofactest");

    let config = match HarnessConfig::from_cli(&cli) {
        Ok(config) => config,
        Err(err) => {
            tracing::error!("[FAILURE] {err}");
            return ExitCode::FAILURE;
        }
    };

    tracing::info!(
        address = %config.base_url,
        timeout = ?config.request_timeout,
        max_download_age = ?config.max_download_age,
        search_cases = config.search_cases.len(),
        policy = ?config.failure_policy,
        "Harness configuration loaded"
    );

    let client = match OfacClient::with_options(&config.base_url, config.client_options()) {
        Ok(client) => client,
        Err(err) => {
            tracing::error!("[FAILURE] building HTTP client: {err}");
            return ExitCode::FAILURE;
        }
    };

    let (mut ctx, cancel) = CheckContext::new();
    if let Some(deadline) = config.deadline {
        ctx = ctx.with_timeout(deadline);
    }
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupt received, cancelling checks");
            cancel.cancel();
        }
    });

    let report = Harness::from_config(&config).run(&client, &ctx).await;

    if report.passed() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
