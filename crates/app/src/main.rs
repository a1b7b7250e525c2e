//! Hello smoke-test runner.
//!
//! Runs the smoke cases against the Hello application in-process and
//! prints the report to stdout. Exits non-zero when any case fails.

use std::process::ExitCode;
use std::sync::Arc;

use hello_infrastructure::{RouterClient, SystemClock, render};
use hello_smoke::{RunnerSettings, smoke_suite};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    // Logs go to stderr; stdout carries the report
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let settings = RunnerSettings::from_env()?;
    tracing::info!(
        format = %settings.format,
        "Starting Hello smoke run v{}",
        env!("CARGO_PKG_VERSION")
    );
    let harness = smoke_suite(
        RouterClient::new(hello_server::app()),
        Arc::new(SystemClock::new()),
    )?
    .with_default_timeout(settings.default_timeout());

    let report = harness.run().await;
    print!("{}", render(settings.format, &report)?);

    Ok(if report.all_passed() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
