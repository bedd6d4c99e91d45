#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod config;
mod exerciser;
mod naming;
mod scenario;
mod telemetry;

use std::process;

use anyhow::Context;

use crate::config::Cli;
use crate::exerciser::Exerciser;
use crate::scenario::Scenario;

// Tracing target constants
pub const TRACING_TARGET_STARTUP: &str = "bucketeer_cli::startup";
pub const TRACING_TARGET_SHUTDOWN: &str = "bucketeer_cli::shutdown";
pub const TRACING_TARGET_CONFIG: &str = "bucketeer_cli::config";
pub const TRACING_TARGET_EXERCISER: &str = "bucketeer_cli::exerciser";
pub const TRACING_TARGET_SCENARIO: &str = "bucketeer_cli::scenario";

#[tokio::main]
async fn main() {
    let Err(error) = run().await else {
        tracing::info!(
            target: TRACING_TARGET_SHUTDOWN,
            "application terminated successfully"
        );
        process::exit(0);
    };

    if tracing::enabled!(tracing::Level::ERROR) {
        tracing::error!(
            target: TRACING_TARGET_SHUTDOWN,
            error = %error,
            "application terminated with error"
        );
    } else {
        eprintln!("Error: {error:#}");
    }

    process::exit(1);
}

/// Main application entry point.
///
/// Only configuration and client construction can fail the run; step
/// failures are logged and counted in the summary.
async fn run() -> anyhow::Result<()> {
    let cli = Cli::init();

    telemetry::init_tracing()?;
    tracing::info!(
        target: TRACING_TARGET_STARTUP,
        version = env!("CARGO_PKG_VERSION"),
        "starting bucketeer"
    );
    cli.log();
    cli.validate()?;

    let client = cli
        .storage
        .build_client()
        .context("failed to create storage client")?;

    let exerciser = Exerciser::new(&client);
    Scenario::new(&exerciser, &cli.scenario).run_fresh().await;

    Ok(())
}
