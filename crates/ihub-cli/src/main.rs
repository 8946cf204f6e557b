#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod commands;
mod config;

use std::process;

use anyhow::Context;
use ihub_client::HubClient;
use ihub_core::hub::Hub;

use crate::config::Cli;

// Tracing target constants
pub const TRACING_TARGET_STARTUP: &str = "ihub_cli::startup";
pub const TRACING_TARGET_SHUTDOWN: &str = "ihub_cli::shutdown";
pub const TRACING_TARGET_CONFIG: &str = "ihub_cli::config";
pub const TRACING_TARGET_COMMAND: &str = "ihub_cli::command";

#[tokio::main]
async fn main() {
    let Err(error) = run().await else {
        tracing::debug!(
            target: TRACING_TARGET_SHUTDOWN,
            "command completed successfully"
        );
        process::exit(0);
    };

    if tracing::enabled!(tracing::Level::ERROR) {
        tracing::error!(
            target: TRACING_TARGET_SHUTDOWN,
            error = %format!("{error:#}"),
            "command failed"
        );
    } else {
        eprintln!("Error: {error:#}");
    }

    process::exit(1);
}

/// Main application entry point.
async fn run() -> anyhow::Result<()> {
    let cli = Cli::init();

    cli.telemetry
        .init_tracing()
        .context("failed to initialize tracing")?;
    cli.log();

    let client = HubClient::new(cli.client.clone()).context("invalid client configuration")?;
    let mut hub = Hub::new(client.into_services());

    let output = cli.output();
    cli.command.run(&mut hub, output).await
}
