//! CLI configuration management.
//!
//! ```text
//! Cli
//! ├── client: ClientConfig       # Endpoints, API key, timeout, dialect
//! ├── telemetry: TelemetryConfig # Log filter and format
//! ├── json                       # Machine-readable output
//! └── command: Command           # What to do
//! ```
//!
//! Client options can be provided via CLI arguments or `IHUB_*` environment
//! variables. Use `--help` to see all available options.
//!
//! # Example
//!
//! ```bash
//! ihub --base-url https://hub.example.com/ --api-key ek_live_... providers list
//!
//! # Or via environment variables
//! IHUB_BASE_URL=https://hub.example.com/ IHUB_API_KEY=ek_live_... ihub providers list
//! ```

mod telemetry;

use std::process;

use clap::Parser;
use ihub_client::ClientConfig;
pub use telemetry::TelemetryConfig;

use crate::commands::{Command, Output};
use crate::{TRACING_TARGET_CONFIG, TRACING_TARGET_STARTUP};

/// Complete CLI configuration.
#[derive(Debug, Clone, Parser)]
#[command(name = "ihub")]
#[command(about = "Integration hub operator tool")]
#[command(version)]
pub struct Cli {
    /// Hub backend connection.
    #[clap(flatten)]
    pub client: ClientConfig,

    /// Log filter and format.
    #[clap(flatten)]
    pub telemetry: TelemetryConfig,

    /// Print results as JSON instead of tables.
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Loads environment variables from .env file (if enabled) and parses CLI arguments.
    ///
    /// The .env file is loaded first so that its values act as defaults for
    /// clap's `env` lookups.
    pub fn init() -> Self {
        Self::load_dotenv();
        Self::parse()
    }

    #[cfg(feature = "dotenv")]
    fn load_dotenv() {
        if let Err(err) = dotenvy::dotenv()
            && !err.not_found()
        {
            eprintln!("Warning: failed to load .env file: {err}");
        }
    }

    /// No-op when dotenv feature is disabled.
    #[cfg(not(feature = "dotenv"))]
    fn load_dotenv() {}

    /// Returns how command results are printed.
    pub fn output(&self) -> Output {
        Output::new(self.json)
    }

    /// Logs configuration at debug level (no sensitive information).
    pub fn log(&self) {
        tracing::debug!(
            target: TRACING_TARGET_STARTUP,
            version = env!("CARGO_PKG_VERSION"),
            pid = process::id(),
            arch = std::env::consts::ARCH,
            os = std::env::consts::OS,
            features = ?Self::enabled_features(),
            "Build information"
        );

        tracing::debug!(
            target: TRACING_TARGET_CONFIG,
            base_url = ?self.client.base_url.as_ref().map(|url| url.as_str()),
            dialect = %self.client.dialect,
            timeout_secs = self.client.effective_timeout().as_secs(),
            api_key_set = !self.client.api_key.is_empty(),
            "Client configuration"
        );
    }

    /// Returns a list of enabled compile-time features.
    fn enabled_features() -> Vec<&'static str> {
        [cfg!(feature = "dotenv").then_some("dotenv")]
            .into_iter()
            .flatten()
            .collect()
    }
}
