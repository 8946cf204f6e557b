//! Log filter and format.

use clap::Args;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

/// Filter used when neither `--log-filter` nor `RUST_LOG` is set.
const DEFAULT_FILTER: &str = "info";

/// Logging options.
///
/// Logs are written to stderr so that command output on stdout stays clean.
#[derive(Debug, Clone, Default, Args)]
pub struct TelemetryConfig {
    /// Emit logs as JSON lines.
    #[arg(long, env = "IHUB_LOG_JSON")]
    pub log_json: bool,

    /// Log filter directives, e.g. `ihub_client=debug`. Overrides `RUST_LOG`.
    #[arg(long, env = "IHUB_LOG_FILTER")]
    pub log_filter: Option<String>,
}

impl TelemetryConfig {
    /// Installs the global tracing subscriber.
    ///
    /// # Errors
    ///
    /// Returns an error if the filter does not parse or a subscriber is
    /// already installed.
    pub fn init_tracing(&self) -> anyhow::Result<()> {
        let filter = self.env_filter()?;

        let result = if self.log_json {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().json().with_writer(std::io::stderr))
                .try_init()
        } else {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
                .try_init()
        };

        result.map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {e}"))
    }

    fn env_filter(&self) -> anyhow::Result<EnvFilter> {
        match &self.log_filter {
            Some(directives) => EnvFilter::try_new(directives)
                .map_err(|e| anyhow::anyhow!("Invalid log filter '{directives}': {e}")),
            None => EnvFilter::try_from_default_env()
                .or_else(|_| EnvFilter::try_new(DEFAULT_FILTER))
                .map_err(|e| anyhow::anyhow!("Failed to create env filter: {e}")),
        }
    }
}
