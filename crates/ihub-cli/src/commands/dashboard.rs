//! `ihub dashboard`

use anyhow::Context;
use clap::Args;
use ihub_core::activity::MAX_LOG_LIMIT;
use ihub_core::dashboard::DashboardStats;
use ihub_core::hub::Hub;

use super::logs::print_entries;
use super::{Output, or_none};

#[derive(Debug, Clone, Args)]
pub struct DashboardArgs {
    /// Number of log entries to aggregate, between 1 and 100.
    #[arg(long, short = 'n', default_value_t = MAX_LOG_LIMIT)]
    pub limit: u32,
}

impl DashboardArgs {
    pub async fn run(self, hub: &mut Hub, output: Output) -> anyhow::Result<()> {
        hub.refresh_providers()
            .await
            .context("failed to list providers")?;
        hub.refresh_logs(self.limit)
            .await
            .context("failed to list messages")?;

        let stats = hub.dashboard();
        if output.is_json() {
            return output.json(&stats);
        }
        print_stats(output, &stats)
    }
}

fn print_stats(output: Output, stats: &DashboardStats) -> anyhow::Result<()> {
    println!("Requests:          {}", stats.total_requests);
    println!(
        "Active providers:  {}/{} ({}%)",
        stats.active_providers, stats.total_providers, stats.active_share_percent
    );
    println!(
        "Delivered:         {} ({})",
        stats.delivered,
        stats.delivery_rate_display()
    );
    println!(
        "Avg response time: {}",
        or_none(stats.avg_response_time_ms.map(|ms| format!("{ms} ms")))
    );

    if !stats.provider_activity.is_empty() {
        println!();
        let rows = stats
            .provider_activity
            .iter()
            .map(|activity| {
                vec![
                    activity.code.to_string(),
                    activity.name.clone(),
                    activity.requests.to_string(),
                    if activity.active { "active" } else { "inactive" }.to_owned(),
                ]
            })
            .collect::<Vec<_>>();
        output.table(&["PROVIDER", "NAME", "REQUESTS", "STATE"], &rows);
    }

    if !stats.recent.is_empty() {
        println!();
        print_entries(output, &stats.recent)?;
    }
    Ok(())
}
