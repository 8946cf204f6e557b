//! Dashboard aggregation over providers and message logs.

use serde::{Deserialize, Serialize};

use crate::activity::{MessageLogEntry, MessageStatus};
use crate::provider::{ProviderCode, ProviderIcon, ProviderRecord};

/// Number of log entries shown as recent activity.
pub const RECENT_LOG_COUNT: usize = 5;

/// Request count and state of one provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderActivity {
    pub code: ProviderCode,
    pub name: String,
    pub icon: ProviderIcon,
    /// Log entries handled by this provider.
    pub requests: usize,
    pub active: bool,
}

/// Summary figures shown on the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardStats {
    /// Number of log entries.
    pub total_requests: usize,
    pub active_providers: usize,
    pub total_providers: usize,
    /// Share of active providers, rounded; 0 without providers.
    pub active_share_percent: u32,
    /// Number of log entries with status `delivered`.
    pub delivered: usize,
    /// Delivered share of all log entries; 0.0 without entries.
    pub delivery_rate_percent: f64,
    /// Rounded mean response time, absent without samples.
    ///
    /// Zero and non-finite times are not samples; negative ones are.
    pub avg_response_time_ms: Option<i64>,
    /// Number of entries that carried a response time.
    pub response_samples: usize,
    pub provider_activity: Vec<ProviderActivity>,
    pub recent: Vec<MessageLogEntry>,
}

impl DashboardStats {
    /// Aggregates the given providers and log entries.
    ///
    /// Log entries are taken in backend order, newest first.
    pub fn compute(providers: &[ProviderRecord], logs: &[MessageLogEntry]) -> Self {
        let total_requests = logs.len();
        let total_providers = providers.len();
        let active_providers = providers.iter().filter(|p| p.is_active()).count();

        let delivered = logs
            .iter()
            .filter(|entry| entry.status == MessageStatus::Delivered)
            .count();

        let samples = logs
            .iter()
            .filter_map(|entry| entry.response_time_ms)
            .filter(|ms| ms.is_finite() && *ms != 0.0)
            .collect::<Vec<_>>();
        let avg_response_time_ms = (!samples.is_empty())
            .then(|| (samples.iter().sum::<f64>() / samples.len() as f64).round() as i64);

        let provider_activity = providers
            .iter()
            .map(|provider| ProviderActivity {
                code: provider.code.clone(),
                name: provider.name.clone(),
                icon: provider.icon,
                requests: logs
                    .iter()
                    .filter(|entry| entry.provider == provider.code.as_str())
                    .count(),
                active: provider.is_active(),
            })
            .collect();

        Self {
            total_requests,
            active_providers,
            total_providers,
            active_share_percent: percent(active_providers, total_providers).round() as u32,
            delivered,
            delivery_rate_percent: percent(delivered, total_requests),
            avg_response_time_ms,
            response_samples: samples.len(),
            provider_activity,
            recent: logs.iter().take(RECENT_LOG_COUNT).cloned().collect(),
        }
    }

    /// Formats the delivery rate with one decimal, as displayed.
    pub fn delivery_rate_display(&self) -> String {
        format!("{:.1}%", self.delivery_rate_percent)
    }
}

fn percent(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 / total as f64 * 100.0
    }
}
