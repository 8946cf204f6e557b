//! Message activity: logs, manual retries, test dispatch and API keys.
//!
//! [`MessageLogProvider`] and [`ApiKeyProvider`] are the transport seams;
//! [`ActivityService`] and [`ApiKeyService`] wrap them with logging.

mod dispatch;
mod keys;
mod logs;
mod service;

pub use dispatch::{DispatchReceipt, TestMessage};
pub use keys::ApiKey;
pub use logs::{
    DEFAULT_LOG_LIMIT, DeliveryAttempt, MAX_LOG_LIMIT, MessageDetails, MessageLogEntry,
    MessageStatus, clamp_log_limit,
};
pub use service::{ActivityService, ApiKeyService};

use crate::Result;

/// Core trait for message log operations.
///
/// A successful retry or send does not mean the message was delivered; the
/// returned receipt carries the status the backend reached.
#[async_trait::async_trait]
pub trait MessageLogProvider: Send + Sync {
    /// Lists the most recent log entries, newest first.
    ///
    /// `limit` is already clamped to `1..=MAX_LOG_LIMIT`.
    async fn list_logs(&self, limit: u32) -> Result<Vec<MessageLogEntry>>;

    /// Fetches the full detail of one message.
    async fn message_details(&self, message_id: &str) -> Result<MessageDetails>;

    /// Asks the backend for one more delivery attempt.
    async fn retry_message(&self, message_id: &str) -> Result<DispatchReceipt>;

    /// Sends a test message through a provider.
    async fn send(&self, message: &TestMessage) -> Result<DispatchReceipt>;
}

/// Core trait for API key listing.
#[async_trait::async_trait]
pub trait ApiKeyProvider: Send + Sync {
    /// Lists the keys known to the backend.
    async fn list_keys(&self) -> Result<Vec<ApiKey>>;
}
