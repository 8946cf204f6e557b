//! Activity and API key service wrappers.

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use super::{
    ApiKey, ApiKeyProvider, DispatchReceipt, MessageDetails, MessageLogEntry, MessageLogProvider,
    TestMessage, clamp_log_limit,
};
use crate::{Error, Result, TRACING_TARGET_ACTIVITY};

/// Message log service wrapper with observability.
#[derive(Clone)]
pub struct ActivityService {
    inner: Arc<dyn MessageLogProvider>,
}

impl fmt::Debug for ActivityService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActivityService").finish_non_exhaustive()
    }
}

impl ActivityService {
    /// Create a new activity service wrapper.
    pub fn new<P>(provider: P) -> Self
    where
        P: MessageLogProvider + 'static,
    {
        Self {
            inner: Arc::new(provider),
        }
    }

    /// Lists recent log entries, clamping `limit` to the accepted range.
    pub async fn list_logs(&self, limit: u32) -> Result<Vec<MessageLogEntry>> {
        let limit = clamp_log_limit(limit);
        let started_at = Instant::now();
        let result = self.inner.list_logs(limit).await;

        match &result {
            Ok(entries) => tracing::debug!(
                target: TRACING_TARGET_ACTIVITY,
                limit,
                count = entries.len(),
                elapsed_ms = started_at.elapsed().as_millis(),
                "Message log loaded"
            ),
            Err(error) => tracing::error!(
                target: TRACING_TARGET_ACTIVITY,
                limit,
                error = %error,
                "Failed to load message log"
            ),
        }

        result
    }

    /// Fetches the full detail of one message.
    pub async fn message_details(&self, message_id: &str) -> Result<MessageDetails> {
        let message_id = require_id(message_id)?;
        let result = self.inner.message_details(message_id).await;

        if let Err(error) = &result {
            tracing::error!(
                target: TRACING_TARGET_ACTIVITY,
                message_id,
                error = %error,
                "Failed to load message details"
            );
        }

        result
    }

    /// Requests one manual delivery attempt.
    pub async fn retry_message(&self, message_id: &str) -> Result<DispatchReceipt> {
        let message_id = require_id(message_id)?;
        tracing::debug!(
            target: TRACING_TARGET_ACTIVITY,
            message_id,
            "Retrying message"
        );

        let result = self.inner.retry_message(message_id).await;
        Self::log_receipt("retry", &result);
        result
    }

    /// Sends a test message.
    pub async fn send(&self, message: &TestMessage) -> Result<DispatchReceipt> {
        tracing::debug!(
            target: TRACING_TARGET_ACTIVITY,
            provider_code = %message.provider,
            has_subject = message.subject.is_some(),
            "Sending test message"
        );

        let result = self.inner.send(message).await;
        Self::log_receipt("send", &result);
        result
    }

    fn log_receipt(operation: &'static str, result: &Result<DispatchReceipt>) {
        match result {
            Ok(receipt) => tracing::info!(
                target: TRACING_TARGET_ACTIVITY,
                operation,
                message_id = %receipt.message_id,
                status = ?receipt.status,
                "Dispatch accepted"
            ),
            Err(error) => tracing::error!(
                target: TRACING_TARGET_ACTIVITY,
                operation,
                error = %error,
                "Dispatch failed"
            ),
        }
    }
}

fn require_id(message_id: &str) -> Result<&str> {
    let message_id = message_id.trim();
    if message_id.is_empty() {
        return Err(Error::invalid_input().with_message("message id is empty"));
    }
    Ok(message_id)
}

/// API key service wrapper with observability.
#[derive(Clone)]
pub struct ApiKeyService {
    inner: Arc<dyn ApiKeyProvider>,
}

impl fmt::Debug for ApiKeyService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiKeyService").finish_non_exhaustive()
    }
}

impl ApiKeyService {
    /// Create a new API key service wrapper.
    pub fn new<P>(provider: P) -> Self
    where
        P: ApiKeyProvider + 'static,
    {
        Self {
            inner: Arc::new(provider),
        }
    }

    /// Lists API keys.
    pub async fn list_keys(&self) -> Result<Vec<ApiKey>> {
        let result = self.inner.list_keys().await;

        match &result {
            Ok(keys) => tracing::debug!(
                target: TRACING_TARGET_ACTIVITY,
                count = keys.len(),
                "API keys listed"
            ),
            Err(error) => tracing::error!(
                target: TRACING_TARGET_ACTIVITY,
                error = %error,
                "Failed to list API keys"
            ),
        }

        result
    }
}
