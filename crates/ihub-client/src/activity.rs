//! Message logs, retries and test dispatch over HTTP.
//!
//! This module implements the [`MessageLogProvider`] trait for [`HubClient`].

use ihub_core::Result;
use ihub_core::activity::{
    DispatchReceipt, MessageDetails, MessageLogEntry, MessageLogProvider, TestMessage,
};
use reqwest::Method;
use serde_json::json;

use crate::TRACING_TARGET_ACTIVITY;
use crate::client::HubClient;

#[async_trait::async_trait]
impl MessageLogProvider for HubClient {
    async fn list_logs(&self, limit: u32) -> Result<Vec<MessageLogEntry>> {
        let request = self
            .request(Method::GET, &self.endpoints().logs)
            .query(&[("limit", limit)]);
        let entries = self
            .execute("list_logs", request)
            .await?
            .into_list::<MessageLogEntry>("messages")?;

        tracing::debug!(
            target: TRACING_TARGET_ACTIVITY,
            limit,
            count = entries.len(),
            "Message log fetched"
        );

        Ok(entries)
    }

    async fn message_details(&self, message_id: &str) -> Result<MessageDetails> {
        let request = self
            .request(Method::GET, &self.endpoints().logs)
            .query(&[("message_id", message_id)]);
        self.execute("message_details", request)
            .await?
            .into_field("message")
    }

    async fn retry_message(&self, message_id: &str) -> Result<DispatchReceipt> {
        tracing::debug!(
            target: TRACING_TARGET_ACTIVITY,
            message_id,
            "Requesting manual retry"
        );

        let request = self
            .request(Method::POST, &self.endpoints().retry)
            .json(&json!({ "message_id": message_id }));
        self.execute("retry_message", request).await?.into_inner()
    }

    async fn send(&self, message: &TestMessage) -> Result<DispatchReceipt> {
        let request = self
            .request(Method::POST, &self.endpoints().send)
            .json(&message.to_body());
        self.execute("send_message", request).await?.into_inner()
    }
}
