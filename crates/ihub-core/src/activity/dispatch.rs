//! Test dispatch and retry receipts.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::MessageStatus;
use crate::de;
use crate::provider::ProviderCode;
use crate::{Error, Result};

/// A test message sent through one provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestMessage {
    /// Code of the provider to send through.
    pub provider: ProviderCode,
    pub recipient: String,
    pub message: String,
    /// Subject line, used by email providers only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
}

impl TestMessage {
    /// Creates a new test message.
    ///
    /// The provider code is normalized; an empty subject counts as none.
    ///
    /// # Errors
    ///
    /// Returns an invalid input error when the code normalizes to nothing or
    /// the recipient or message is blank.
    pub fn new(
        provider: &str,
        recipient: impl Into<String>,
        message: impl Into<String>,
        subject: Option<String>,
    ) -> Result<Self> {
        let provider = ProviderCode::new(provider)?;
        let recipient = recipient.into();
        let message = message.into();

        if recipient.trim().is_empty() {
            return Err(Error::invalid_input().with_message("recipient is empty"));
        }
        if message.trim().is_empty() {
            return Err(Error::invalid_input().with_message("message is empty"));
        }

        Ok(Self {
            provider,
            recipient,
            message,
            subject: subject.filter(|subject| !subject.trim().is_empty()),
        })
    }

    /// Builds the JSON body of a send request.
    pub fn to_body(&self) -> Map<String, Value> {
        let mut body = Map::new();
        body.insert("provider".into(), self.provider.as_str().into());
        body.insert("recipient".into(), self.recipient.as_str().into());
        body.insert("message".into(), self.message.as_str().into());
        if let Some(subject) = &self.subject {
            body.insert("subject".into(), subject.as_str().into());
        }
        body
    }
}

/// Backend reply to a send or retry request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchReceipt {
    /// Identifier of the message that was sent or retried.
    #[serde(default, deserialize_with = "de::identifier")]
    pub message_id: String,
    #[serde(default, deserialize_with = "de::or_default")]
    pub status: Option<MessageStatus>,
    /// Attempt count after this dispatch, when reported.
    #[serde(default)]
    pub attempts: Option<u32>,
    #[serde(default)]
    pub message: Option<String>,
}
