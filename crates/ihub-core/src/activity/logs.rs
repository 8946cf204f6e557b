//! Message log entries and delivery details.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use strum::{AsRefStr, Display, EnumString, IntoStaticStr};

use crate::de;

/// Number of log entries fetched when no limit is given.
pub const DEFAULT_LOG_LIMIT: u32 = 50;

/// Largest number of log entries a single request may ask for.
pub const MAX_LOG_LIMIT: u32 = 100;

/// Clamps a requested log limit to `1..=MAX_LOG_LIMIT`.
pub const fn clamp_log_limit(limit: u32) -> u32 {
    if limit == 0 {
        1
    } else if limit > MAX_LOG_LIMIT {
        MAX_LOG_LIMIT
    } else {
        limit
    }
}

/// Delivery state of a message.
///
/// Statuses the backend reports outside this set, `null` and non-string
/// values included, are kept as [`MessageStatus::Unknown`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[derive(Serialize, Deserialize)]
#[derive(AsRefStr, Display, EnumString, IntoStaticStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum MessageStatus {
    Delivered,
    Failed,
    Pending,
    Sent,
    Retrying,
    #[default]
    #[serde(other)]
    Unknown,
}

impl MessageStatus {
    /// Returns whether the message reached its recipient.
    pub const fn is_delivered(self) -> bool {
        matches!(self, Self::Delivered)
    }

    /// Returns whether a manual retry makes sense for this status.
    pub const fn is_retryable(self) -> bool {
        !matches!(self, Self::Delivered)
    }
}

/// One row of the message log.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MessageLogEntry {
    /// Backend identifier of the message.
    #[serde(default, deserialize_with = "de::identifier")]
    pub message_id: String,
    /// Code of the provider that handled the message.
    #[serde(default, deserialize_with = "de::string")]
    pub provider: String,
    #[serde(default, deserialize_with = "de::string")]
    pub recipient: String,
    #[serde(default, deserialize_with = "de::or_default")]
    pub status: MessageStatus,
    #[serde(default, deserialize_with = "de::count")]
    pub attempts: u32,
    #[serde(default, deserialize_with = "de::count")]
    pub max_attempts: u32,
    /// Provider response time of the last attempt, in milliseconds.
    #[serde(default, alias = "response_time", deserialize_with = "de::number")]
    pub response_time_ms: Option<f64>,
    #[serde(default, deserialize_with = "de::timestamp")]
    pub created_at: Option<Timestamp>,
}

/// One delivery attempt of a message.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeliveryAttempt {
    #[serde(default, deserialize_with = "de::count")]
    pub attempt_number: u32,
    #[serde(default, deserialize_with = "de::string")]
    pub status: String,
    /// HTTP status the provider answered with, if it answered at all.
    #[serde(default)]
    pub response_code: Option<u16>,
    #[serde(default, deserialize_with = "de::string")]
    pub response_body: String,
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(default, deserialize_with = "de::number")]
    pub duration_ms: Option<f64>,
    #[serde(default, alias = "created_at", deserialize_with = "de::timestamp")]
    pub attempted_at: Option<Timestamp>,
}

/// Full detail of a single message.
///
/// Keys the backend adds beyond the known ones are kept in
/// [`MessageDetails::extra`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MessageDetails {
    #[serde(flatten)]
    pub entry: MessageLogEntry,
    /// Text that was sent.
    #[serde(default, deserialize_with = "de::string")]
    pub message_text: String,
    #[serde(default, alias = "attempts_log")]
    pub delivery_attempts: Vec<DeliveryAttempt>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn limit_is_clamped() {
        assert_eq!(clamp_log_limit(0), 1);
        assert_eq!(clamp_log_limit(DEFAULT_LOG_LIMIT), 50);
        assert_eq!(clamp_log_limit(500), MAX_LOG_LIMIT);
    }

    #[test]
    fn entry_from_backend_row() {
        let entry: MessageLogEntry = serde_json::from_value(json!({
            "message_id": "msg_abc123def456",
            "recipient": "+79991234567",
            "provider": "ek_whatsapp",
            "status": "delivered",
            "attempts": 1,
            "max_attempts": 3,
            "response_time": 245,
            "created_at": "2024-05-01T10:00:00.123456",
        }))
        .unwrap();

        assert_eq!(entry.message_id, "msg_abc123def456");
        assert!(entry.status.is_delivered());
        assert_eq!(entry.max_attempts, 3);
        assert_eq!(entry.response_time_ms, Some(245.0));
        assert!(entry.created_at.is_some());
    }

    #[test]
    fn unknown_status_is_preserved_as_unknown() {
        let entry: MessageLogEntry = serde_json::from_value(json!({
            "message_id": 7,
            "status": "bounced",
            "attempts": null,
        }))
        .unwrap();

        assert_eq!(entry.message_id, "7");
        assert_eq!(entry.status, MessageStatus::Unknown);
        assert_eq!(entry.attempts, 0);
        assert_eq!(entry.response_time_ms, None);
    }

    #[test]
    fn malformed_status_keeps_the_rest_of_the_list() {
        let entries: Vec<MessageLogEntry> = serde_json::from_value(json!([
            { "message_id": "m1", "status": "delivered" },
            { "message_id": "m2", "status": null },
            { "message_id": "m3", "status": { "code": 2 } },
        ]))
        .unwrap();

        let statuses = entries.iter().map(|entry| entry.status).collect::<Vec<_>>();
        assert_eq!(
            statuses,
            [MessageStatus::Delivered, MessageStatus::Unknown, MessageStatus::Unknown]
        );
    }

    #[test]
    fn details_keep_unknown_keys() {
        let details: MessageDetails = serde_json::from_value(json!({
            "message_id": "msg_1",
            "provider": "ek_sms",
            "status": "failed",
            "message_text": "hello",
            "last_error": "Provider returned status 502",
            "delivery_attempts": [
                {
                    "attempt_number": 1,
                    "status": "failed",
                    "response_code": 502,
                    "response_body": "",
                    "created_at": "2024-05-01T10:00:00Z",
                },
            ],
        }))
        .unwrap();

        assert_eq!(details.entry.status, MessageStatus::Failed);
        assert_eq!(details.message_text, "hello");
        assert_eq!(details.delivery_attempts.len(), 1);
        assert_eq!(details.delivery_attempts[0].response_code, Some(502));
        assert!(details.delivery_attempts[0].attempted_at.is_some());
        assert_eq!(details.extra["last_error"], "Provider returned status 502");
    }
}
