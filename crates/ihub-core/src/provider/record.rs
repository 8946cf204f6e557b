//! Normalized provider records.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum::{AsRefStr, Display, EnumString, IntoStaticStr};

use super::{ProviderCode, ProviderType};
use crate::TRACING_TARGET_DIRECTORY;
use crate::de::parse_timestamp;
use crate::directory::RawProvider;

/// Connection state of a provider.
///
/// Closed: values the registry reports outside this set are read as
/// [`ConnectionStatus::NotConfigured`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[derive(Serialize, Deserialize)]
#[derive(AsRefStr, Display, EnumString, IntoStaticStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ConnectionStatus {
    #[default]
    NotConfigured,
    Configured,
    Working,
    Error,
}

impl ConnectionStatus {
    /// Maps a raw status onto the closed set.
    pub fn from_wire(value: Option<&str>) -> Self {
        value.and_then(|v| v.parse().ok()).unwrap_or_default()
    }

    /// Returns whether the provider counts as active on the dashboard.
    pub const fn is_active(self) -> bool {
        matches!(self, Self::Working | Self::Configured)
    }
}

/// Icon shown next to a provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[derive(Serialize, Deserialize)]
#[derive(AsRefStr, Display, EnumString, IntoStaticStr)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum ProviderIcon {
    Mail,
    Bell,
    Phone,
    Send,
    MessageSquare,
    MessageCircle,
    Plug,
}

impl ProviderIcon {
    /// Picks the icon for a provider, first match wins.
    ///
    /// The explicit type decides for Postbox and push types; otherwise the
    /// code is searched for well-known channel names.
    pub fn select(provider_type: ProviderType, code: &ProviderCode) -> Self {
        match provider_type {
            ProviderType::YandexPostbox => return Self::Mail,
            ProviderType::Fcm | ProviderType::Apns => return Self::Bell,
            _ => {}
        }

        const BY_CODE: &[(&str, ProviderIcon)] = &[
            ("whatsapp", ProviderIcon::Phone),
            ("telegram", ProviderIcon::Send),
            ("sms", ProviderIcon::MessageSquare),
            ("email", ProviderIcon::Mail),
            ("push", ProviderIcon::Bell),
            ("wappi", ProviderIcon::MessageCircle),
            ("max", ProviderIcon::MessageCircle),
        ];

        BY_CODE
            .iter()
            .find(|(needle, _)| code.contains(needle))
            .map_or(Self::Plug, |(_, icon)| *icon)
    }
}

/// A configured provider connection as held locally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderRecord {
    /// Stable code, unique within the directory.
    pub code: ProviderCode,
    /// Human-readable name.
    pub name: String,
    /// Provider type.
    pub provider_type: ProviderType,
    /// Icon derived from type and code.
    pub icon: ProviderIcon,
    /// Connection state.
    pub connection_status: ConnectionStatus,
    /// True iff the registry reports a non-empty configuration.
    pub has_stored_config: bool,
    /// Time of the last delivery attempt through this provider.
    pub last_attempt_at: Option<Timestamp>,
}

impl ProviderRecord {
    /// Normalizes a raw registry entry.
    pub fn from_raw(raw: RawProvider) -> Self {
        let code = ProviderCode::from_wire(raw.provider_code);
        let provider_type = raw
            .provider_type
            .as_deref()
            .map_or(ProviderType::Custom, ProviderType::from_wire);
        let icon = ProviderIcon::select(provider_type, &code);
        let last_attempt_at = raw.last_attempt_at.as_deref().and_then(|value| {
            let parsed = parse_timestamp(value);
            if parsed.is_none() {
                tracing::debug!(
                    target: TRACING_TARGET_DIRECTORY,
                    provider_code = %code,
                    value,
                    "Ignoring unparseable last_attempt_at"
                );
            }
            parsed
        });

        Self {
            name: raw.provider_name.unwrap_or_else(|| code.to_string()),
            icon,
            provider_type,
            connection_status: ConnectionStatus::from_wire(raw.connection_status.as_deref()),
            has_stored_config: has_stored_config(raw.config.as_ref()),
            last_attempt_at,
            code,
        }
    }

    /// Returns whether the provider counts as active.
    pub fn is_active(&self) -> bool {
        self.connection_status.is_active()
    }
}

/// Returns whether a raw `config` value holds anything.
///
/// Objects, arrays and strings count when non-empty; `null`, booleans and
/// numbers never do.
fn has_stored_config(config: Option<&Value>) -> bool {
    match config {
        Some(Value::Object(map)) => !map.is_empty(),
        Some(Value::Array(items)) => !items.is_empty(),
        Some(Value::String(text)) => !text.is_empty(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn raw(value: Value) -> RawProvider {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn unknown_status_is_coerced() {
        let record = ProviderRecord::from_raw(raw(json!({
            "provider_code": "ek_wa",
            "provider_name": "WhatsApp",
            "provider_type": "whatsapp_business",
            "connection_status": "bogus",
        })));
        assert_eq!(record.connection_status, ConnectionStatus::NotConfigured);

        let record = ProviderRecord::from_raw(raw(json!({ "provider_code": "x" })));
        assert_eq!(record.connection_status, ConnectionStatus::NotConfigured);
        assert_eq!(record.provider_type, ProviderType::Custom);
        assert_eq!(record.name, "x");
    }

    #[test]
    fn malformed_entries_keep_the_rest_of_the_list() {
        let entries: Vec<RawProvider> = serde_json::from_value(json!([
            { "provider_code": "ek_ok", "connection_status": "working" },
            { "provider_code": "ek_num", "connection_status": 3 },
            {
                "provider_code": "ek_obj",
                "provider_name": ["Broken"],
                "provider_type": 7,
                "connection_status": { "state": "working" },
                "last_attempt_at": 1714557600,
            },
        ]))
        .unwrap();

        let records = entries
            .into_iter()
            .map(ProviderRecord::from_raw)
            .collect::<Vec<_>>();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].connection_status, ConnectionStatus::Working);
        assert_eq!(records[1].connection_status, ConnectionStatus::NotConfigured);
        assert_eq!(records[2].connection_status, ConnectionStatus::NotConfigured);
        assert_eq!(records[2].provider_type, ProviderType::Custom);
        assert_eq!(records[2].name, "ek_obj");
        assert!(records[2].last_attempt_at.is_none());
    }

    #[test]
    fn known_status_is_copied() {
        for status in ["configured", "working", "error", "not_configured"] {
            let record = ProviderRecord::from_raw(raw(json!({
                "provider_code": "ek",
                "connection_status": status,
            })));
            assert_eq!(record.connection_status.as_ref(), status);
        }
    }

    #[test]
    fn stored_config_requires_content() {
        let cases = [
            (json!({"wappi_token": "t"}), true),
            (json!({}), false),
            (Value::Null, false),
            (json!("{\"a\":1}"), true),
            (json!(""), false),
            (json!(7), false),
        ];
        for (config, expected) in cases {
            let record = ProviderRecord::from_raw(raw(json!({
                "provider_code": "ek",
                "config": config.clone(),
            })));
            assert_eq!(record.has_stored_config, expected, "{config}");
        }
    }

    #[test]
    fn icon_priority() {
        let icon = |provider_type, code: &str| {
            ProviderIcon::select(provider_type, &ProviderCode::from_wire(code))
        };

        assert_eq!(icon(ProviderType::YandexPostbox, "ek_whatsapp"), ProviderIcon::Mail);
        assert_eq!(icon(ProviderType::Apns, "ek_sms"), ProviderIcon::Bell);
        assert_eq!(icon(ProviderType::Custom, "ek_whatsapp"), ProviderIcon::Phone);
        assert_eq!(icon(ProviderType::TelegramBot, "telegram_bot"), ProviderIcon::Send);
        assert_eq!(icon(ProviderType::Sms, "ek_sms"), ProviderIcon::MessageSquare);
        assert_eq!(icon(ProviderType::Email, "ek_email"), ProviderIcon::Mail);
        assert_eq!(icon(ProviderType::Custom, "web_push"), ProviderIcon::Bell);
        assert_eq!(icon(ProviderType::Max, "ek_max"), ProviderIcon::MessageCircle);
        assert_eq!(icon(ProviderType::Custom, "wappi_main"), ProviderIcon::MessageCircle);
        assert_eq!(icon(ProviderType::Custom, "ek_other"), ProviderIcon::Plug);
        assert_eq!(ProviderIcon::MessageSquare.as_ref(), "message-square");
    }

    #[test]
    fn last_attempt_is_parsed_leniently() {
        let record = ProviderRecord::from_raw(raw(json!({
            "provider_code": "ek",
            "last_attempt_at": "2024-05-01T10:00:00.123456",
        })));
        assert!(record.last_attempt_at.is_some());

        let record = ProviderRecord::from_raw(raw(json!({
            "provider_code": "ek",
            "last_attempt_at": "soon",
        })));
        assert!(record.last_attempt_at.is_none());
    }
}
