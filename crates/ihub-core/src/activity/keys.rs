//! API keys as listed by the backend.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use crate::de;

/// Number of trailing characters left visible by [`ApiKey::masked_key`].
const VISIBLE_SUFFIX: usize = 4;

/// An API key issued by the hub.
///
/// The raw key is kept for callers that need it; [`fmt::Display`] and
/// [`ApiKey::masked_key`] never print more than its last four characters.
///
/// [`fmt::Display`]: std::fmt::Display
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiKey {
    #[serde(default, deserialize_with = "de::identifier")]
    pub id: String,
    #[serde(default, deserialize_with = "de::string")]
    pub name: String,
    #[serde(default, alias = "api_key", deserialize_with = "de::string")]
    pub key: String,
    #[serde(default, deserialize_with = "de::timestamp")]
    pub created_at: Option<Timestamp>,
    #[serde(default, deserialize_with = "de::timestamp")]
    pub last_used_at: Option<Timestamp>,
    /// Expiry time; `None` means the key never expires.
    #[serde(default, deserialize_with = "de::timestamp")]
    pub expires_at: Option<Timestamp>,
    #[serde(default)]
    pub is_active: bool,
}

impl ApiKey {
    /// Returns the key with all but its last four characters masked.
    pub fn masked_key(&self) -> String {
        let count = self.key.chars().count();
        let hidden = count.saturating_sub(VISIBLE_SUFFIX);
        let suffix = self.key.chars().skip(hidden).collect::<String>();
        format!("{}{suffix}", "*".repeat(hidden))
    }

    /// Returns whether the key has expired at `now`.
    pub fn is_expired(&self, now: Timestamp) -> bool {
        self.expires_at.is_some_and(|expires_at| expires_at <= now)
    }
}

impl std::fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiKey")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("key", &self.masked_key())
            .field("is_active", &self.is_active)
            .finish_non_exhaustive()
    }
}

impl std::fmt::Display for ApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name, self.masked_key())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn key(raw: &str) -> ApiKey {
        ApiKey {
            key: raw.to_owned(),
            ..ApiKey::default()
        }
    }

    #[test]
    fn masking_keeps_last_four() {
        assert_eq!(key("ek_live_j8h3k2n4m5p6q7r8").masked_key(), "********************q7r8");
        assert_eq!(key("abc").masked_key(), "abc");
        assert_eq!(key("").masked_key(), "");
    }

    #[test]
    fn debug_never_prints_the_key() {
        let debug = format!("{:?}", key("ek_live_j8h3k2n4m5p6q7r8"));
        assert!(!debug.contains("ek_live"));
    }

    #[test]
    fn listing_row() {
        let key: ApiKey = serde_json::from_value(json!({
            "id": 3,
            "name": "Production",
            "api_key": "ek_live_abcd1234",
            "created_at": "2024-05-01T10:00:00",
            "last_used_at": null,
            "expires_at": "2024-06-01T10:00:00Z",
            "is_active": true,
        }))
        .unwrap();

        assert_eq!(key.id, "3");
        assert_eq!(key.key, "ek_live_abcd1234");
        assert!(key.last_used_at.is_none());
        assert!(key.is_expired("2025-01-01T00:00:00Z".parse().unwrap()));
        assert!(!key.is_expired("2024-05-15T00:00:00Z".parse().unwrap()));
    }
}
