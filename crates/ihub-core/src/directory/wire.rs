//! Registry wire types.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::de;

/// A provider entry exactly as the registry lists it.
///
/// Every field is optional on the wire and values of the wrong JSON type read
/// as absent, so one malformed entry never fails the whole list.
/// Normalization into a record decides how gaps are filled.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawProvider {
    #[serde(default, deserialize_with = "de::identifier")]
    pub provider_code: String,
    #[serde(default, deserialize_with = "de::optional_string")]
    pub provider_name: Option<String>,
    #[serde(default, deserialize_with = "de::optional_string")]
    pub provider_type: Option<String>,
    #[serde(default)]
    pub config: Option<Value>,
    #[serde(default, deserialize_with = "de::optional_string")]
    pub connection_status: Option<String>,
    #[serde(default, deserialize_with = "de::optional_string")]
    pub last_attempt_at: Option<String>,
}

/// Successful registry reply to a mutating call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Acknowledgement {
    /// Code the registry acted on, when echoed back.
    #[serde(default)]
    pub provider_code: Option<String>,
    /// Human-readable confirmation.
    #[serde(default)]
    pub message: Option<String>,
}
