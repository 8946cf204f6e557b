//! Provider types, credential groups and credential field names.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString, IntoStaticStr};

/// Supported provider types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[derive(Serialize, Deserialize)]
#[derive(AsRefStr, Display, EnumIter, EnumString, IntoStaticStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ProviderType {
    /// WhatsApp Business through Wappi.
    WhatsappBusiness,
    /// Telegram bot through Wappi.
    TelegramBot,
    /// MAX messenger through Wappi.
    Max,
    /// Yandex Cloud Postbox (email).
    YandexPostbox,
    /// Firebase Cloud Messaging.
    Fcm,
    /// Apple Push Notification service.
    Apns,
    /// SMS gateway.
    Sms,
    /// SMTP email.
    Email,
    /// Any other provider.
    Custom,
}

impl ProviderType {
    /// Reads a provider type as reported by the registry.
    ///
    /// Older registries report Wappi-backed WhatsApp providers as `wappi`.
    /// Anything unrecognized is read as [`ProviderType::Custom`].
    pub fn from_wire(value: &str) -> Self {
        match value {
            "wappi" => Self::WhatsappBusiness,
            other => other.parse().unwrap_or(Self::Custom),
        }
    }

    /// Returns the credential group this type draws its fields from.
    pub const fn credential_group(self) -> CredentialGroup {
        match self {
            Self::WhatsappBusiness | Self::TelegramBot | Self::Max => CredentialGroup::Wappi,
            Self::YandexPostbox => CredentialGroup::Postbox,
            Self::Fcm => CredentialGroup::Fcm,
            Self::Apns => CredentialGroup::Apns,
            Self::Sms | Self::Email | Self::Custom => CredentialGroup::None,
        }
    }

    /// Returns the ordered credential fields required to submit this type.
    pub const fn required_fields(self) -> &'static [CredentialField] {
        self.credential_group().fields()
    }

    /// Human-readable name for listings.
    pub const fn label(self) -> &'static str {
        match self {
            Self::WhatsappBusiness => "WhatsApp Business",
            Self::TelegramBot => "Telegram Bot",
            Self::Max => "MAX",
            Self::YandexPostbox => "Yandex Postbox",
            Self::Fcm => "Firebase Cloud Messaging",
            Self::Apns => "Apple Push Notifications",
            Self::Sms => "SMS Gateway",
            Self::Email => "Email SMTP",
            Self::Custom => "Custom",
        }
    }
}

/// Returns the ordered credential fields required for `provider_type`.
///
/// Empty for `sms`, `email` and `custom`.
pub const fn required_fields_for(provider_type: ProviderType) -> &'static [CredentialField] {
    provider_type.required_fields()
}

/// Named cluster of secret fields shared by one or more provider types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[derive(Serialize, Deserialize)]
#[derive(AsRefStr, Display, EnumIter, EnumString, IntoStaticStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum CredentialGroup {
    /// Wappi token and profile id.
    Wappi,
    /// Postbox access key, secret key and sender address.
    Postbox,
    /// FCM service-account fields.
    Fcm,
    /// APNs token-based authentication fields.
    Apns,
    /// No credential fields.
    None,
}

impl CredentialGroup {
    /// Returns the ordered fields belonging to this group.
    pub const fn fields(self) -> &'static [CredentialField] {
        use CredentialField as F;
        match self {
            Self::Wappi => &[F::WappiToken, F::WappiProfileId],
            Self::Postbox => &[
                F::PostboxAccessKey,
                F::PostboxSecretKey,
                F::PostboxFromEmail,
            ],
            Self::Fcm => &[F::FcmProjectId, F::FcmPrivateKey, F::FcmClientEmail],
            Self::Apns => &[
                F::ApnsTeamId,
                F::ApnsKeyId,
                F::ApnsPrivateKey,
                F::ApnsBundleId,
            ],
            Self::None => &[],
        }
    }
}

/// Wire names of every credential field the registry understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[derive(Serialize, Deserialize)]
#[derive(AsRefStr, Display, EnumIter, EnumString, IntoStaticStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum CredentialField {
    WappiToken,
    WappiProfileId,
    PostboxAccessKey,
    PostboxSecretKey,
    PostboxFromEmail,
    FcmProjectId,
    FcmPrivateKey,
    FcmClientEmail,
    ApnsTeamId,
    ApnsKeyId,
    ApnsPrivateKey,
    ApnsBundleId,
}

impl CredentialField {
    /// Returns whether the value must never be echoed back to the operator.
    pub const fn is_secret(self) -> bool {
        matches!(
            self,
            Self::WappiToken
                | Self::PostboxSecretKey
                | Self::FcmPrivateKey
                | Self::ApnsPrivateKey
        )
    }

    /// Returns the group this field belongs to.
    pub const fn group(self) -> CredentialGroup {
        match self {
            Self::WappiToken | Self::WappiProfileId => CredentialGroup::Wappi,
            Self::PostboxAccessKey | Self::PostboxSecretKey | Self::PostboxFromEmail => {
                CredentialGroup::Postbox
            }
            Self::FcmProjectId | Self::FcmPrivateKey | Self::FcmClientEmail => CredentialGroup::Fcm,
            Self::ApnsTeamId | Self::ApnsKeyId | Self::ApnsPrivateKey | Self::ApnsBundleId => {
                CredentialGroup::Apns
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn chat_types_share_wappi_fields() {
        for provider_type in [
            ProviderType::WhatsappBusiness,
            ProviderType::TelegramBot,
            ProviderType::Max,
        ] {
            assert_eq!(provider_type.credential_group(), CredentialGroup::Wappi);
            assert_eq!(
                required_fields_for(provider_type),
                &[CredentialField::WappiToken, CredentialField::WappiProfileId]
            );
        }
    }

    #[test]
    fn ungrouped_types_require_nothing() {
        for provider_type in [ProviderType::Sms, ProviderType::Email, ProviderType::Custom] {
            assert!(required_fields_for(provider_type).is_empty());
        }
    }

    #[test]
    fn every_field_belongs_to_exactly_one_group() {
        for field in CredentialField::iter() {
            let owners = CredentialGroup::iter()
                .filter(|group| group.fields().contains(&field))
                .collect::<Vec<_>>();
            assert_eq!(owners, vec![field.group()], "{field}");
        }
    }

    #[test]
    fn wire_names_are_snake_case() {
        assert_eq!(ProviderType::YandexPostbox.as_ref(), "yandex_postbox");
        assert_eq!(CredentialField::PostboxFromEmail.as_ref(), "postbox_from_email");
        assert_eq!(
            serde_json::to_string(&ProviderType::TelegramBot).unwrap(),
            "\"telegram_bot\""
        );
    }

    #[test]
    fn from_wire_is_lenient() {
        assert_eq!(ProviderType::from_wire("fcm"), ProviderType::Fcm);
        assert_eq!(ProviderType::from_wire("wappi"), ProviderType::WhatsappBusiness);
        assert_eq!(ProviderType::from_wire("pigeon"), ProviderType::Custom);
        assert_eq!(ProviderType::from_wire(""), ProviderType::Custom);
    }
}
