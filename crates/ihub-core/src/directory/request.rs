//! Mutating registry requests.

use serde_json::{Map, Value};

use crate::provider::{Credentials, ProviderCode, ProviderType};
use crate::{Error, Result};

/// Request to register a new provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateProviderRequest {
    /// Human-readable name.
    pub name: String,
    /// Code of the new provider.
    pub code: ProviderCode,
    /// Provider type.
    pub provider_type: ProviderType,
    /// Credentials of the type's group.
    pub credentials: Credentials,
}

impl CreateProviderRequest {
    /// Creates a new request.
    ///
    /// # Errors
    ///
    /// Returns an invalid input error when the name is empty or the
    /// credentials belong to another group than `provider_type`.
    pub fn new(
        name: impl Into<String>,
        code: ProviderCode,
        provider_type: ProviderType,
        credentials: Credentials,
    ) -> Result<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(Error::invalid_input().with_message("provider name is empty"));
        }
        if credentials.group() != provider_type.credential_group() {
            return Err(Error::invalid_input().with_message(format!(
                "{} credentials do not apply to provider type {provider_type}",
                credentials.group()
            )));
        }

        Ok(Self {
            name,
            code,
            provider_type,
            credentials,
        })
    }

    /// Builds the JSON body: common fields plus the group's credential fields.
    pub fn to_body(&self) -> Map<String, Value> {
        let mut body = Map::new();
        body.insert("provider_code".into(), self.code.as_str().into());
        body.insert("provider_name".into(), self.name.as_str().into());
        body.insert("provider_type".into(), self.provider_type.as_ref().into());
        self.credentials.write_into(&mut body);
        body
    }
}

/// Request to replace the credentials of an existing provider.
///
/// The code addresses the provider; it is never changed by an update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateProviderRequest {
    /// Code of the provider to update.
    pub code: ProviderCode,
    /// New credentials.
    pub credentials: Credentials,
}

impl UpdateProviderRequest {
    /// Creates a new request.
    pub fn new(code: ProviderCode, credentials: Credentials) -> Self {
        Self { code, credentials }
    }

    /// Builds the JSON body: the code plus the group's credential fields.
    pub fn to_body(&self) -> Map<String, Value> {
        let mut body = Map::new();
        body.insert("provider_code".into(), self.code.as_str().into());
        self.credentials.write_into(&mut body);
        body
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::{CredentialField, FieldValues};

    fn postbox() -> Credentials {
        let values = FieldValues::from([
            (CredentialField::PostboxAccessKey, "AK1".to_owned()),
            (CredentialField::PostboxSecretKey, "SK1".to_owned()),
            (CredentialField::PostboxFromEmail, "a@b.com".to_owned()),
        ]);
        Credentials::from_fields(ProviderType::YandexPostbox.credential_group(), &values).unwrap()
    }

    #[test]
    fn create_body_holds_exactly_common_and_group_fields() {
        let request = CreateProviderRequest::new(
            "Postbox",
            ProviderCode::new("ek_email").unwrap(),
            ProviderType::YandexPostbox,
            postbox(),
        )
        .unwrap();

        let body = request.to_body();
        let mut keys = body.keys().map(String::as_str).collect::<Vec<_>>();
        keys.sort_unstable();
        assert_eq!(
            keys,
            [
                "postbox_access_key",
                "postbox_from_email",
                "postbox_secret_key",
                "provider_code",
                "provider_name",
                "provider_type",
            ]
        );
        assert_eq!(body["provider_type"], "yandex_postbox");
    }

    #[test]
    fn create_rejects_foreign_credentials() {
        let error = CreateProviderRequest::new(
            "Push",
            ProviderCode::new("ek_push").unwrap(),
            ProviderType::Fcm,
            postbox(),
        )
        .unwrap_err();
        assert_eq!(error.kind(), crate::ErrorKind::InvalidInput);
    }

    #[test]
    fn create_without_credentials_sends_common_fields_only() {
        let request = CreateProviderRequest::new(
            "SMS",
            ProviderCode::new("ek_sms").unwrap(),
            ProviderType::Sms,
            Credentials::None,
        )
        .unwrap();
        assert_eq!(request.to_body().len(), 3);
    }

    #[test]
    fn update_body_keys_on_code() {
        let request = UpdateProviderRequest::new(ProviderCode::new("ek_email").unwrap(), postbox());
        let body = request.to_body();

        assert_eq!(body.len(), 4);
        assert_eq!(body["provider_code"], "ek_email");
        assert!(!body.contains_key("provider_name"));
    }
}
