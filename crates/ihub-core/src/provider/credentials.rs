//! Credential sets keyed on credential group.

use std::collections::BTreeMap;
use std::fmt;

use serde_json::{Map, Value};

use super::{CredentialField, CredentialGroup};
use crate::{Error, Result};

/// Field values entered for a provider, keyed by wire field name.
pub type FieldValues = BTreeMap<CredentialField, String>;

/// Credentials for one provider, carrying only its own group's fields.
#[derive(Clone, PartialEq, Eq)]
pub enum Credentials {
    /// Wappi gateway credentials shared by the chat types.
    Wappi { token: String, profile_id: String },
    /// Yandex Postbox credentials.
    Postbox {
        access_key: String,
        secret_key: String,
        from_email: String,
    },
    /// FCM service-account credentials.
    Fcm {
        project_id: String,
        private_key: String,
        client_email: String,
    },
    /// APNs token-based credentials.
    Apns {
        team_id: String,
        key_id: String,
        private_key: String,
        bundle_id: String,
    },
    /// Types without credential fields.
    None,
}

impl Credentials {
    /// Builds the credentials of `group` from entered field values.
    ///
    /// Only the fields of `group` are read; values for other groups are
    /// ignored.
    ///
    /// # Errors
    ///
    /// Returns an invalid input error naming the first required field that is
    /// missing or empty.
    pub fn from_fields(group: CredentialGroup, values: &FieldValues) -> Result<Self> {
        let take = |field: CredentialField| -> Result<String> {
            match values.get(&field) {
                Some(value) if !value.is_empty() => Ok(value.clone()),
                _ => Err(Error::invalid_input()
                    .with_message(format!("required field '{field}' is empty"))),
            }
        };

        use CredentialField as F;
        let credentials = match group {
            CredentialGroup::Wappi => Self::Wappi {
                token: take(F::WappiToken)?,
                profile_id: take(F::WappiProfileId)?,
            },
            CredentialGroup::Postbox => Self::Postbox {
                access_key: take(F::PostboxAccessKey)?,
                secret_key: take(F::PostboxSecretKey)?,
                from_email: take(F::PostboxFromEmail)?,
            },
            CredentialGroup::Fcm => Self::Fcm {
                project_id: take(F::FcmProjectId)?,
                private_key: take(F::FcmPrivateKey)?,
                client_email: take(F::FcmClientEmail)?,
            },
            CredentialGroup::Apns => Self::Apns {
                team_id: take(F::ApnsTeamId)?,
                key_id: take(F::ApnsKeyId)?,
                private_key: take(F::ApnsPrivateKey)?,
                bundle_id: take(F::ApnsBundleId)?,
            },
            CredentialGroup::None => Self::None,
        };

        Ok(credentials)
    }

    /// Returns the group these credentials belong to.
    pub const fn group(&self) -> CredentialGroup {
        match self {
            Self::Wappi { .. } => CredentialGroup::Wappi,
            Self::Postbox { .. } => CredentialGroup::Postbox,
            Self::Fcm { .. } => CredentialGroup::Fcm,
            Self::Apns { .. } => CredentialGroup::Apns,
            Self::None => CredentialGroup::None,
        }
    }

    /// Returns the fields as `(wire name, value)` pairs in group order.
    pub fn fields(&self) -> Vec<(CredentialField, &str)> {
        use CredentialField as F;
        match self {
            Self::Wappi { token, profile_id } => {
                vec![(F::WappiToken, token), (F::WappiProfileId, profile_id)]
            }
            Self::Postbox {
                access_key,
                secret_key,
                from_email,
            } => vec![
                (F::PostboxAccessKey, access_key),
                (F::PostboxSecretKey, secret_key),
                (F::PostboxFromEmail, from_email),
            ],
            Self::Fcm {
                project_id,
                private_key,
                client_email,
            } => vec![
                (F::FcmProjectId, project_id),
                (F::FcmPrivateKey, private_key),
                (F::FcmClientEmail, client_email),
            ],
            Self::Apns {
                team_id,
                key_id,
                private_key,
                bundle_id,
            } => vec![
                (F::ApnsTeamId, team_id),
                (F::ApnsKeyId, key_id),
                (F::ApnsPrivateKey, private_key),
                (F::ApnsBundleId, bundle_id),
            ],
            Self::None => Vec::new(),
        }
        .into_iter()
        .map(|(field, value)| (field, value.as_str()))
        .collect()
    }

    /// Returns whether there is anything to store.
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::None)
    }

    /// Writes the credential fields into a request body.
    pub fn write_into(&self, body: &mut Map<String, Value>) {
        for (field, value) in self.fields() {
            body.insert(field.to_string(), Value::String(value.to_owned()));
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut debug = f.debug_struct("Credentials");
        debug.field("group", &self.group());
        for (field, value) in self.fields() {
            if field.is_secret() {
                debug.field(field.as_ref(), &"<redacted>");
            } else {
                debug.field(field.as_ref(), &value);
            }
        }
        debug.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn postbox_values() -> FieldValues {
        FieldValues::from([
            (CredentialField::PostboxAccessKey, "AK1".to_owned()),
            (CredentialField::PostboxSecretKey, "SK1".to_owned()),
            (CredentialField::PostboxFromEmail, "a@b.com".to_owned()),
            (CredentialField::WappiToken, "stray".to_owned()),
        ])
    }

    #[test]
    fn builds_only_the_requested_group() {
        let credentials =
            Credentials::from_fields(CredentialGroup::Postbox, &postbox_values()).unwrap();

        let mut body = Map::new();
        credentials.write_into(&mut body);

        let keys = body.keys().map(String::as_str).collect::<Vec<_>>();
        assert_eq!(
            keys,
            ["postbox_access_key", "postbox_from_email", "postbox_secret_key"]
        );
        assert_eq!(body["postbox_access_key"], "AK1");
    }

    #[test]
    fn missing_field_is_named() {
        let values = FieldValues::from([(CredentialField::WappiProfileId, "42".to_owned())]);
        let error = Credentials::from_fields(CredentialGroup::Wappi, &values).unwrap_err();

        assert_eq!(error.kind(), crate::ErrorKind::InvalidInput);
        assert!(error.to_string().contains("wappi_token"));
    }

    #[test]
    fn empty_value_counts_as_missing() {
        let values = FieldValues::from([
            (CredentialField::WappiToken, String::new()),
            (CredentialField::WappiProfileId, "42".to_owned()),
        ]);
        assert!(Credentials::from_fields(CredentialGroup::Wappi, &values).is_err());
    }

    #[test]
    fn ungrouped_credentials_are_empty() {
        let credentials =
            Credentials::from_fields(CredentialGroup::None, &FieldValues::new()).unwrap();
        assert!(credentials.is_empty());
        assert!(credentials.fields().is_empty());
    }

    #[test]
    fn debug_redacts_secrets() {
        let credentials =
            Credentials::from_fields(CredentialGroup::Postbox, &postbox_values()).unwrap();
        let debug = format!("{credentials:?}");

        assert!(debug.contains("AK1"));
        assert!(!debug.contains("SK1"));
        assert!(debug.contains("<redacted>"));
    }
}
