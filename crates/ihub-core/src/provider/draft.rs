//! Operator-entered provider forms and the submission gate.

use super::{
    CredentialField, Credentials, FieldValues, ProviderCode, ProviderType, normalize_code,
    required_fields_for,
};
use crate::directory::{CreateProviderRequest, UpdateProviderRequest};
use crate::{Error, Result};

/// Returns whether a provider form may be submitted.
///
/// False unless `name`, `code` and `provider_type` are all present and
/// non-empty and every field in [`required_fields_for`] has a non-empty value.
/// A name of only whitespace counts as empty. There is no partial submission
/// of a credential group.
pub fn is_submittable(
    name: &str,
    code: &str,
    provider_type: Option<ProviderType>,
    values: &FieldValues,
) -> bool {
    let Some(provider_type) = provider_type else {
        return false;
    };

    !name.trim().is_empty()
        && !code.is_empty()
        && required_fields_for(provider_type)
            .iter()
            .all(|field| values.get(field).is_some_and(|value| !value.is_empty()))
}

/// Returns the required fields of `provider_type` that are still empty.
pub fn missing_fields(provider_type: ProviderType, values: &FieldValues) -> Vec<CredentialField> {
    required_fields_for(provider_type)
        .iter()
        .filter(|field| values.get(field).is_none_or(|value| value.is_empty()))
        .copied()
        .collect()
}

/// Form state for registering a new provider.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProviderDraft {
    /// Human-readable name.
    pub name: String,
    code: String,
    /// Selected provider type, if any.
    pub provider_type: Option<ProviderType>,
    /// Entered credential values.
    pub fields: FieldValues,
}

impl ProviderDraft {
    /// Creates an empty draft.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the normalized code entered so far.
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Sets the code, normalizing the input.
    pub fn set_code(&mut self, input: &str) {
        self.code = normalize_code(input);
    }

    /// Sets a credential field value.
    pub fn set_field(&mut self, field: CredentialField, value: impl Into<String>) {
        self.fields.insert(field, value.into());
    }

    /// Returns the fields the form should present for the selected type.
    pub fn visible_fields(&self) -> &'static [CredentialField] {
        self.provider_type.map(required_fields_for).unwrap_or(&[])
    }

    /// Returns whether the draft passes the submission gate.
    pub fn is_submittable(&self) -> bool {
        is_submittable(&self.name, &self.code, self.provider_type, &self.fields)
    }

    /// Builds the create request for this draft.
    ///
    /// # Errors
    ///
    /// Returns an invalid input error when the draft is not submittable.
    pub fn to_request(&self) -> Result<CreateProviderRequest> {
        let Some(provider_type) = self.provider_type else {
            return Err(Error::invalid_input().with_message("provider type is not selected"));
        };
        if self.name.trim().is_empty() {
            return Err(Error::invalid_input().with_message("provider name is empty"));
        }

        let code = ProviderCode::new(&self.code)?;
        let credentials = Credentials::from_fields(provider_type.credential_group(), &self.fields)?;
        CreateProviderRequest::new(self.name.clone(), code, provider_type, credentials)
    }
}

/// Form state for replacing the credentials of an existing provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigDraft {
    /// Code of the provider being edited.
    pub code: ProviderCode,
    /// Type of the provider being edited.
    pub provider_type: ProviderType,
    /// Entered credential values.
    pub fields: FieldValues,
}

impl ConfigDraft {
    /// Opens an empty config form for a provider.
    ///
    /// Stored credentials are never read back, so the form always starts
    /// empty.
    pub fn new(code: ProviderCode, provider_type: ProviderType) -> Self {
        Self {
            code,
            provider_type,
            fields: FieldValues::new(),
        }
    }

    /// Sets a credential field value.
    pub fn set_field(&mut self, field: CredentialField, value: impl Into<String>) {
        self.fields.insert(field, value.into());
    }

    /// Returns whether every required field of the provider's group is filled.
    pub fn is_submittable(&self) -> bool {
        missing_fields(self.provider_type, &self.fields).is_empty()
    }

    /// Builds the update request for this draft.
    ///
    /// # Errors
    ///
    /// Returns an invalid input error when a required field is empty.
    pub fn to_request(&self) -> Result<UpdateProviderRequest> {
        let credentials =
            Credentials::from_fields(self.provider_type.credential_group(), &self.fields)?;
        Ok(UpdateProviderRequest::new(self.code.clone(), credentials))
    }
}
