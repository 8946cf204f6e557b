//! Provider configuration model.
//!
//! Defines the supported provider types, the credential fields each type
//! requires, and the rule that gates submission of a provider form. Everything
//! here is pure data and predicates, except [`import_file`] which reads one
//! file.

mod code;
mod credentials;
mod draft;
mod import;
mod kind;
mod record;

pub use code::{ProviderCode, normalize_code};
pub use credentials::{Credentials, FieldValues};
pub use draft::{ConfigDraft, ProviderDraft, is_submittable, missing_fields};
pub use import::{ImportReport, apply_content, import_file, parse_credentials};
pub use kind::{CredentialField, CredentialGroup, ProviderType, required_fields_for};
pub use record::{ConnectionStatus, ProviderIcon, ProviderRecord};
