//! Commonly used items from ihub-core.
//!
//! # Usage
//!
//! ```rust,ignore
//! use ihub_core::prelude::*;
//! ```

pub use crate::activity::{
    ActivityService, ApiKey, ApiKeyProvider, ApiKeyService, DispatchReceipt, MessageDetails,
    MessageLogEntry, MessageLogProvider, MessageStatus, TestMessage,
};
pub use crate::dashboard::DashboardStats;
pub use crate::directory::{
    Acknowledgement, CreateProviderRequest, DirectoryProvider, DirectoryService, RawProvider,
    RegistryDialect, UpdateProviderRequest,
};
pub use crate::hub::Hub;
pub use crate::provider::{
    ConfigDraft, ConnectionStatus, CredentialField, CredentialGroup, Credentials, FieldValues,
    ProviderCode, ProviderDraft, ProviderRecord, ProviderType,
};
pub use crate::{BoxedError, Error, ErrorKind, HubServices, Result};
