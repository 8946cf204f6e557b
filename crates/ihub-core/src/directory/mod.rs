//! Provider directory: the remote registry of providers.
//!
//! [`DirectoryProvider`] is the transport seam; [`DirectoryService`] wraps any
//! implementation with logging and turns raw entries into
//! [`ProviderRecord`](crate::provider::ProviderRecord)s.

mod dialect;
mod request;
mod service;
mod wire;

pub use dialect::RegistryDialect;
pub use request::{CreateProviderRequest, UpdateProviderRequest};
pub use service::DirectoryService;
pub use wire::{Acknowledgement, RawProvider};

use crate::Result;
use crate::provider::ProviderCode;

/// Core trait for provider registry operations.
///
/// Implementations report backend logical failures (`success: false`) as
/// errors, so an `Ok` always means the registry accepted the call.
#[async_trait::async_trait]
pub trait DirectoryProvider: Send + Sync {
    /// Lists every provider known to the registry.
    async fn list(&self) -> Result<Vec<RawProvider>>;

    /// Registers a new provider.
    async fn create(&self, request: &CreateProviderRequest) -> Result<Acknowledgement>;

    /// Replaces the stored credentials of an existing provider.
    async fn update(&self, request: &UpdateProviderRequest) -> Result<Acknowledgement>;

    /// Removes a provider.
    async fn delete(&self, code: &ProviderCode) -> Result<Acknowledgement>;
}
