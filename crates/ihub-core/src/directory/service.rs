//! Directory service wrapper with observability.

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use super::{
    Acknowledgement, CreateProviderRequest, DirectoryProvider, UpdateProviderRequest,
};
use crate::provider::{ProviderCode, ProviderRecord};
use crate::{Result, TRACING_TARGET_DIRECTORY};

/// Directory service wrapper with observability.
///
/// Adds structured logging to any [`DirectoryProvider`] and normalizes listed
/// entries. The inner provider is wrapped in `Arc` for cheap cloning.
#[derive(Clone)]
pub struct DirectoryService {
    inner: Arc<dyn DirectoryProvider>,
}

impl fmt::Debug for DirectoryService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DirectoryService").finish_non_exhaustive()
    }
}

impl DirectoryService {
    /// Create a new directory service wrapper.
    pub fn new<P>(provider: P) -> Self
    where
        P: DirectoryProvider + 'static,
    {
        Self {
            inner: Arc::new(provider),
        }
    }

    /// Lists providers and normalizes each entry into a record.
    pub async fn list(&self) -> Result<Vec<ProviderRecord>> {
        let started_at = Instant::now();
        let result = self.inner.list().await;
        let elapsed = started_at.elapsed();

        match result {
            Ok(raw) => {
                let records = raw
                    .into_iter()
                    .map(ProviderRecord::from_raw)
                    .collect::<Vec<_>>();

                tracing::debug!(
                    target: TRACING_TARGET_DIRECTORY,
                    count = records.len(),
                    elapsed_ms = elapsed.as_millis(),
                    "Providers listed"
                );
                Ok(records)
            }
            Err(error) => {
                tracing::error!(
                    target: TRACING_TARGET_DIRECTORY,
                    error = %error,
                    elapsed_ms = elapsed.as_millis(),
                    "Failed to list providers"
                );
                Err(error)
            }
        }
    }

    /// Registers a new provider.
    pub async fn create(&self, request: &CreateProviderRequest) -> Result<Acknowledgement> {
        tracing::debug!(
            target: TRACING_TARGET_DIRECTORY,
            provider_code = %request.code,
            provider_type = %request.provider_type,
            credentials = ?request.credentials,
            "Creating provider"
        );

        let result = self.inner.create(request).await;
        Self::log_outcome("create", &request.code, &result);
        result
    }

    /// Replaces the credentials of a provider.
    pub async fn update(&self, request: &UpdateProviderRequest) -> Result<Acknowledgement> {
        tracing::debug!(
            target: TRACING_TARGET_DIRECTORY,
            provider_code = %request.code,
            credential_group = %request.credentials.group(),
            "Updating provider configuration"
        );

        let result = self.inner.update(request).await;
        Self::log_outcome("update", &request.code, &result);
        result
    }

    /// Removes a provider.
    pub async fn delete(&self, code: &ProviderCode) -> Result<Acknowledgement> {
        tracing::debug!(
            target: TRACING_TARGET_DIRECTORY,
            provider_code = %code,
            "Deleting provider"
        );

        let result = self.inner.delete(code).await;
        Self::log_outcome("delete", code, &result);
        result
    }

    fn log_outcome(operation: &'static str, code: &ProviderCode, result: &Result<Acknowledgement>) {
        match result {
            Ok(ack) => tracing::info!(
                target: TRACING_TARGET_DIRECTORY,
                operation,
                provider_code = %code,
                message = ?ack.message,
                "Registry accepted request"
            ),
            Err(error) => tracing::error!(
                target: TRACING_TARGET_DIRECTORY,
                operation,
                provider_code = %code,
                error = %error,
                "Registry request failed"
            ),
        }
    }
}
