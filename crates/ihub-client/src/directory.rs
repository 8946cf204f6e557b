//! Provider registry over HTTP.
//!
//! This module implements the [`DirectoryProvider`] trait for [`HubClient`].

use ihub_core::Result;
use ihub_core::directory::{
    Acknowledgement, CreateProviderRequest, DirectoryProvider, RawProvider, UpdateProviderRequest,
};
use ihub_core::provider::ProviderCode;
use reqwest::Method;

use crate::TRACING_TARGET_DIRECTORY;
use crate::client::HubClient;

#[async_trait::async_trait]
impl DirectoryProvider for HubClient {
    async fn list(&self) -> Result<Vec<RawProvider>> {
        let request = self.request(Method::GET, &self.endpoints().registry);
        let providers = self
            .execute("list_providers", request)
            .await?
            .into_list::<RawProvider>("providers")?;

        tracing::debug!(
            target: TRACING_TARGET_DIRECTORY,
            count = providers.len(),
            "Registry listed providers"
        );

        Ok(providers)
    }

    async fn create(&self, request: &CreateProviderRequest) -> Result<Acknowledgement> {
        tracing::debug!(
            target: TRACING_TARGET_DIRECTORY,
            provider_code = %request.code,
            method = %self.create_method(),
            "Submitting provider"
        );

        let http = self
            .request(self.create_method(), &self.endpoints().registry)
            .json(&request.to_body());
        self.execute("create_provider", http).await?.into_inner()
    }

    async fn update(&self, request: &UpdateProviderRequest) -> Result<Acknowledgement> {
        tracing::debug!(
            target: TRACING_TARGET_DIRECTORY,
            provider_code = %request.code,
            method = %self.update_method(),
            "Submitting provider configuration"
        );

        let http = self
            .request(self.update_method(), &self.endpoints().registry)
            .json(&request.to_body());
        self.execute("update_provider", http).await?.into_inner()
    }

    async fn delete(&self, code: &ProviderCode) -> Result<Acknowledgement> {
        let http = self
            .request(Method::DELETE, &self.endpoints().registry)
            .query(&[("provider_code", code.as_str())]);
        self.execute("delete_provider", http).await?.into_inner()
    }
}
