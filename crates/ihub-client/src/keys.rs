//! API key listing over HTTP.

use ihub_core::Result;
use ihub_core::activity::{ApiKey, ApiKeyProvider};
use reqwest::Method;

use crate::client::HubClient;

#[async_trait::async_trait]
impl ApiKeyProvider for HubClient {
    async fn list_keys(&self) -> Result<Vec<ApiKey>> {
        let request = self.request(Method::GET, &self.endpoints().keys);
        self.execute("list_keys", request).await?.into_list("keys")
    }
}
