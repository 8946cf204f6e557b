//! Reqwest-based HTTP client for the hub backend.

use std::sync::Arc;
use std::time::Instant;

use ihub_core::HubServices;
use ihub_core::directory::RegistryDialect;
use reqwest::{Client, Method, RequestBuilder};

use crate::TRACING_TARGET_CLIENT;
use crate::config::{ClientConfig, Endpoints};
use crate::envelope::Envelope;
use crate::error::Error;

/// Header carrying the static API key.
const API_KEY_HEADER: &str = "X-Api-Key";

/// Inner client that holds the HTTP client and configuration.
struct HubClientInner {
    http: Client,
    config: ClientConfig,
    endpoints: Endpoints,
}

/// HTTP client for the hub backend.
///
/// Implements [`DirectoryProvider`], [`MessageLogProvider`] and
/// [`ApiKeyProvider`]. Cloning is cheap; clones share one connection pool.
///
/// [`DirectoryProvider`]: ihub_core::directory::DirectoryProvider
/// [`MessageLogProvider`]: ihub_core::activity::MessageLogProvider
/// [`ApiKeyProvider`]: ihub_core::activity::ApiKeyProvider
///
/// # Examples
///
/// ```rust,ignore
/// use ihub_client::{ClientConfig, HubClient};
///
/// let config = ClientConfig::new("https://hub.example.com/", "ek_live_...")?;
/// let client = HubClient::new(config)?;
/// let providers = client.into_services().directory.list().await?;
/// ```
#[derive(Clone)]
pub struct HubClient {
    inner: Arc<HubClientInner>,
}

impl std::fmt::Debug for HubClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HubClient")
            .field("endpoints", &self.inner.endpoints)
            .field("dialect", &self.inner.config.dialect)
            .finish_non_exhaustive()
    }
}

impl HubClient {
    /// Creates a new hub client with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the API key is empty, an endpoint
    /// cannot be resolved, or the HTTP client cannot be created.
    pub fn new(config: ClientConfig) -> ihub_core::Result<Self> {
        let endpoints = config.endpoints()?;
        let timeout = config.effective_timeout();

        tracing::debug!(
            target: TRACING_TARGET_CLIENT,
            registry = %endpoints.registry,
            dialect = %config.dialect,
            timeout_ms = timeout.as_millis(),
            "Creating hub client"
        );

        let http = Client::builder()
            .timeout(timeout)
            .user_agent(config.effective_user_agent())
            .build()
            .map_err(Error::from)?;

        let inner = HubClientInner {
            http,
            config,
            endpoints,
        };

        tracing::info!(
            target: TRACING_TARGET_CLIENT,
            "Hub client created successfully"
        );

        Ok(Self {
            inner: Arc::new(inner),
        })
    }

    /// Gets the client configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    /// Converts this client into [`HubServices`] for use with dependency injection.
    pub fn into_services(self) -> HubServices {
        HubServices::from_backend(self)
    }

    pub(crate) fn endpoints(&self) -> &Endpoints {
        &self.inner.endpoints
    }

    /// Returns the verb registering a provider under the configured dialect.
    pub(crate) fn create_method(&self) -> Method {
        match self.inner.config.dialect {
            RegistryDialect::Rest => Method::POST,
            RegistryDialect::Legacy => Method::PUT,
        }
    }

    /// Returns the verb updating a provider under the configured dialect.
    pub(crate) fn update_method(&self) -> Method {
        match self.inner.config.dialect {
            RegistryDialect::Rest => Method::PATCH,
            RegistryDialect::Legacy => Method::POST,
        }
    }

    /// Starts a request carrying the API key.
    pub(crate) fn request(&self, method: Method, url: &url::Url) -> RequestBuilder {
        self.inner
            .http
            .request(method, url.clone())
            .header(API_KEY_HEADER, &self.inner.config.api_key)
    }

    /// Sends a request and reads the reply envelope.
    pub(crate) async fn execute(
        &self,
        operation: &'static str,
        request: RequestBuilder,
    ) -> ihub_core::Result<Envelope> {
        let started_at = Instant::now();

        let response = request.send().await.map_err(|error| {
            tracing::warn!(
                target: TRACING_TARGET_CLIENT,
                operation,
                error = %error,
                elapsed_ms = started_at.elapsed().as_millis(),
                "Request failed before a reply"
            );
            Error::from(error)
        })?;

        let status = response.status();
        let bytes = response.bytes().await.map_err(Error::from)?;
        let elapsed = started_at.elapsed();

        let envelope = Envelope::read(status, &bytes);
        match &envelope {
            Ok(envelope) => tracing::debug!(
                target: TRACING_TARGET_CLIENT,
                operation,
                status_code = envelope.status().as_u16(),
                elapsed_ms = elapsed.as_millis(),
                "Request completed"
            ),
            Err(error) => tracing::warn!(
                target: TRACING_TARGET_CLIENT,
                operation,
                status_code = status.as_u16(),
                error = %error,
                elapsed_ms = elapsed.as_millis(),
                "Backend reported a failure"
            ),
        }

        envelope
    }
}
