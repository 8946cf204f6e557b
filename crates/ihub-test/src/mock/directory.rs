//! In-memory hub backend.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use ihub_core::activity::{
    ApiKey, ApiKeyProvider, DispatchReceipt, MessageDetails, MessageLogEntry, MessageLogProvider,
    MessageStatus, TestMessage,
};
use ihub_core::directory::{
    Acknowledgement, CreateProviderRequest, DirectoryProvider, RawProvider, UpdateProviderRequest,
};
use ihub_core::provider::{Credentials, ProviderCode, ProviderType};
use ihub_core::{Error, ErrorKind, Result};
use serde_json::{Map, Value};

#[derive(Debug, Default)]
struct State {
    providers: Vec<RawProvider>,
    logs: Vec<MessageLogEntry>,
    keys: Vec<ApiKey>,
    fail_next: Option<ErrorKind>,
    calls: Vec<&'static str>,
    sent: u32,
}

/// In-memory backend for testing.
///
/// Behaves like the hub backend: codes are unique, updates and deletes of
/// unknown codes fail with [`ErrorKind::NotFound`], delivered messages
/// cannot be retried. Clones share the same state.
#[derive(Debug, Clone, Default)]
pub struct MockDirectory {
    state: Arc<Mutex<State>>,
}

impl MockDirectory {
    /// Creates an empty backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the registry with raw entries.
    pub fn with_providers(self, providers: impl IntoIterator<Item = RawProvider>) -> Self {
        self.lock().providers.extend(providers);
        self
    }

    /// Seeds the message log, newest first.
    pub fn with_logs(self, logs: impl IntoIterator<Item = MessageLogEntry>) -> Self {
        self.lock().logs.extend(logs);
        self
    }

    /// Seeds the API keys.
    pub fn with_keys(self, keys: impl IntoIterator<Item = ApiKey>) -> Self {
        self.lock().keys.extend(keys);
        self
    }

    /// Makes the next call fail with `kind`, whatever it is.
    pub fn fail_next(&self, kind: ErrorKind) {
        self.lock().fail_next = Some(kind);
    }

    /// Returns the raw registry entries.
    pub fn providers(&self) -> Vec<RawProvider> {
        self.lock().providers.clone()
    }

    /// Returns the message log.
    pub fn logs(&self) -> Vec<MessageLogEntry> {
        self.lock().logs.clone()
    }

    /// Returns the names of the calls made so far, in order.
    pub fn calls(&self) -> Vec<&'static str> {
        self.lock().calls.clone()
    }

    /// Returns the type of a registered provider.
    pub fn provider_type(&self, code: &ProviderCode) -> Option<ProviderType> {
        self.lock()
            .providers
            .iter()
            .find(|raw| raw.provider_code == code.as_str())
            .map(|raw| {
                raw.provider_type
                    .as_deref()
                    .map_or(ProviderType::Custom, ProviderType::from_wire)
            })
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Records the call and consumes an injected failure.
    fn enter(&self, call: &'static str) -> Result<MutexGuard<'_, State>> {
        let mut state = self.lock();
        state.calls.push(call);
        match state.fail_next.take() {
            Some(kind) => Err(Error::new(kind).with_message("injected failure")),
            None => Ok(state),
        }
    }
}

fn stored_config(credentials: &Credentials) -> Option<Value> {
    if credentials.is_empty() {
        return None;
    }

    let mut config = Map::new();
    credentials.write_into(&mut config);
    Some(Value::Object(config))
}

fn provider_not_found() -> Error {
    Error::not_found().with_message("Provider not found")
}

fn message_not_found() -> Error {
    Error::not_found().with_message("Message not found")
}

#[async_trait::async_trait]
impl DirectoryProvider for MockDirectory {
    async fn list(&self) -> Result<Vec<RawProvider>> {
        let state = self.enter("list")?;
        Ok(state.providers.clone())
    }

    async fn create(&self, request: &CreateProviderRequest) -> Result<Acknowledgement> {
        let mut state = self.enter("create")?;
        let code = request.code.as_str();
        if state.providers.iter().any(|raw| raw.provider_code == code) {
            return Err(Error::rejected().with_message("Provider already exists"));
        }

        state.providers.push(RawProvider {
            provider_code: code.to_owned(),
            provider_name: Some(request.name.clone()),
            provider_type: Some(request.provider_type.to_string()),
            config: stored_config(&request.credentials),
            connection_status: Some("not_configured".to_owned()),
            last_attempt_at: None,
        });

        Ok(Acknowledgement {
            provider_code: Some(code.to_owned()),
            message: Some("Provider created".to_owned()),
        })
    }

    async fn update(&self, request: &UpdateProviderRequest) -> Result<Acknowledgement> {
        let mut state = self.enter("update")?;
        let code = request.code.as_str();
        let raw = state
            .providers
            .iter_mut()
            .find(|raw| raw.provider_code == code)
            .ok_or_else(provider_not_found)?;

        raw.config = stored_config(&request.credentials);
        raw.connection_status = Some("configured".to_owned());

        Ok(Acknowledgement {
            provider_code: Some(code.to_owned()),
            message: Some("Provider updated".to_owned()),
        })
    }

    async fn delete(&self, code: &ProviderCode) -> Result<Acknowledgement> {
        let mut state = self.enter("delete")?;
        let before = state.providers.len();
        state.providers.retain(|raw| raw.provider_code != code.as_str());
        if state.providers.len() == before {
            return Err(provider_not_found());
        }

        Ok(Acknowledgement {
            provider_code: Some(code.to_string()),
            message: Some("Provider deleted".to_owned()),
        })
    }
}

#[async_trait::async_trait]
impl MessageLogProvider for MockDirectory {
    async fn list_logs(&self, limit: u32) -> Result<Vec<MessageLogEntry>> {
        let state = self.enter("list_logs")?;
        let limit = usize::try_from(limit).unwrap_or(usize::MAX);
        Ok(state.logs.iter().take(limit).cloned().collect())
    }

    async fn message_details(&self, message_id: &str) -> Result<MessageDetails> {
        let state = self.enter("message_details")?;
        let entry = state
            .logs
            .iter()
            .find(|entry| entry.message_id == message_id)
            .ok_or_else(message_not_found)?;

        Ok(MessageDetails {
            entry: entry.clone(),
            ..MessageDetails::default()
        })
    }

    async fn retry_message(&self, message_id: &str) -> Result<DispatchReceipt> {
        let mut state = self.enter("retry_message")?;
        let entry = state
            .logs
            .iter_mut()
            .find(|entry| entry.message_id == message_id)
            .ok_or_else(message_not_found)?;

        if entry.status.is_delivered() {
            return Err(Error::invalid_input().with_message("Message already delivered"));
        }
        entry.attempts += 1;
        entry.status = MessageStatus::Delivered;

        Ok(DispatchReceipt {
            message_id: entry.message_id.clone(),
            status: Some(entry.status),
            attempts: Some(entry.attempts),
            message: None,
        })
    }

    async fn send(&self, message: &TestMessage) -> Result<DispatchReceipt> {
        let mut state = self.enter("send")?;
        let code = message.provider.as_str();
        if !state.providers.iter().any(|raw| raw.provider_code == code) {
            return Err(provider_not_found());
        }

        state.sent += 1;
        let entry = MessageLogEntry {
            message_id: format!("msg_test_{}", state.sent),
            provider: code.to_owned(),
            recipient: message.recipient.clone(),
            status: MessageStatus::Sent,
            attempts: 1,
            max_attempts: 3,
            ..MessageLogEntry::default()
        };
        let receipt = DispatchReceipt {
            message_id: entry.message_id.clone(),
            status: Some(entry.status),
            attempts: Some(entry.attempts),
            message: Some("Message queued".to_owned()),
        };
        state.logs.insert(0, entry);

        Ok(receipt)
    }
}

#[async_trait::async_trait]
impl ApiKeyProvider for MockDirectory {
    async fn list_keys(&self) -> Result<Vec<ApiKey>> {
        let state = self.enter("list_keys")?;
        Ok(state.keys.clone())
    }
}

#[cfg(test)]
mod tests {
    use ihub_core::provider::{CredentialField, FieldValues};

    use super::*;

    fn wappi() -> Credentials {
        let values = FieldValues::from([
            (CredentialField::WappiToken, "tok".to_owned()),
            (CredentialField::WappiProfileId, "p1".to_owned()),
        ]);
        Credentials::from_fields(ProviderType::WhatsappBusiness.credential_group(), &values)
            .unwrap()
    }

    fn create_request(code: &str) -> CreateProviderRequest {
        CreateProviderRequest::new(
            "WhatsApp",
            ProviderCode::new(code).unwrap(),
            ProviderType::WhatsappBusiness,
            wappi(),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn create_stores_config_and_rejects_duplicates() {
        let backend = MockDirectory::new();
        backend.create(&create_request("ek_wa")).await.unwrap();

        let raw = backend.list().await.unwrap();
        assert_eq!(raw.len(), 1);
        assert_eq!(raw[0].config.as_ref().unwrap()["wappi_token"], "tok");

        let error = backend.create(&create_request("ek_wa")).await.unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Rejected);
    }

    #[tokio::test]
    async fn injected_failure_fires_once() {
        let backend = MockDirectory::new();
        backend.fail_next(ErrorKind::NetworkError);

        assert_eq!(backend.list().await.unwrap_err().kind(), ErrorKind::NetworkError);
        assert!(backend.list().await.is_ok());
        assert_eq!(backend.calls(), ["list", "list"]);
    }

    #[tokio::test]
    async fn delivered_messages_are_not_retried() {
        let backend = MockDirectory::new().with_logs([MessageLogEntry {
            message_id: "msg_1".to_owned(),
            status: MessageStatus::Failed,
            attempts: 1,
            ..MessageLogEntry::default()
        }]);

        let receipt = backend.retry_message("msg_1").await.unwrap();
        assert_eq!(receipt.attempts, Some(2));

        let error = backend.retry_message("msg_1").await.unwrap_err();
        assert_eq!(error.kind(), ErrorKind::InvalidInput);
    }
}
