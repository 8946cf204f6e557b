//! Operator session over the hub services.
//!
//! A [`Hub`] owns the locally held view of the backend: the provider list,
//! the unsubmitted forms, which dialogs are open and which operations are in
//! flight. Every operation awaits its request and applies the response as it
//! arrives. Nothing is queued and there is no concurrency token, so when two
//! sessions edit the same provider the last accepted write wins.

mod state;

pub use state::{ActivityState, DialogState, DirectoryState, DraftState};

use crate::activity::{
    DEFAULT_LOG_LIMIT, DispatchReceipt, MAX_LOG_LIMIT, MessageDetails, TestMessage,
};
use crate::dashboard::DashboardStats;
use crate::directory::{Acknowledgement, CreateProviderRequest, UpdateProviderRequest};
use crate::provider::{
    ConfigDraft, Credentials, FieldValues, ImportReport, ProviderCode, ProviderDraft, ProviderType,
    import_file, is_submittable,
};
use crate::services::HubServices;
use crate::{Error, Result, TRACING_TARGET_HUB};

/// An operator session.
#[derive(Debug, Clone)]
pub struct Hub {
    services: HubServices,
    directory: DirectoryState,
    drafts: DraftState,
    dialogs: DialogState,
    activity: ActivityState,
}

impl Hub {
    /// Creates a session with nothing loaded yet.
    pub fn new(services: HubServices) -> Self {
        Self {
            services,
            directory: DirectoryState::default(),
            drafts: DraftState::default(),
            dialogs: DialogState::default(),
            activity: ActivityState::default(),
        }
    }

    pub fn services(&self) -> &HubServices {
        &self.services
    }

    pub fn directory(&self) -> &DirectoryState {
        &self.directory
    }

    pub fn drafts(&self) -> &DraftState {
        &self.drafts
    }

    pub fn dialogs(&self) -> &DialogState {
        &self.dialogs
    }

    pub fn activity(&self) -> &ActivityState {
        &self.activity
    }

    /// Reloads the provider list.
    ///
    /// On failure the previous list is kept. The loading flag is cleared
    /// either way.
    pub async fn refresh_providers(&mut self) -> Result<()> {
        self.directory.loading = true;
        let result = self.services.directory.list().await;
        self.directory.loading = false;

        self.directory.replace(result?);
        Ok(())
    }

    /// Opens the add-provider dialog, keeping any earlier draft.
    pub fn open_add(&mut self) {
        self.dialogs.add_open = true;
    }

    /// Closes the add-provider dialog, keeping the draft.
    pub fn close_add(&mut self) {
        self.dialogs.add_open = false;
    }

    /// Returns the add-provider draft for editing.
    pub fn add_draft_mut(&mut self) -> &mut ProviderDraft {
        &mut self.drafts.add
    }

    /// Reads a credential file into the add-provider draft.
    pub async fn import_into_add_draft(&mut self, path: impl AsRef<std::path::Path>) -> ImportReport {
        import_file(&mut self.drafts.add.fields, path).await
    }

    /// Submits the add-provider draft.
    ///
    /// # Errors
    ///
    /// Returns an invalid input error without contacting the registry when
    /// the draft is not submittable.
    pub async fn submit_add_draft(&mut self) -> Result<Acknowledgement> {
        let request = self.drafts.add.to_request()?;
        self.submit_create(&request).await
    }

    /// Registers a provider.
    ///
    /// On success the provider list is reloaded, the add-provider draft is
    /// cleared and the add dialog closed. On failure both are left as they
    /// were.
    pub async fn create(
        &mut self,
        name: &str,
        code: &ProviderCode,
        provider_type: ProviderType,
        credentials: Credentials,
    ) -> Result<Acknowledgement> {
        let values = credentials
            .fields()
            .into_iter()
            .map(|(field, value)| (field, value.to_owned()))
            .collect::<FieldValues>();
        if !is_submittable(name, code.as_str(), Some(provider_type), &values) {
            return Err(Error::invalid_input()
                .with_message(format!("provider {code} is missing required fields")));
        }

        let request = CreateProviderRequest::new(name, code.clone(), provider_type, credentials)?;
        self.submit_create(&request).await
    }

    async fn submit_create(&mut self, request: &CreateProviderRequest) -> Result<Acknowledgement> {
        self.dialogs.saving = true;
        let result = self.services.directory.create(request).await;
        self.dialogs.saving = false;

        let ack = result?;
        self.drafts.add = ProviderDraft::default();
        self.dialogs.add_open = false;
        self.refresh_after("create").await;
        Ok(ack)
    }

    /// Opens the configuration dialog of a listed provider.
    ///
    /// The form starts empty; a draft already open for the same provider is
    /// kept.
    ///
    /// # Errors
    ///
    /// Returns a not found error when the code is not in the local list.
    pub fn open_config(&mut self, code: &ProviderCode) -> Result<&mut ConfigDraft> {
        let Some(record) = self.directory.record(code) else {
            return Err(Error::not_found().with_message(format!("provider {code} is not listed")));
        };
        let provider_type = record.provider_type;

        self.dialogs.config = Some(code.clone());
        let draft = match self.drafts.config.take() {
            Some(draft) if &draft.code == code => draft,
            _ => ConfigDraft::new(code.clone(), provider_type),
        };
        Ok(self.drafts.config.insert(draft))
    }

    /// Closes the configuration dialog, keeping the draft.
    pub fn close_config(&mut self) {
        self.dialogs.config = None;
    }

    /// Returns the open configuration draft for editing.
    pub fn config_draft_mut(&mut self) -> Option<&mut ConfigDraft> {
        self.drafts.config.as_mut()
    }

    /// Reads a credential file into the configuration draft.
    ///
    /// Reports a rejection when no configuration dialog is open.
    pub async fn import_into_config_draft(
        &mut self,
        path: impl AsRef<std::path::Path>,
    ) -> ImportReport {
        match self.drafts.config.as_mut() {
            Some(draft) => import_file(&mut draft.fields, path).await,
            None => ImportReport::Rejected("no configuration dialog is open".to_owned()),
        }
    }

    /// Submits the open configuration draft.
    ///
    /// # Errors
    ///
    /// Returns an invalid input error when no draft is open or a required
    /// field is empty.
    pub async fn save_config(&mut self) -> Result<Acknowledgement> {
        let Some(draft) = self.drafts.config.as_ref() else {
            return Err(Error::invalid_input().with_message("no configuration dialog is open"));
        };
        let request = draft.to_request()?;
        self.submit_update(&request).await
    }

    /// Replaces the credentials of a provider.
    ///
    /// Credentials of another group than the listed provider's type are
    /// rejected before any request is made.
    pub async fn update(
        &mut self,
        code: &ProviderCode,
        credentials: Credentials,
    ) -> Result<Acknowledgement> {
        if let Some(record) = self.directory.record(code) {
            let expected = record.provider_type.credential_group();
            if credentials.group() != expected {
                return Err(Error::invalid_input().with_message(format!(
                    "provider {code} takes {expected} credentials, got {}",
                    credentials.group()
                )));
            }
        }

        let request = UpdateProviderRequest::new(code.clone(), credentials);
        self.submit_update(&request).await
    }

    async fn submit_update(&mut self, request: &UpdateProviderRequest) -> Result<Acknowledgement> {
        self.dialogs.saving = true;
        let result = self.services.directory.update(request).await;
        self.dialogs.saving = false;

        let ack = result?;
        if self
            .drafts
            .config
            .as_ref()
            .is_some_and(|draft| draft.code == request.code)
        {
            self.drafts.config = None;
        }
        if self.dialogs.config.as_ref() == Some(&request.code) {
            self.dialogs.config = None;
        }
        self.refresh_after("update").await;
        Ok(ack)
    }

    /// Asks for confirmation before deleting a provider.
    pub fn request_delete(&mut self, code: &ProviderCode) {
        self.dialogs.delete = Some(code.clone());
    }

    /// Dismisses the delete confirmation.
    pub fn cancel_delete(&mut self) {
        self.dialogs.delete = None;
    }

    /// Deletes the provider awaiting confirmation.
    pub async fn confirm_delete(&mut self) -> Result<Acknowledgement> {
        let Some(code) = self.dialogs.delete.clone() else {
            return Err(Error::invalid_input().with_message("no provider awaits deletion"));
        };
        self.delete(&code).await
    }

    /// Deletes a provider.
    ///
    /// On success every view that refers to the code is closed and the list
    /// reloaded. On failure, including an unknown code, the local list is
    /// left as it was.
    pub async fn delete(&mut self, code: &ProviderCode) -> Result<Acknowledgement> {
        self.dialogs.deleting = true;
        let result = self.services.directory.delete(code).await;
        self.dialogs.deleting = false;

        let ack = result?;
        self.dialogs.close_for(code);
        if self.drafts.config.as_ref().is_some_and(|draft| &draft.code == code) {
            self.drafts.config = None;
        }
        self.refresh_after("delete").await;
        Ok(ack)
    }

    /// Reloads the message log.
    ///
    /// On failure the previous entries are kept.
    pub async fn refresh_logs(&mut self, limit: u32) -> Result<()> {
        self.activity.loading_logs = true;
        let result = self.services.activity.list_logs(limit).await;
        self.activity.loading_logs = false;

        self.activity.logs = result?;
        Ok(())
    }

    /// Opens the details dialog of a message and loads its details.
    ///
    /// The dialog stays open when loading fails.
    pub async fn open_log_details(&mut self, message_id: &str) -> Result<&MessageDetails> {
        self.dialogs.log_details = Some(message_id.to_owned());
        self.activity.details = None;

        self.activity.loading_details = true;
        let result = self.services.activity.message_details(message_id).await;
        self.activity.loading_details = false;

        Ok(&*self.activity.details.insert(result?))
    }

    /// Closes the details dialog.
    pub fn close_log_details(&mut self) {
        self.dialogs.log_details = None;
        self.activity.details = None;
    }

    /// Requests one manual delivery attempt, then reloads the log.
    pub async fn retry_message(&mut self, message_id: &str) -> Result<DispatchReceipt> {
        self.dialogs.retrying = Some(message_id.to_owned());
        let result = self.services.activity.retry_message(message_id).await;
        self.dialogs.retrying = None;

        let receipt = result?;
        let limit = self.log_limit();
        if let Err(error) = self.refresh_logs(limit).await {
            tracing::warn!(
                target: TRACING_TARGET_HUB,
                message_id,
                error = %error,
                "Message log could not be reloaded after retry"
            );
        }
        Ok(receipt)
    }

    /// Sends a test message.
    pub async fn send_test(&mut self, message: &TestMessage) -> Result<DispatchReceipt> {
        self.dialogs.saving = true;
        let result = self.services.activity.send(message).await;
        self.dialogs.saving = false;
        result
    }

    /// Reloads the API keys.
    ///
    /// On failure the previous keys are kept.
    pub async fn refresh_keys(&mut self) -> Result<()> {
        self.activity.loading_keys = true;
        let result = self.services.keys.list_keys().await;
        self.activity.loading_keys = false;

        self.activity.keys = result?;
        Ok(())
    }

    /// Aggregates the loaded providers and log entries.
    pub fn dashboard(&self) -> DashboardStats {
        DashboardStats::compute(&self.directory.records, &self.activity.logs)
    }

    /// Reuses the size of the loaded log, so a reload shows as many entries.
    fn log_limit(&self) -> u32 {
        u32::try_from(self.activity.logs.len())
            .map_or(MAX_LOG_LIMIT, |len| len.max(DEFAULT_LOG_LIMIT))
    }

    async fn refresh_after(&mut self, operation: &'static str) {
        if let Err(error) = self.refresh_providers().await {
            tracing::warn!(
                target: TRACING_TARGET_HUB,
                operation,
                error = %error,
                "Provider list could not be reloaded"
            );
        }
    }
}
