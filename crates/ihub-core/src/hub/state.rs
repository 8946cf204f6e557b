//! Explicit session state.

use std::collections::BTreeMap;

use crate::activity::{ApiKey, MessageDetails, MessageLogEntry};
use crate::provider::{ConfigDraft, ProviderCode, ProviderDraft, ProviderRecord};

/// Providers as last listed by the registry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectoryState {
    /// Records in registry order.
    pub records: Vec<ProviderRecord>,
    /// Whether the registry holds a configuration, by code.
    pub has_config: BTreeMap<ProviderCode, bool>,
    /// Set while a listing is in flight.
    pub loading: bool,
}

impl DirectoryState {
    /// Replaces the records and rebuilds the configuration lookup.
    pub fn replace(&mut self, records: Vec<ProviderRecord>) {
        self.has_config = records
            .iter()
            .map(|record| (record.code.clone(), record.has_stored_config))
            .collect();
        self.records = records;
    }

    /// Returns the record with the given code.
    pub fn record(&self, code: &ProviderCode) -> Option<&ProviderRecord> {
        self.records.iter().find(|record| &record.code == code)
    }

    /// Returns whether the registry reported a configuration for `code`.
    pub fn has_config(&self, code: &ProviderCode) -> bool {
        self.has_config.get(code).copied().unwrap_or(false)
    }
}

/// Unsubmitted forms.
///
/// Each draft survives failed submissions and is cleared only once the
/// registry accepts it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DraftState {
    /// The add-provider form.
    pub add: ProviderDraft,
    /// The credential form of the provider being configured.
    pub config: Option<ConfigDraft>,
}

/// Open dialogs and in-flight operations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DialogState {
    pub add_open: bool,
    /// Provider whose configuration dialog is open.
    pub config: Option<ProviderCode>,
    /// Provider awaiting delete confirmation.
    pub delete: Option<ProviderCode>,
    /// Message whose details are shown.
    pub log_details: Option<String>,
    pub saving: bool,
    pub deleting: bool,
    /// Message being retried.
    pub retrying: Option<String>,
}

impl DialogState {
    /// Closes every view that refers to `code`.
    pub fn close_for(&mut self, code: &ProviderCode) {
        if self.config.as_ref() == Some(code) {
            self.config = None;
        }
        if self.delete.as_ref() == Some(code) {
            self.delete = None;
        }
    }

    /// Returns whether any mutating operation is in flight.
    pub fn is_busy(&self) -> bool {
        self.saving || self.deleting || self.retrying.is_some()
    }
}

/// Message logs and API keys as last loaded.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActivityState {
    /// Log entries in backend order, newest first.
    pub logs: Vec<MessageLogEntry>,
    pub loading_logs: bool,
    /// Details of the message shown in the details dialog.
    pub details: Option<MessageDetails>,
    pub loading_details: bool,
    pub keys: Vec<ApiKey>,
    pub loading_keys: bool,
}
