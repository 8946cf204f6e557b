//! Hub services container for dependency injection.
//!
//! This module provides the [`HubServices`] struct which holds every service
//! a hub session talks to.

use crate::activity::{ActivityService, ApiKeyProvider, ApiKeyService, MessageLogProvider};
use crate::directory::{DirectoryProvider, DirectoryService};

/// Container for hub services.
#[derive(Debug, Clone)]
pub struct HubServices {
    /// Provider registry.
    pub directory: DirectoryService,
    /// Message logs, retries and test dispatch.
    pub activity: ActivityService,
    /// API key listing.
    pub keys: ApiKeyService,
}

impl HubServices {
    /// Creates a new hub services container.
    pub fn new(directory: DirectoryService, activity: ActivityService, keys: ApiKeyService) -> Self {
        Self {
            directory,
            activity,
            keys,
        }
    }

    /// Creates a container backed by a single backend implementation.
    pub fn from_backend<B>(backend: B) -> Self
    where
        B: DirectoryProvider + MessageLogProvider + ApiKeyProvider + Clone + 'static,
    {
        Self {
            directory: DirectoryService::new(backend.clone()),
            activity: ActivityService::new(backend.clone()),
            keys: ApiKeyService::new(backend),
        }
    }
}
