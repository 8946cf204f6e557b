//! Mock implementations of the hub backend for testing.
//!
//! [`MockDirectory`] keeps everything in memory and implements the provider
//! traits of ihub-core directly. [`MockHubServer`] puts the same backend
//! behind the hub's HTTP endpoints.

mod directory;
mod server;

pub use directory::MockDirectory;
use ihub_core::HubServices;
pub use server::{MOCK_API_KEY, MockHubServer};

/// Creates a complete set of hub services over an empty mock backend.
pub fn create_mock_services() -> HubServices {
    HubServices::from_backend(MockDirectory::new())
}
