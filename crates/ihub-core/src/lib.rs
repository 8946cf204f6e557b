#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

/// Tracing target for provider directory operations.
pub const TRACING_TARGET_DIRECTORY: &str = "ihub_core::directory";

/// Tracing target for credential file import.
pub const TRACING_TARGET_IMPORT: &str = "ihub_core::import";

/// Tracing target for message log, dispatch and API key operations.
pub const TRACING_TARGET_ACTIVITY: &str = "ihub_core::activity";

/// Tracing target for session state changes.
pub const TRACING_TARGET_HUB: &str = "ihub_core::hub";

mod de;
mod error;

pub mod activity;
pub mod dashboard;
pub mod directory;
pub mod hub;
#[doc(hidden)]
pub mod prelude;
pub mod provider;
mod services;

pub use error::{BoxedError, Error, ErrorKind, Result};
pub use services::HubServices;
