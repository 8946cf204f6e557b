#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

/// Tracing target for request execution.
pub const TRACING_TARGET_CLIENT: &str = "ihub_client::client";

/// Tracing target for registry calls.
pub const TRACING_TARGET_DIRECTORY: &str = "ihub_client::directory";

/// Tracing target for message log and dispatch calls.
pub const TRACING_TARGET_ACTIVITY: &str = "ihub_client::activity";

mod activity;
mod client;
mod config;
mod directory;
mod envelope;
mod error;
mod keys;

pub use crate::client::HubClient;
pub use crate::config::{ClientConfig, DEFAULT_TIMEOUT};
