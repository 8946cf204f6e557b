#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

/// Tracing target for the mock HTTP server.
pub const TRACING_TARGET_SERVER: &str = "ihub_test::server";

mod mock;

pub use mock::{MOCK_API_KEY, MockDirectory, MockHubServer, create_mock_services};
