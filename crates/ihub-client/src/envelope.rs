//! Reply envelopes of the hub backend.
//!
//! Every endpoint answers `{ "success": bool, "error"?: string, ... }`.
//! Error replies may omit `success` and may add `details`.

use ihub_core::{Error, Result};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::Error as ClientError;

/// A reply body read as JSON.
#[derive(Debug)]
pub(crate) struct Envelope {
    status: StatusCode,
    body: Value,
}

impl Envelope {
    /// Reads a reply, turning logical failures into errors.
    ///
    /// A reply is accepted only when the status is a success and the body
    /// says `"success": true`.
    pub fn read(status: StatusCode, bytes: &[u8]) -> Result<Self> {
        let body = match serde_json::from_slice::<Value>(bytes) {
            Ok(body) => body,
            Err(error) if status.is_success() => return Err(ClientError::Serde(error).into()),
            Err(_) => return Err(failure(status, None)),
        };

        let success = body.get("success").and_then(Value::as_bool).unwrap_or(false);
        if !status.is_success() || !success {
            return Err(failure(status, Some(&body)));
        }

        Ok(Self { status, body })
    }

    /// Returns the HTTP status of the reply.
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Decodes the whole body.
    pub fn into_inner<T: DeserializeOwned>(self) -> Result<T> {
        serde_json::from_value(self.body).map_err(|error| ClientError::Serde(error).into())
    }

    /// Decodes the list under `key`; a missing or `null` list is empty.
    pub fn into_list<T: DeserializeOwned>(mut self, key: &str) -> Result<Vec<T>> {
        match self.body.get_mut(key).map(Value::take) {
            None | Some(Value::Null) => Ok(Vec::new()),
            Some(list) => {
                serde_json::from_value(list).map_err(|error| ClientError::Serde(error).into())
            }
        }
    }

    /// Decodes the object under `key`.
    pub fn into_field<T: DeserializeOwned>(mut self, key: &str) -> Result<T> {
        match self.body.get_mut(key).map(Value::take) {
            None | Some(Value::Null) => Err(Error::serialization()
                .with_message(format!("reply carries no '{key}'"))),
            Some(value) => {
                serde_json::from_value(value).map_err(|error| ClientError::Serde(error).into())
            }
        }
    }
}

/// Classifies a logical failure by status code.
fn failure(status: StatusCode, body: Option<&Value>) -> Error {
    let error = match status {
        StatusCode::NOT_FOUND => Error::not_found(),
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Error::authentication(),
        StatusCode::BAD_REQUEST => Error::invalid_input(),
        _ => Error::rejected(),
    };

    let text = |key: &str| body.and_then(|body| body.get(key)).and_then(Value::as_str);
    let message = match (text("error"), text("details")) {
        (Some(error), Some(details)) => format!("{error} ({details})"),
        (Some(error), None) => error.to_owned(),
        (None, _) => format!("request failed with HTTP {}", status.as_u16()),
    };

    error.with_message(message)
}
