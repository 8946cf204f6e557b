//! Mock hub HTTP server.

use std::io;
use std::net::{Ipv4Addr, SocketAddr};

use axum::extract::{Query, Request, State};
use axum::http::StatusCode;
use axum::middleware::{Next, from_fn};
use axum::response::{IntoResponse, Response};
use axum::routing::{MethodRouter, get, post};
use axum::{Json, Router};
use ihub_core::activity::{
    ApiKeyProvider, DEFAULT_LOG_LIMIT, MessageLogProvider, TestMessage, clamp_log_limit,
};
use ihub_core::directory::{
    CreateProviderRequest, DirectoryProvider, RegistryDialect, UpdateProviderRequest,
};
use ihub_core::provider::{CredentialGroup, Credentials, FieldValues, ProviderCode, ProviderType};
use ihub_core::{Error, ErrorKind, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use super::MockDirectory;
use crate::TRACING_TARGET_SERVER;

/// API key the mock server accepts in the `X-Api-Key` header.
pub const MOCK_API_KEY: &str = "ek_test_j8h3k2n4m5p6q7r8";

/// Mock hub backend served over HTTP on an ephemeral local port.
///
/// Routes are `/providers`, `/logs`, `/retry`, `/send` and `/keys`. Every
/// route requires [`MOCK_API_KEY`]. The server stops when dropped.
#[derive(Debug)]
pub struct MockHubServer {
    addr: SocketAddr,
    backend: MockDirectory,
    handle: JoinHandle<()>,
}

#[derive(Clone)]
struct ServerState {
    backend: MockDirectory,
}

impl MockHubServer {
    /// Starts a server over an empty backend.
    pub async fn start(dialect: RegistryDialect) -> io::Result<Self> {
        Self::start_with(MockDirectory::new(), dialect).await
    }

    /// Starts a server over `backend`.
    pub async fn start_with(backend: MockDirectory, dialect: RegistryDialect) -> io::Result<Self> {
        let listener = TcpListener::bind((Ipv4Addr::LOCALHOST, 0)).await?;
        let addr = listener.local_addr()?;
        let router = router(ServerState { backend: backend.clone() }, dialect);

        let handle = tokio::spawn(async move {
            if let Err(error) = axum::serve(listener, router).await {
                tracing::error!(
                    target: TRACING_TARGET_SERVER,
                    error = %error,
                    "Mock hub server stopped"
                );
            }
        });

        tracing::debug!(
            target: TRACING_TARGET_SERVER,
            %addr,
            %dialect,
            "Mock hub server listening"
        );

        Ok(Self {
            addr,
            backend,
            handle,
        })
    }

    /// Returns the absolute URL of `path` on this server.
    pub fn url(&self, path: &str) -> String {
        format!("http://{}/{}", self.addr, path.trim_start_matches('/'))
    }

    /// Returns the socket address the server listens on.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Returns the backend behind the server.
    pub fn backend(&self) -> &MockDirectory {
        &self.backend
    }
}

impl Drop for MockHubServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn router(state: ServerState, dialect: RegistryDialect) -> Router {
    let registry: MethodRouter<ServerState> = match dialect {
        RegistryDialect::Rest => get(list_providers)
            .post(create_provider)
            .patch(update_provider)
            .delete(delete_provider),
        RegistryDialect::Legacy => get(list_providers)
            .put(create_provider)
            .post(update_provider)
            .delete(delete_provider),
    };

    Router::new()
        .route("/providers", registry)
        .route("/logs", get(list_logs))
        .route("/retry", post(retry_message))
        .route("/send", post(send_message))
        .route("/keys", get(list_keys))
        .layer(from_fn(require_api_key))
        .with_state(state)
}

async fn require_api_key(request: Request, next: Next) -> Response {
    let authorized = request
        .headers()
        .get("x-api-key")
        .is_some_and(|value| value.as_bytes() == MOCK_API_KEY.as_bytes());

    if !authorized {
        tracing::warn!(
            target: TRACING_TARGET_SERVER,
            path = %request.uri().path(),
            "Rejected request without a valid API key"
        );
        let body = json!({ "error": "Invalid API key" });
        return (StatusCode::UNAUTHORIZED, Json(body)).into_response();
    }

    next.run(request).await
}

/// Wraps a payload into a `{ "success": true, ... }` reply.
fn success(payload: impl Serialize) -> Response {
    let mut body = match serde_json::to_value(payload) {
        Ok(Value::Object(map)) => map,
        Ok(other) => Map::from_iter([("data".to_owned(), other)]),
        Err(error) => return failure(Error::serialization().with_source(error)),
    };
    body.insert("success".to_owned(), Value::Bool(true));
    (StatusCode::OK, Json(Value::Object(body))).into_response()
}

/// Maps an error onto the status code and body the hub backend uses.
fn failure(error: Error) -> Response {
    let status = match error.kind() {
        ErrorKind::InvalidInput => StatusCode::BAD_REQUEST,
        ErrorKind::Authentication => StatusCode::UNAUTHORIZED,
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::Rejected => StatusCode::CONFLICT,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    let message = error
        .message
        .clone()
        .unwrap_or_else(|| error.kind_str().to_owned());

    (status, Json(json!({ "success": false, "error": message }))).into_response()
}

fn reply<T: Serialize>(result: Result<T>) -> Response {
    match result {
        Ok(payload) => success(payload),
        Err(error) => failure(error),
    }
}

fn text<'a>(body: &'a Map<String, Value>, key: &str) -> &'a str {
    body.get(key).and_then(Value::as_str).unwrap_or_default()
}

/// Reads the credential fields of `group` out of a request body.
fn credentials(group: CredentialGroup, body: &Map<String, Value>) -> Result<Credentials> {
    let values = group
        .fields()
        .iter()
        .map(|field| (*field, text(body, field.as_ref()).to_owned()))
        .collect::<FieldValues>();
    Credentials::from_fields(group, &values)
}

async fn list_providers(State(state): State<ServerState>) -> Response {
    let result = state.backend.list().await;
    reply(result.map(|providers| json!({ "providers": providers })))
}

fn create_request(body: &Map<String, Value>) -> Result<CreateProviderRequest> {
    let provider_type = ProviderType::from_wire(text(body, "provider_type"));
    CreateProviderRequest::new(
        text(body, "provider_name"),
        ProviderCode::new(text(body, "provider_code"))?,
        provider_type,
        credentials(provider_type.credential_group(), body)?,
    )
}

/// Decodes an update against the stored type of the addressed provider.
fn update_request(
    backend: &MockDirectory,
    body: &Map<String, Value>,
) -> Result<UpdateProviderRequest> {
    let code = ProviderCode::new(text(body, "provider_code"))?;
    let provider_type = backend
        .provider_type(&code)
        .ok_or_else(|| Error::not_found().with_message("Provider not found"))?;
    let credentials = credentials(provider_type.credential_group(), body)?;
    Ok(UpdateProviderRequest::new(code, credentials))
}

async fn create_provider(
    State(state): State<ServerState>,
    Json(body): Json<Map<String, Value>>,
) -> Response {
    match create_request(&body) {
        Ok(request) => reply(state.backend.create(&request).await),
        Err(error) => failure(error),
    }
}

async fn update_provider(
    State(state): State<ServerState>,
    Json(body): Json<Map<String, Value>>,
) -> Response {
    match update_request(&state.backend, &body) {
        Ok(request) => reply(state.backend.update(&request).await),
        Err(error) => failure(error),
    }
}

#[derive(Debug, Deserialize)]
struct DeleteQuery {
    #[serde(default)]
    provider_code: String,
}

async fn delete_provider(
    State(state): State<ServerState>,
    Query(query): Query<DeleteQuery>,
) -> Response {
    match ProviderCode::new(&query.provider_code) {
        Ok(code) => reply(state.backend.delete(&code).await),
        Err(_) => failure(Error::invalid_input().with_message("Missing provider_code")),
    }
}

#[derive(Debug, Deserialize)]
struct LogsQuery {
    limit: Option<u32>,
    message_id: Option<String>,
}

async fn list_logs(State(state): State<ServerState>, Query(query): Query<LogsQuery>) -> Response {
    if let Some(message_id) = query.message_id {
        let result = state.backend.message_details(&message_id).await;
        return reply(result.map(|details| json!({ "message": details })));
    }

    let limit = clamp_log_limit(query.limit.unwrap_or(DEFAULT_LOG_LIMIT));
    let result = state.backend.list_logs(limit).await;
    reply(result.map(|messages| json!({ "count": messages.len(), "messages": messages })))
}

async fn retry_message(
    State(state): State<ServerState>,
    Json(body): Json<Map<String, Value>>,
) -> Response {
    let message_id = text(&body, "message_id");
    if message_id.is_empty() {
        return failure(Error::invalid_input().with_message("Missing message_id"));
    }

    reply(state.backend.retry_message(message_id).await)
}

async fn send_message(
    State(state): State<ServerState>,
    Json(body): Json<Map<String, Value>>,
) -> Response {
    let subject = body
        .get("subject")
        .and_then(Value::as_str)
        .map(str::to_owned);
    let message = TestMessage::new(
        text(&body, "provider"),
        text(&body, "recipient"),
        text(&body, "message"),
        subject,
    );

    match message {
        Ok(message) => reply(state.backend.send(&message).await),
        Err(error) => failure(error),
    }
}

async fn list_keys(State(state): State<ServerState>) -> Response {
    let result = state.backend.list_keys().await;
    reply(result.map(|keys| json!({ "keys": keys })))
}
