//! JSON-RPC 2.0 client over HTTP.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::SimulatorError;

/// Outgoing JSON-RPC request envelope.
#[derive(Debug, Serialize)]
struct RpcRequest<'a, P> {
    jsonrpc: &'static str,
    id: u64,
    method: &'a str,
    params: P,
}

/// Incoming JSON-RPC response envelope.
#[derive(Debug, Deserialize)]
struct RpcResponse {
    #[serde(default)]
    result: Option<serde_json::Value>,
    #[serde(default)]
    error: Option<RpcErrorObject>,
}

/// JSON-RPC error object.
#[derive(Debug, Deserialize)]
struct RpcErrorObject {
    code: i64,
    message: String,
}

/// Thin JSON-RPC client for an Ethereum node.
///
/// Request ids increase monotonically per client. Error objects become
/// [`SimulatorError::Rpc`]; a `null` or missing result is handed to the
/// caller's type so `Option<T>` results work.
#[derive(Debug)]
pub struct JsonRpcClient {
    http: reqwest::Client,
    url: String,
    next_id: AtomicU64,
}

impl JsonRpcClient {
    /// Creates a client for the node at `url`.
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            url: url.into(),
            next_id: AtomicU64::new(1),
        }
    }

    /// Endpoint this client talks to.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Sends one request and decodes its result.
    ///
    /// # Errors
    ///
    /// Returns [`SimulatorError::Transport`] on HTTP failure,
    /// [`SimulatorError::Rpc`] if the node returns an error object, and
    /// [`SimulatorError::MalformedResponse`] if the result does not decode
    /// as `R`.
    pub async fn request<P, R>(&self, method: &str, params: P) -> Result<R, SimulatorError>
    where
        P: Serialize + Send,
        R: DeserializeOwned,
    {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let body = RpcRequest {
            jsonrpc: "2.0",
            id,
            method,
            params,
        };

        tracing::trace!(method, id, "rpc request");
        let response: RpcResponse = self
            .http
            .post(&self.url)
            .json(&body)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        into_result(method, response)
    }
}

fn into_result<R: DeserializeOwned>(method: &str, response: RpcResponse) -> Result<R, SimulatorError> {
    if let Some(error) = response.error {
        return Err(SimulatorError::Rpc {
            code: error.code,
            message: error.message,
        });
    }
    let value = response.result.unwrap_or(serde_json::Value::Null);
    serde_json::from_value(value)
        .map_err(|e| SimulatorError::MalformedResponse(format!("{method}: {e}")))
}
