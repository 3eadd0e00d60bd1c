use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;

/// Why a remote procedure call produced no usable result
#[derive(thiserror::Error, Debug)]
pub enum RpcError {
    /// Connection refused, timeout, non-2xx status, ...
    #[error("Could not reach the JSON-RPC endpoint")]
    Transport(#[from] reqwest::Error),
    /// The endpoint answered, but not with a JSON-RPC response for our request
    #[error("Invalid JSON-RPC response: {0}")]
    Protocol(String),
    /// A well-formed response whose `error` member is set
    #[error("Remote procedure failed: {message}")]
    RemoteRejected { code: Option<i64>, message: String },
}

/// Invoke named procedures on a JSON-RPC endpoint. `JsonRpcClient` talks HTTP;
/// tests substitute their own implementation.
#[async_trait]
pub trait RpcClient: Send + Sync {
    /// Call `method` with positional `params`, returning the response's
    /// `result` member
    async fn call(
        &self,
        method: &str,
        params: Vec<Value>,
    ) -> Result<Value, RpcError>;
}

#[derive(Serialize)]
struct RpcRequest<'a> {
    method: &'a str,
    params: &'a [Value],
    id: u64,
}

#[derive(Deserialize)]
struct RpcResponse {
    #[serde(default)]
    id: Value,
    #[serde(default)]
    result: Value,
    #[serde(default)]
    error: Value,
}

/// JSON-RPC 1.0 over HTTP: every call is a `POST` of
/// `{"method": ..., "params": [...], "id": n}` to `base_url`, answered with
/// `{"id": n, "result": ..., "error": null}`.
///
/// One instance is built at startup and shared, so that the underlying
/// connection pool is reused across requests.
pub struct JsonRpcClient {
    http_client: Client,
    base_url: String,
    next_id: AtomicU64,
}

impl JsonRpcClient {
    pub fn new(
        base_url: String,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let http_client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http_client,
            base_url,
            next_id: AtomicU64::new(1),
        })
    }
}

#[async_trait]
impl RpcClient for JsonRpcClient {
    #[tracing::instrument(
        name = "Calling remote procedure",
        skip(self, params),
        fields(rpc.id = tracing::field::Empty),
    )]
    async fn call(
        &self,
        method: &str,
        params: Vec<Value>,
    ) -> Result<Value, RpcError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        tracing::Span::current().record("rpc.id", id);

        let request_body = RpcRequest {
            method,
            params: &params,
            id,
        };

        let body = self
            .http_client
            .post(&self.base_url)
            .json(&request_body)
            .send()
            .await?
            // 4xx/5xx never carry a usable JSON-RPC response
            .error_for_status()?
            .bytes()
            .await?;

        let response: RpcResponse = serde_json::from_slice(&body)
            .map_err(|e| RpcError::Protocol(format!("could not decode response body: {e}")))?;

        if !id_matches(&response.id, id) {
            return Err(RpcError::Protocol(format!(
                "expected response id {id}, got {}",
                response.id
            )));
        }

        match response.error {
            Value::Null => Ok(response.result),
            error => Err(remote_rejection(error)),
        }
    }
}

/// Some servers echo the id back as a string
fn id_matches(
    received: &Value,
    sent: u64,
) -> bool {
    match received {
        Value::Number(n) => n.as_u64() == Some(sent),
        Value::String(s) => s.parse::<u64>().ok() == Some(sent),
        _ => false,
    }
}

/// GetResponse reports failures as `{"message": "...", "code": -1}`; other
/// servers send a bare string
fn remote_rejection(error: Value) -> RpcError {
    let code = error.get("code").and_then(Value::as_i64);
    let message = match error.get("message").and_then(Value::as_str) {
        Some(message) => message.to_string(),
        None => match error {
            Value::String(s) => s,
            other => other.to_string(),
        },
    };
    RpcError::RemoteRejected { code, message }
}
