//! JSON document transport.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::Value;
use tracing::debug;

use super::error::SyncError;

/// Moves whole JSON documents to and from the remote database.
///
/// Both calls resolve to `None` when the server sends an empty or `null`
/// body.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, url: &str) -> Result<Option<Value>, SyncError>;

    async fn put(&self, url: &str, body: &Value) -> Result<Option<Value>, SyncError>;
}

/// [`Transport`] over HTTP(S) using reqwest.
#[derive(Debug, Clone, Default)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Transport whose requests give up after `timeout`.
    pub fn with_timeout(timeout: Duration) -> Result<Self, SyncError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SyncError::Http(e.to_string()))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, url: &str) -> Result<Option<Value>, SyncError> {
        debug!(url = without_query(url), "GET");
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| SyncError::Http(e.to_string()))?;
        read_body(response).await
    }

    async fn put(&self, url: &str, body: &Value) -> Result<Option<Value>, SyncError> {
        debug!(url = without_query(url), "PUT");
        let response = self
            .client
            .put(url)
            .json(body)
            .send()
            .await
            .map_err(|e| SyncError::Http(e.to_string()))?;
        read_body(response).await
    }
}

async fn read_body(response: reqwest::Response) -> Result<Option<Value>, SyncError> {
    let status = response.status();
    let text = response
        .text()
        .await
        .map_err(|e| SyncError::Http(e.to_string()))?;

    if !status.is_success() {
        return Err(SyncError::Remote {
            status: status.as_u16(),
            message: error_message(&text, status),
        });
    }

    if text.trim().is_empty() {
        return Ok(None);
    }
    let value: Value = serde_json::from_str(&text).map_err(|e| SyncError::Decode(e.to_string()))?;
    Ok(if value.is_null() { None } else { Some(value) })
}

/// Pull the human-readable part out of an error response.
///
/// The database answers with `{"error": "Permission denied"}`; other
/// services nest it as `{"error": {"message": ...}}`.
fn error_message(text: &str, status: StatusCode) -> String {
    if let Ok(value) = serde_json::from_str::<Value>(text) {
        match &value["error"] {
            Value::String(message) => return message.clone(),
            Value::Object(inner) => {
                if let Some(Value::String(message)) = inner.get("message") {
                    return message.clone();
                }
            }
            _ => {}
        }
    }

    let text = text.trim();
    if text.is_empty() {
        format!("Server returned status {}", status)
    } else {
        text.to_string()
    }
}

/// Query strings carry the bearer token; keep them out of logs.
fn without_query(url: &str) -> &str {
    url.split('?').next().unwrap_or(url)
}
