//! Per-user JSON resources on the remote database.

use std::fmt;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use super::error::SyncError;
use super::transport::Transport;
use crate::auth::{AuthError, AuthProvider};

/// A list kept on the remote database, one document per user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    Recipes,
    ShoppingList,
}

impl Resource {
    pub fn name(&self) -> &'static str {
        match self {
            Resource::Recipes => "recipes",
            Resource::ShoppingList => "shopping-list",
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Remote database endpoint together with the collaborators needed to reach
/// it: a transport for the bytes and an auth provider for identity.
#[derive(Clone)]
pub struct Remote {
    base_url: String,
    transport: Arc<dyn Transport>,
    auth: Arc<dyn AuthProvider>,
}

impl Remote {
    pub fn new(
        base_url: impl Into<String>,
        transport: Arc<dyn Transport>,
        auth: Arc<dyn AuthProvider>,
    ) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            transport,
            auth,
        }
    }

    /// `<base>/<userId>/<resource>.json?auth=<token>`
    pub fn resource_url(&self, resource: Resource, user_id: &str, token: &str) -> String {
        format!(
            "{}/{}/{}.json?auth={}",
            self.base_url,
            urlencoding::encode(user_id),
            resource.name(),
            urlencoding::encode(token)
        )
    }

    /// Bearer token for the signed-in user.
    pub async fn id_token(&self) -> Result<String, SyncError> {
        self.auth.id_token().await.map_err(|e| match e {
            AuthError::NotSignedIn => SyncError::NotSignedIn,
            other => SyncError::Auth(other),
        })
    }

    /// GET the user's copy of `resource`.
    pub async fn fetch(&self, resource: Resource, token: &str) -> Result<Option<Value>, SyncError> {
        let url = self.resource_url(resource, &self.user_id()?, token);
        self.transport.get(&url).await
    }

    /// PUT `body` over the user's copy of `resource`.
    pub async fn store(
        &self,
        resource: Resource,
        token: &str,
        body: &Value,
    ) -> Result<Option<Value>, SyncError> {
        let url = self.resource_url(resource, &self.user_id()?, token);
        self.transport.put(&url, body).await
    }

    fn user_id(&self) -> Result<String, SyncError> {
        self.auth
            .active_user()
            .map(|user| user.uid)
            .ok_or(SyncError::NotSignedIn)
    }
}

/// Parse a fetched document into records.
///
/// An absent or `null` document is an empty list. `null` holes inside the
/// array are dropped. Any other shape is rejected.
pub fn decode_list<T: DeserializeOwned>(body: Option<Value>) -> Result<Vec<T>, SyncError> {
    let items = match body {
        None | Some(Value::Null) => return Ok(Vec::new()),
        Some(Value::Array(items)) => items,
        Some(other) => {
            return Err(SyncError::Decode(format!(
                "expected a list, got {}",
                json_kind(&other)
            )))
        }
    };

    let total = items.len();
    let records = items
        .into_iter()
        .filter(|item| !item.is_null())
        .map(|item| serde_json::from_value(item).map_err(|e| SyncError::Decode(e.to_string())))
        .collect::<Result<Vec<T>, _>>()?;

    if records.len() != total {
        debug!(skipped = total - records.len(), "Dropped empty slots from fetched list");
    }
    Ok(records)
}

pub fn encode_list<T: Serialize>(items: &[T]) -> Result<Value, SyncError> {
    serde_json::to_value(items).map_err(|e| SyncError::Encode(e.to_string()))
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}
