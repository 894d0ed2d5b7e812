//! In-memory collaborators for store and sync tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use crate::auth::{ActiveUser, AuthError, AuthProvider};
use crate::sync::{SyncError, Transport};

#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    pub method: &'static str,
    pub url: String,
    pub body: Option<Value>,
}

/// Transport that records requests and replays queued responses.
/// With nothing queued it answers `Ok(None)`.
#[derive(Default)]
pub struct FakeTransport {
    responses: Mutex<VecDeque<Result<Option<Value>, SyncError>>>,
    requests: Mutex<Vec<Request>>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond_with(&self, response: Result<Option<Value>, SyncError>) {
        self.responses.lock().unwrap().push_back(response);
    }

    pub fn requests(&self) -> Vec<Request> {
        self.requests.lock().unwrap().clone()
    }

    fn record(
        &self,
        method: &'static str,
        url: &str,
        body: Option<&Value>,
    ) -> Result<Option<Value>, SyncError> {
        self.requests.lock().unwrap().push(Request {
            method,
            url: url.to_string(),
            body: body.cloned(),
        });
        self.responses.lock().unwrap().pop_front().unwrap_or(Ok(None))
    }
}

#[async_trait]
impl Transport for FakeTransport {
    async fn get(&self, url: &str) -> Result<Option<Value>, SyncError> {
        self.record("GET", url, None)
    }

    async fn put(&self, url: &str, body: &Value) -> Result<Option<Value>, SyncError> {
        self.record("PUT", url, Some(body))
    }
}

/// Auth provider with a fixed user and token `token-<uid>`.
pub struct FakeAuth {
    user: Mutex<Option<ActiveUser>>,
}

impl FakeAuth {
    pub fn signed_in(uid: &str) -> Self {
        Self {
            user: Mutex::new(Some(ActiveUser {
                uid: uid.to_string(),
                email: None,
            })),
        }
    }

    pub fn signed_out() -> Self {
        Self {
            user: Mutex::new(None),
        }
    }
}

#[async_trait]
impl AuthProvider for FakeAuth {
    async fn sign_up(&self, email: &str, password: &str) -> Result<ActiveUser, AuthError> {
        self.sign_in(email, password).await
    }

    async fn sign_in(&self, email: &str, _password: &str) -> Result<ActiveUser, AuthError> {
        let user = ActiveUser {
            uid: email.to_string(),
            email: Some(email.to_string()),
        };
        *self.user.lock().unwrap() = Some(user.clone());
        Ok(user)
    }

    fn sign_out(&self) {
        *self.user.lock().unwrap() = None;
    }

    fn active_user(&self) -> Option<ActiveUser> {
        self.user.lock().unwrap().clone()
    }

    async fn id_token(&self) -> Result<String, AuthError> {
        self.active_user()
            .map(|user| format!("token-{}", user.uid))
            .ok_or(AuthError::NotSignedIn)
    }
}
