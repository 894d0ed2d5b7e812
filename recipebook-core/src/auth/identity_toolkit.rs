//! Email/password authentication against the Identity Toolkit REST API.
//!
//! Endpoints used:
//! - `POST {auth_url}/accounts:signUp?key=...`
//! - `POST {auth_url}/accounts:signInWithPassword?key=...`
//! - `POST {token_url}/token?key=...` (refresh an expired id token)

use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::{Duration, Utc};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, info};

use super::{ActiveUser, AuthError, AuthProvider, Session};

pub const DEFAULT_AUTH_URL: &str = "https://identitytoolkit.googleapis.com/v1";
pub const DEFAULT_TOKEN_URL: &str = "https://securetoken.googleapis.com/v1";

/// Tokens this close to expiry are refreshed before use.
const REFRESH_MARGIN_SECS: i64 = 60;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SignInResponse {
    local_id: String,
    email: Option<String>,
    id_token: String,
    refresh_token: String,
    expires_in: String,
}

#[derive(Deserialize)]
struct RefreshResponse {
    user_id: String,
    id_token: String,
    refresh_token: String,
    expires_in: String,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

/// [`AuthProvider`] backed by the Identity Toolkit service.
#[derive(Debug)]
pub struct IdentityToolkitAuth {
    client: reqwest::Client,
    api_key: String,
    auth_url: String,
    token_url: String,
    session: Mutex<Option<Session>>,
}

impl IdentityToolkitAuth {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.into(),
            auth_url: DEFAULT_AUTH_URL.to_string(),
            token_url: DEFAULT_TOKEN_URL.to_string(),
            session: Mutex::new(None),
        }
    }

    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    /// Point the provider at different endpoints (emulators, tests).
    pub fn with_endpoints(mut self, auth_url: &str, token_url: &str) -> Self {
        self.auth_url = auth_url.trim_end_matches('/').to_string();
        self.token_url = token_url.trim_end_matches('/').to_string();
        self
    }

    /// Resume a previously saved session.
    pub fn with_session(self, session: Option<Session>) -> Self {
        *self.lock() = session;
        self
    }

    /// Snapshot of the current session, for persisting between runs.
    pub fn session(&self) -> Option<Session> {
        self.lock().clone()
    }

    fn lock(&self) -> MutexGuard<'_, Option<Session>> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }

    async fn authenticate(
        &self,
        method: &str,
        email: &str,
        password: &str,
    ) -> Result<ActiveUser, AuthError> {
        let url = format!(
            "{}/accounts:{}?key={}",
            self.auth_url,
            method,
            urlencoding::encode(&self.api_key)
        );
        debug!(method, email, "Requesting credentials");

        let response = self
            .client
            .post(&url)
            .json(&serde_json::json!({
                "email": email,
                "password": password,
                "returnSecureToken": true
            }))
            .send()
            .await
            .map_err(|e| AuthError::Http(e.to_string()))?;

        let body: SignInResponse = read_response(response).await?;
        let session = Session {
            uid: body.local_id,
            email: body.email.or_else(|| Some(email.to_string())),
            id_token: body.id_token,
            refresh_token: body.refresh_token,
            expires_at: Utc::now() + parse_expires_in(&body.expires_in)?,
        };

        let user = session.user();
        *self.lock() = Some(session);
        info!(uid = %user.uid, "Signed in");
        Ok(user)
    }

    async fn refresh(&self, session: &Session) -> Result<Session, AuthError> {
        let url = format!(
            "{}/token?key={}",
            self.token_url,
            urlencoding::encode(&self.api_key)
        );
        debug!(uid = %session.uid, "Refreshing id token");

        let response = self
            .client
            .post(&url)
            .form(&[
                ("grant_type", "refresh_token"),
                ("refresh_token", session.refresh_token.as_str()),
            ])
            .send()
            .await
            .map_err(|e| AuthError::Http(e.to_string()))?;

        let body: RefreshResponse = read_response(response).await?;
        Ok(Session {
            uid: body.user_id,
            email: session.email.clone(),
            id_token: body.id_token,
            refresh_token: body.refresh_token,
            expires_at: Utc::now() + parse_expires_in(&body.expires_in)?,
        })
    }
}

#[async_trait]
impl AuthProvider for IdentityToolkitAuth {
    async fn sign_up(&self, email: &str, password: &str) -> Result<ActiveUser, AuthError> {
        self.authenticate("signUp", email, password).await
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<ActiveUser, AuthError> {
        self.authenticate("signInWithPassword", email, password).await
    }

    fn sign_out(&self) {
        if let Some(session) = self.lock().take() {
            info!(uid = %session.uid, "Signed out");
        }
    }

    fn active_user(&self) -> Option<ActiveUser> {
        self.lock().as_ref().map(Session::user)
    }

    async fn id_token(&self) -> Result<String, AuthError> {
        let session = self.session().ok_or(AuthError::NotSignedIn)?;
        if !session.expires_within(Duration::seconds(REFRESH_MARGIN_SECS), Utc::now()) {
            return Ok(session.id_token);
        }

        let refreshed = self.refresh(&session).await?;
        let token = refreshed.id_token.clone();

        let mut current = self.lock();
        // Keep whatever replaced the session while the refresh was in flight.
        if current.as_ref().map(|s| s.uid.as_str()) == Some(session.uid.as_str()) {
            *current = Some(refreshed);
        }
        Ok(token)
    }
}

async fn read_response<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, AuthError> {
    let status = response.status();
    if !status.is_success() {
        return match response.json::<ErrorEnvelope>().await {
            Ok(envelope) => Err(AuthError::Rejected(describe_error(&envelope.error.message))),
            Err(_) => Err(AuthError::Http(format!(
                "Auth server returned status {}",
                status
            ))),
        };
    }

    response
        .json()
        .await
        .map_err(|e| AuthError::InvalidResponse(e.to_string()))
}

fn parse_expires_in(value: &str) -> Result<Duration, AuthError> {
    value
        .trim()
        .parse::<i64>()
        .map(Duration::seconds)
        .map_err(|_| AuthError::InvalidResponse(format!("bad expiresIn '{}'", value)))
}

/// Turn a provider error code into a message for the user.
///
/// Codes may carry detail after a colon, e.g.
/// `WEAK_PASSWORD : Password should be at least 6 characters`.
fn describe_error(message: &str) -> String {
    let code = message.split(':').next().unwrap_or(message).trim();
    match code {
        "EMAIL_EXISTS" => "The email address is already in use by another account.".to_string(),
        "EMAIL_NOT_FOUND" | "INVALID_PASSWORD" | "INVALID_LOGIN_CREDENTIALS" => {
            "The email or password is incorrect.".to_string()
        }
        "INVALID_EMAIL" => "The email address is badly formatted.".to_string(),
        "USER_DISABLED" => "This account has been disabled.".to_string(),
        "WEAK_PASSWORD" => "Password should be at least 6 characters.".to_string(),
        "TOO_MANY_ATTEMPTS_TRY_LATER" => "Too many attempts. Try again later.".to_string(),
        "TOKEN_EXPIRED" | "INVALID_REFRESH_TOKEN" | "USER_NOT_FOUND" => {
            "Your session has expired. Sign in again.".to_string()
        }
        _ => message.to_string(),
    }
}
