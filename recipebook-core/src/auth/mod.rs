//! Authentication collaborator.
//!
//! Stores never look identity up from global state. They receive an
//! [`AuthProvider`] (usually through [`crate::sync::Remote`]) and ask it for
//! the signed-in user's id and a bearer token when they talk to the remote
//! database.

mod identity_toolkit;
mod session;

use async_trait::async_trait;
use thiserror::Error;

pub use identity_toolkit::{IdentityToolkitAuth, DEFAULT_AUTH_URL, DEFAULT_TOKEN_URL};
pub use session::Session;

/// Errors reported by an authentication provider.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("Not signed in")]
    NotSignedIn,

    #[error("HTTP error: {0}")]
    Http(String),

    /// The provider refused the request; the message is meant for the user.
    #[error("{0}")]
    Rejected(String),

    #[error("Unexpected response from auth server: {0}")]
    InvalidResponse(String),
}

/// The currently signed-in user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveUser {
    pub uid: String,
    pub email: Option<String>,
}

#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Create an account and sign it in.
    async fn sign_up(&self, email: &str, password: &str) -> Result<ActiveUser, AuthError>;

    async fn sign_in(&self, email: &str, password: &str) -> Result<ActiveUser, AuthError>;

    fn sign_out(&self);

    fn active_user(&self) -> Option<ActiveUser>;

    /// Bearer token for the active user, refreshed if it is about to expire.
    async fn id_token(&self) -> Result<String, AuthError>;
}
