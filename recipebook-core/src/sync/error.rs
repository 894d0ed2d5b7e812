//! Sync error types.

use thiserror::Error;

use crate::auth::AuthError;

/// Errors that can occur while exchanging a list with the remote database.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SyncError {
    /// No user is signed in, so there is no resource to address
    #[error("Not signed in. Sign in before loading or saving lists.")]
    NotSignedIn,

    /// Obtaining the bearer token failed
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// The request never got a response
    #[error("HTTP error: {0}")]
    Http(String),

    /// The database answered with a non-success status
    #[error("{message}")]
    Remote { status: u16, message: String },

    /// The response body was not a list of the expected records
    #[error("Unexpected data from server: {0}")]
    Decode(String),

    /// The local list could not be serialized
    #[error("Failed to encode list: {0}")]
    Encode(String),
}
