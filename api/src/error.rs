//! REST client error type.
//!
//! ERROR HANDLING
//! ==============
//! From the operator's point of view there are two kinds of failure: the
//! session is gone ([`ApiError::Unauthorized`], already handled by the
//! client's 401 teardown) and everything else, which pages turn into one
//! notification naming the action that failed. The server's own message is
//! only surfaced on login.

#[cfg(test)]
#[path = "error_test.rs"]
mod error_test;

use schema::first_message;
use validator::ValidationErrors;

use crate::session::StoreError;
use crate::transport::TransportError;

/// Fallback notice for a login that failed for any reason but bad credentials.
pub const LOGIN_FAILED: &str = "Login failed, please try again later";

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Rejected client-side; no request was sent.
    #[error("{}", first_message(.0))]
    Invalid(#[from] ValidationErrors),
    /// The backend answered 401. The session has already been cleared.
    #[error("not authorized{}", .message.as_deref().map(|m| format!(": {m}")).unwrap_or_default())]
    Unauthorized { message: Option<String> },
    #[error("server returned {status}: {message}")]
    Status { status: u16, message: String },
    #[error("request failed: {0}")]
    Transport(#[from] TransportError),
    #[error("could not decode response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("could not persist session: {0}")]
    Storage(#[from] StoreError),
    #[error("login response did not include a token")]
    MissingToken,
}

impl ApiError {
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized { .. })
    }

    /// Notification text for a failed page action.
    ///
    /// Validation problems name the offending field; every other failure is
    /// reported as `action_failed` without exposing the cause.
    #[must_use]
    pub fn notice(&self, action_failed: &str) -> String {
        match self {
            Self::Invalid(errors) => first_message(errors),
            _ => action_failed.to_owned(),
        }
    }

    /// Notification text for a failed login, preferring the server's message
    /// for rejected credentials.
    #[must_use]
    pub fn login_notice(&self) -> String {
        match self {
            Self::Unauthorized { message: Some(message) } => message.clone(),
            Self::Invalid(errors) => first_message(errors),
            _ => LOGIN_FAILED.to_owned(),
        }
    }
}
