//! The seam between the REST client and an HTTP stack.
//!
//! DESIGN
//! ======
//! Requests are plain data so the same client logic can run over `gloo-net`
//! in the browser, `reqwest` in the terminal, and a scripted queue in tests.
//! The bearer token is filled in by [`crate::AdminApi`] at send time; a
//! transport only has to copy it into the `Authorization` header.

#[cfg(test)]
#[path = "transport_test.rs"]
mod transport_test;

use std::fmt::Write as _;

/// Prefix every backend route lives under.
pub const API_PREFIX: &str = "/api";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

impl Method {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
        }
    }
}

/// One outgoing REST call.
#[derive(Clone, Debug, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    /// Absolute path including [`API_PREFIX`], e.g. `/api/accounts.json`.
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<serde_json::Value>,
    pub bearer: Option<String>,
}

impl ApiRequest {
    /// `GET {API_PREFIX}{endpoint}`
    #[must_use]
    pub fn get(endpoint: &str) -> Self {
        Self { method: Method::Get, path: format!("{API_PREFIX}{endpoint}"), query: Vec::new(), body: None, bearer: None }
    }

    /// `POST {API_PREFIX}{endpoint}` with a JSON body.
    #[must_use]
    pub fn post(endpoint: &str, body: serde_json::Value) -> Self {
        Self {
            method: Method::Post,
            path: format!("{API_PREFIX}{endpoint}"),
            query: Vec::new(),
            body: Some(body),
            bearer: None,
        }
    }

    #[must_use]
    pub fn with_query(mut self, key: &str, value: impl ToString) -> Self {
        self.query.push((key.to_owned(), value.to_string()));
        self
    }

    /// Value for the `Authorization` header, if a token is attached.
    #[must_use]
    pub fn authorization(&self) -> Option<String> {
        self.bearer.as_ref().map(|token| format!("Bearer {token}"))
    }

    /// Value of a query parameter, if present.
    #[must_use]
    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
    }

    /// Short `METHOD path?query` label for logs.
    #[must_use]
    pub fn describe(&self) -> String {
        let mut label = format!("{} {}", self.method.as_str(), self.path);
        for (i, (key, value)) in self.query.iter().enumerate() {
            let sep = if i == 0 { '?' } else { '&' };
            let _ = write!(label, "{sep}{key}={value}");
        }
        label
    }
}

/// Raw response handed back by a transport.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl ApiResponse {
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// The request never produced a response (DNS, connection, CORS, ...).
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct TransportError(pub String);

/// An HTTP stack able to execute [`ApiRequest`]s.
///
/// Futures are not required to be `Send`: the browser transport runs on a
/// single-threaded executor.
#[allow(async_fn_in_trait)]
pub trait Transport {
    /// Execute `request` and return whatever status and body came back.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] only when no response was received.
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, TransportError>;
}

/// Join a base URL and an absolute path without doubling the slash.
#[must_use]
pub fn join_url(base: &str, path: &str) -> String {
    format!("{}{}", base.trim_end_matches('/'), path)
}
