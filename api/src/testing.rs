//! Scripted transport for exercising [`crate::AdminApi`] without a network.
//!
//! Responses are queued up front and handed out in order; every request the
//! client sends is recorded so tests can assert on method, path, query,
//! bearer and body. Running out of script is reported as a transport error.

use std::collections::VecDeque;
use std::sync::Mutex;

use serde::Serialize;

use crate::transport::{ApiRequest, ApiResponse, Transport, TransportError};

#[derive(Debug, Default)]
pub struct ScriptedTransport {
    script: Mutex<VecDeque<Result<ApiResponse, TransportError>>>,
    sent: Mutex<Vec<ApiRequest>>,
}

impl ScriptedTransport {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response with `status` and `body` serialized as JSON.
    #[must_use]
    pub fn respond(self, status: u16, body: &impl Serialize) -> Self {
        self.push(Ok(json_response(status, body)));
        self
    }

    /// Queue a transport-level failure.
    #[must_use]
    pub fn fail(self, reason: &str) -> Self {
        self.push(Err(TransportError(reason.to_owned())));
        self
    }

    pub fn push(&self, outcome: Result<ApiResponse, TransportError>) {
        if let Ok(mut script) = self.script.lock() {
            script.push_back(outcome);
        }
    }

    /// Every request sent so far, oldest first.
    #[must_use]
    pub fn sent(&self) -> Vec<ApiRequest> {
        self.sent.lock().map(|sent| sent.clone()).unwrap_or_default()
    }

    #[must_use]
    pub fn remaining(&self) -> usize {
        self.script.lock().map(|script| script.len()).unwrap_or_default()
    }
}

impl Transport for ScriptedTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, TransportError> {
        let label = request.describe();
        if let Ok(mut sent) = self.sent.lock() {
            sent.push(request);
        }
        self.script
            .lock()
            .ok()
            .and_then(|mut script| script.pop_front())
            .unwrap_or_else(|| Err(TransportError(format!("no scripted response for {label}"))))
    }
}

/// Response with `status` and a JSON body.
#[must_use]
pub fn json_response(status: u16, body: &impl Serialize) -> ApiResponse {
    ApiResponse { status, body: serde_json::to_vec(body).unwrap_or_default() }
}
