//! Explicit session context with login, logout and expiry transitions.
//!
//! DESIGN
//! ======
//! The persisted value is `{ token, data }` under one key. It is read at
//! request time rather than cached, so a login in one place is seen by the
//! next request everywhere. Writes happen only in [`SessionContext::begin`]
//! (login), [`SessionContext::end`] (logout) and [`SessionContext::expire`]
//! (401). A stored value that does not decode is treated as absent and
//! removed.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use std::sync::{Arc, Mutex};

use schema::Account;
use serde::{Deserialize, Serialize};

/// Storage key the browser console uses in `localStorage`.
pub const SESSION_KEY: &str = "user";

/// The persisted credential: bearer token plus the signed-in account.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredSession {
    pub token: String,
    pub data: Account,
}

impl StoredSession {
    /// Decode a stored value; `None` if it is malformed or carries no token.
    #[must_use]
    pub fn decode(raw: &str) -> Option<Self> {
        serde_json::from_str::<Self>(raw).ok().filter(|session| !session.token.is_empty())
    }

    /// # Errors
    ///
    /// Returns an error only if serialization fails, which cannot happen for
    /// this shape in practice.
    pub fn encode(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Persisting the session failed.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct StoreError(pub String);

/// Raw key-value slot the session lives in.
pub trait SessionStore {
    fn read_raw(&self) -> Option<String>;

    /// # Errors
    ///
    /// Returns [`StoreError`] when the backing storage rejects the write.
    fn write_raw(&self, raw: &str) -> Result<(), StoreError>;

    fn remove(&self);
}

/// In-process store used by tests and short-lived tools.
#[derive(Debug, Default)]
pub struct MemoryStore {
    slot: Mutex<Option<String>>,
}

impl MemoryStore {
    #[must_use]
    pub fn with_raw(raw: &str) -> Self {
        Self { slot: Mutex::new(Some(raw.to_owned())) }
    }
}

impl SessionStore for MemoryStore {
    fn read_raw(&self) -> Option<String> {
        self.slot.lock().ok()?.clone()
    }

    fn write_raw(&self, raw: &str) -> Result<(), StoreError> {
        let mut slot = self.slot.lock().map_err(|e| StoreError(e.to_string()))?;
        *slot = Some(raw.to_owned());
        Ok(())
    }

    fn remove(&self) {
        if let Ok(mut slot) = self.slot.lock() {
            *slot = None;
        }
    }
}

/// Callback run after a 401 tore the session down, e.g. to navigate to login.
pub type ExpiryHook = Arc<dyn Fn() + Send + Sync>;

/// The session plus its transitions.
pub struct SessionContext<S> {
    store: S,
    on_expired: Option<ExpiryHook>,
}

impl<S: SessionStore> SessionContext<S> {
    pub fn new(store: S) -> Self {
        Self { store, on_expired: None }
    }

    #[must_use]
    pub fn with_expiry_hook(mut self, hook: ExpiryHook) -> Self {
        self.on_expired = Some(hook);
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Current session, discarding a malformed stored value.
    pub fn current(&self) -> Option<StoredSession> {
        let raw = self.store.read_raw()?;
        let session = StoredSession::decode(&raw);
        if session.is_none() {
            log::warn!("discarding malformed stored session");
            self.store.remove();
        }
        session
    }

    pub fn is_authenticated(&self) -> bool {
        self.current().is_some()
    }

    pub fn token(&self) -> Option<String> {
        self.current().map(|session| session.token)
    }

    /// Login succeeded: persist the new session.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the session cannot be written.
    pub fn begin(&self, session: &StoredSession) -> Result<(), StoreError> {
        let raw = session.encode().map_err(|e| StoreError(e.to_string()))?;
        self.store.write_raw(&raw)
    }

    /// Operator logged out.
    pub fn end(&self) {
        self.store.remove();
    }

    /// The backend rejected the credential: clear it and run the expiry hook.
    pub fn expire(&self) {
        self.store.remove();
        if let Some(hook) = &self.on_expired {
            hook();
        }
    }
}
