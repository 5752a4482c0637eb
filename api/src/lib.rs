//! Transport-agnostic REST client for the tenant admin backend.
//!
//! SYSTEM CONTEXT
//! ==============
//! The browser console and the terminal console both talk to the same JSON
//! endpoints. This crate owns everything they share: the request/response
//! cycle, the bearer-token session and its 401 teardown, list-page state,
//! and the name directories pages use to show names instead of foreign
//! keys. Each surface plugs in its own [`Transport`] and [`SessionStore`].

pub mod client;
pub mod error;
pub mod list;
pub mod lookup;
pub mod session;
#[cfg(any(test, feature = "testing"))]
pub mod testing;
pub mod transport;

pub use client::{AdminApi, DatasetScope, MembershipScope};
pub use error::ApiError;
pub use list::{ListOutcome, ListState, load_settled};
pub use lookup::{Directory, MAX_DIRECTORY_PAGES, NameLookup, Resolution, collect_pages};
pub use session::{ExpiryHook, MemoryStore, SESSION_KEY, SessionContext, SessionStore, StoreError, StoredSession};
pub use transport::{ApiRequest, ApiResponse, Method, Transport, TransportError};
