//! HTTP client for the taskboard REST API.
//!
//! [`ApiClient`] exposes one async method per endpoint. Tokens live in a
//! [`Session`] so that the client and the auth layer observe the same state.

/// REST client.
pub mod client;
/// Error types.
pub mod error;
/// Redirect hook used on session expiry.
pub mod navigator;
/// Persisted token storage.
pub mod session;

pub use client::{ApiClient, DEFAULT_BASE_URL};
pub use error::{ApiError, SessionError};
pub use navigator::{LOGIN_ROUTE, Navigator, RecordingNavigator};
pub use reqwest::Url;
pub use session::{FileSessionStore, MemorySessionStore, REFRESH_TOKEN_KEY, Session, SessionStore, TOKEN_KEY};
