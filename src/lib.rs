//! Authenticated client for a token-based blog REST API.
//!
//! SYSTEM CONTEXT
//! ==============
//! The backend issues a short-lived access token and a longer-lived refresh
//! token at login. This crate keeps the pair in a [`session::SessionStore`],
//! attaches the access token to every request, and when a request comes
//! back 401 it renews the access token once and replays the request. Any
//! number of concurrent 401s share a single renewal call.
//!
//! LAYOUT
//! ======
//! - `config`: base URL, endpoint layout, timeouts
//! - `session`: token persistence (memory, file, browser storage)
//! - `net`: transport, renewal gate, client pipeline, typed API
//! - `services`: login, logout, registration, current user
//! - `state` / `util`: view helpers for UIs built on the client
//!
//! The `hydrate` feature adds browser-backed session storage and navigation.

pub mod app;
pub mod config;
pub mod net;
pub mod services;
pub mod session;
pub mod state;
pub mod util;

#[cfg(test)]
pub mod test_helpers;

pub use app::BlogClient;
pub use config::{ApiLayout, ClientConfig, ConfigError, Endpoints};
pub use net::api::BlogApi;
pub use net::client::HttpClient;
pub use net::error::{ApiError, RenewalError, TransportError};
pub use services::auth::AuthService;
pub use session::{FileStore, MemoryStore, SessionStore, TokenPair};
