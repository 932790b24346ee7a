//! Wired client handle.
//!
//! DESIGN
//! ======
//! `BlogClient` is the one object an embedder builds at startup. It owns a
//! single [`HttpClient`] (one renewal gate, one session store) and hands the
//! same instance to the auth service and the API façade so every request
//! shares the same renewal state. Clone is cheap; all fields are handles.

use std::sync::Arc;

use crate::config::ClientConfig;
use crate::net::api::BlogApi;
use crate::net::client::HttpClient;
use crate::net::error::TransportError;
use crate::net::transport::{ReqwestTransport, Transport};
use crate::services::auth::AuthService;
use crate::session::SessionStore;
use crate::util::navigation::Navigator;

#[derive(Clone)]
pub struct BlogClient {
    pub config: ClientConfig,
    pub auth: AuthService,
    pub api: BlogApi,
}

impl BlogClient {
    /// Build a client that talks HTTP to `config.base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::ClientBuild`] if the HTTP client cannot be built.
    pub fn connect(
        config: ClientConfig,
        store: Arc<dyn SessionStore>,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Self, TransportError> {
        let transport =
            ReqwestTransport::new(&config.base_url, config.timeouts.request(), config.timeouts.connect())?;
        Ok(Self::with_transport(config, Arc::new(transport), store, navigator))
    }

    #[must_use]
    pub fn with_transport(
        config: ClientConfig,
        transport: Arc<dyn Transport>,
        store: Arc<dyn SessionStore>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        let client = HttpClient::new(
            transport,
            store,
            navigator,
            config.endpoints.token_refresh.clone(),
            config.login_path.clone(),
        );
        tracing::debug!(base_url = %config.base_url, layout = ?config.layout, "blog client ready");
        Self {
            auth: AuthService::new(client.clone(), config.endpoints.clone()),
            api: BlogApi::new(client, config.endpoints.clone()),
            config,
        }
    }
}

#[cfg(test)]
#[path = "app_test.rs"]
mod tests;
