//! Authenticated HTTP client pipeline.
//!
//! ARCHITECTURE
//! ============
//! Every request runs the same ordered stages around the base transport:
//!
//! 1. `attach_credential`: add `Authorization: Bearer <access>` when a token is stored.
//! 2. `dispatch`: hand the request to the transport.
//! 3. `recover_unauthorized`: on a first 401, renew the access token once
//!    (single-flight across concurrent failures) and replay the request.
//!
//! A failed renewal clears the session store and forces navigation to the
//! login path; the caller receives the renewal failure, not the original 401.
//!
//! TRADE-OFFS
//! ==========
//! Store writes are last-writer-wins. A logout that lands while a renewal is
//! in flight can be overwritten by the renewed access token.

use std::sync::Arc;

use futures::FutureExt;
use serde::Deserialize;

use super::error::{ApiError, RenewalError};
use super::renewal::{RenewalGate, RenewalResult};
use super::transport::{AuthMode, PendingRequest, RawResponse, Transport};
use crate::session::{SessionStore, TokenPair};
use crate::util::navigation::Navigator;

/// Cheaply cloneable handle to the shared request pipeline.
#[derive(Clone)]
pub struct HttpClient {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    renewer: Renewer,
    renewal: RenewalGate,
}

impl HttpClient {
    pub fn new(
        transport: Arc<dyn Transport>,
        store: Arc<dyn SessionStore>,
        navigator: Arc<dyn Navigator>,
        refresh_path: impl Into<String>,
        login_path: impl Into<String>,
    ) -> Self {
        let renewer = Renewer {
            transport,
            store,
            navigator,
            refresh_path: refresh_path.into(),
            login_path: login_path.into(),
        };
        Self { inner: Arc::new(ClientInner { renewer, renewal: RenewalGate::new() }) }
    }

    /// Session store shared with the auth service.
    #[must_use]
    pub fn store(&self) -> &Arc<dyn SessionStore> {
        &self.inner.renewer.store
    }

    /// Run `request` through the pipeline and return a success response.
    ///
    /// # Errors
    ///
    /// - [`ApiError::Transport`] when no response was obtained
    /// - [`ApiError::SessionExpired`] when a 401 could not be recovered by renewal
    /// - [`ApiError::Validation`] / [`ApiError::Status`] for other non-success statuses
    pub async fn execute(&self, mut request: PendingRequest) -> Result<RawResponse, ApiError> {
        let sent_with = self.attach_credential(&mut request);
        let response = self.dispatch(&request).await?;

        if response.status == 401 && request.auth == AuthMode::Bearer && !request.retried {
            return self.recover_unauthorized(request, sent_with).await;
        }
        response.error_for_status()
    }

    /// Execute and deserialize the success body.
    ///
    /// # Errors
    ///
    /// Everything [`HttpClient::execute`] returns, plus [`ApiError::Parse`].
    pub async fn execute_json<T: serde::de::DeserializeOwned>(&self, request: PendingRequest) -> Result<T, ApiError> {
        self.execute(request).await?.json()
    }

    fn attach_credential(&self, request: &mut PendingRequest) -> Option<String> {
        if request.auth != AuthMode::Bearer {
            return None;
        }
        let access = self.inner.renewer.store.access()?;
        request.set_bearer(&access);
        Some(access)
    }

    async fn dispatch(&self, request: &PendingRequest) -> Result<RawResponse, ApiError> {
        Ok(self.inner.renewer.transport.send(request).await?)
    }

    async fn recover_unauthorized(
        &self,
        mut request: PendingRequest,
        sent_with: Option<String>,
    ) -> Result<RawResponse, ApiError> {
        request.retried = true;
        tracing::debug!(method = request.method.as_str(), path = %request.path, "unauthorized; renewing session");

        let access = self.renewed_access(sent_with.as_deref()).await.map_err(ApiError::SessionExpired)?;
        request.set_bearer(&access);

        let response = self.dispatch(&request).await?;
        if response.status == 401 {
            tracing::warn!(path = %request.path, "request rejected again after renewal");
        }
        response.error_for_status()
    }

    /// Access token to replay with: one renewed since `sent_with` went out, or a fresh renewal.
    async fn renewed_access(&self, sent_with: Option<&str>) -> RenewalResult {
        if let Some(current) = self.inner.renewer.store.access() {
            if sent_with != Some(current.as_str()) {
                tracing::debug!("access token already renewed by another request");
                return Ok(current);
            }
        }
        let renewer = self.inner.renewer.clone();
        self.inner.renewal.renew(move || renewer.run().boxed()).await
    }
}

// =============================================================================
// RENEWAL
// =============================================================================

#[derive(Deserialize)]
struct RefreshResponse {
    #[serde(alias = "access_token")]
    access: String,
    #[serde(default, alias = "refresh_token")]
    refresh: Option<String>,
}

/// Everything a renewal needs, owned so the shared future can be `'static`.
#[derive(Clone)]
struct Renewer {
    transport: Arc<dyn Transport>,
    store: Arc<dyn SessionStore>,
    navigator: Arc<dyn Navigator>,
    refresh_path: String,
    login_path: String,
}

impl Renewer {
    async fn run(self) -> RenewalResult {
        match self.exchange().await {
            Ok(access) => {
                tracing::info!("access token renewed");
                Ok(access)
            }
            Err(e) => {
                tracing::warn!(error = %e, "token renewal failed; ending session");
                self.store.clear();
                self.navigator.navigate(&self.login_path);
                Err(e)
            }
        }
    }

    async fn exchange(&self) -> RenewalResult {
        let refresh = self.store.refresh().ok_or(RenewalError::MissingRefreshToken)?;
        let request = PendingRequest::post(self.refresh_path.clone())
            .anonymous()
            .with_body(serde_json::json!({ "refresh": refresh }));

        let response = self
            .transport
            .send(&request)
            .await
            .map_err(|e| RenewalError::Transport(e.to_string()))?;
        if !response.is_success() {
            return Err(RenewalError::Rejected { status: response.status, body: response.body });
        }

        let body: RefreshResponse =
            serde_json::from_str(&response.body).map_err(|e| RenewalError::Parse(e.to_string()))?;
        match body.refresh {
            Some(rotated) => self.store.save(&TokenPair { access: body.access.clone(), refresh: rotated }),
            None => self.store.save_access(&body.access),
        }
        Ok(body.access)
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
