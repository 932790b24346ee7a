//! Login, registration, logout, and current-user lookup.
//!
//! SYSTEM CONTEXT
//! ==============
//! Thin layer over [`HttpClient`] and the session store. Login and register
//! go out anonymously so a rejected password is reported as-is instead of
//! triggering token renewal.

use std::sync::Arc;

use crate::config::Endpoints;
use crate::net::client::HttpClient;
use crate::net::error::ApiError;
use crate::net::transport::PendingRequest;
use crate::net::types::{LoginRequest, RegisterRequest, TokenResponse, User};
use crate::session::{SessionStore, TokenPair};

#[derive(Clone)]
pub struct AuthService {
    client: HttpClient,
    endpoints: Endpoints,
}

impl AuthService {
    #[must_use]
    pub fn new(client: HttpClient, endpoints: Endpoints) -> Self {
        Self { client, endpoints }
    }

    fn store(&self) -> &Arc<dyn SessionStore> {
        self.client.store()
    }

    /// Create an account. The session is not touched.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Validation`] carrying the backend's field errors
    /// when the registration is rejected.
    pub async fn register(&self, form: &RegisterRequest) -> Result<(), ApiError> {
        let request = PendingRequest::post(self.endpoints.register.clone()).anonymous().json(form)?;
        self.client.execute(request).await?;
        tracing::info!(username = %form.username, "account registered");
        Ok(())
    }

    /// Exchange credentials for a token pair, store it, and return the profile.
    ///
    /// # Errors
    ///
    /// Returns the backend's rejection (typically 401) with the store left
    /// unchanged, or any error from the follow-up profile fetch.
    pub async fn login(&self, email: &str, password: &str) -> Result<User, ApiError> {
        let request = PendingRequest::post(self.endpoints.token.clone())
            .anonymous()
            .json(&LoginRequest { email, password })?;
        let tokens: TokenResponse = self.client.execute_json(request).await?;

        self.store().save(&TokenPair::from(tokens));
        tracing::info!(%email, "signed in");
        self.current_user().await
    }

    /// Forget the stored credentials. No backend call is made.
    pub fn logout(&self) {
        self.store().clear();
        tracing::info!("signed out");
    }

    /// Fetch the profile of the signed-in user.
    ///
    /// # Errors
    ///
    /// Propagates [`ApiError`], including [`ApiError::SessionExpired`] when
    /// the session could not be renewed.
    pub async fn current_user(&self) -> Result<User, ApiError> {
        self.client.execute_json(PendingRequest::get(self.endpoints.me.clone())).await
    }

    /// Whether an access token is stored. Does not validate it.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.store().access().is_some()
    }
}

#[cfg(test)]
#[path = "auth_test.rs"]
mod tests;
