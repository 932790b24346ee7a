//! Auth-session state for the current user.
//!
//! SYSTEM CONTEXT
//! ==============
//! Used by route guards and user-aware views to coordinate login redirects
//! and identity-dependent rendering. The profile is held in memory only.

use crate::net::error::ApiError;
use crate::net::types::User;
use crate::services::auth::AuthService;

/// Authentication state tracking the current user and loading status.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthState {
    pub user: Option<User>,
    pub loading: bool,
}

impl Default for AuthState {
    fn default() -> Self {
        Self { user: None, loading: true }
    }
}

impl AuthState {
    /// Resolve the startup state: fetch the profile when a token is stored.
    ///
    /// A failed fetch signs the user out rather than leaving a token that
    /// cannot load a profile.
    pub async fn bootstrap(auth: &AuthService) -> Self {
        if !auth.is_authenticated() {
            return Self::signed_out();
        }
        match auth.current_user().await {
            Ok(user) => Self::signed_in(user),
            Err(e) => {
                tracing::warn!(error = %e, "failed to load current user; signing out");
                auth.logout();
                Self::signed_out()
            }
        }
    }

    #[must_use]
    pub fn signed_in(user: User) -> Self {
        Self { user: Some(user), loading: false }
    }

    #[must_use]
    pub fn signed_out() -> Self {
        Self { user: None, loading: false }
    }

    /// Log in and move to the signed-in state.
    ///
    /// # Errors
    ///
    /// Returns the login failure; `self` is left unchanged.
    pub async fn login(&mut self, auth: &AuthService, email: &str, password: &str) -> Result<(), ApiError> {
        let user = auth.login(email, password).await?;
        *self = Self::signed_in(user);
        Ok(())
    }

    pub fn logout(&mut self, auth: &AuthService) {
        auth.logout();
        *self = Self::signed_out();
    }
}

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;
