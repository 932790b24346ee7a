//! Shared auth view helpers.
//!
//! SYSTEM CONTEXT
//! ==============
//! Protected views must apply identical unauthenticated redirect behavior,
//! and edit/delete controls must agree on who owns a post or comment.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use crate::net::types::{Author, User};
use crate::state::auth::AuthState;

/// What a protected view should do given the current auth state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RouteDecision {
    Loading,
    RedirectToLogin,
    Render,
}

/// Redirect once auth has loaded and no user is present.
#[must_use]
pub fn should_redirect_unauth(state: &AuthState) -> bool {
    !state.loading && state.user.is_none()
}

/// Decide a protected route from the loading flag and the token check of
/// the auth service. A cached profile never substitutes for a stored token.
#[must_use]
pub fn guard_route(state: &AuthState, authenticated: bool) -> RouteDecision {
    if state.loading {
        return RouteDecision::Loading;
    }
    if authenticated {
        RouteDecision::Render
    } else {
        RouteDecision::RedirectToLogin
    }
}

/// Whether `user` may edit or delete content written by `author`.
#[must_use]
pub fn can_modify(user: Option<&User>, author: &Author) -> bool {
    user.is_some_and(|u| u.id == author.id)
}
