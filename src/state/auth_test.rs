use super::*;
use crate::session::SessionStore;
use crate::test_helpers::{EMAIL, Harness, PASSWORD};

fn service(h: &Harness) -> AuthService {
    AuthService::new(h.client.clone(), h.config.endpoints.clone())
}

#[test]
fn default_state_is_loading_without_user() {
    let state = AuthState::default();
    assert!(state.loading);
    assert!(state.user.is_none());
}

#[tokio::test]
async fn bootstrap_without_token_skips_network() {
    let h = Harness::new();
    let state = AuthState::bootstrap(&service(&h)).await;
    assert_eq!(state, AuthState::signed_out());
    assert!(h.backend.calls().is_empty());
}

#[tokio::test]
async fn bootstrap_with_token_loads_profile() {
    let h = Harness::signed_in();
    let state = AuthState::bootstrap(&service(&h)).await;
    assert!(!state.loading);
    assert_eq!(state.user.map(|u| u.username).as_deref(), Some("ana"));
}

#[tokio::test]
async fn bootstrap_failure_signs_out() {
    let h = Harness::signed_in();
    h.backend.go_offline();

    let state = AuthState::bootstrap(&service(&h)).await;
    assert_eq!(state, AuthState::signed_out());
    assert_eq!(h.store.access(), None);
}

#[tokio::test]
async fn login_then_logout_transitions_state() {
    let h = Harness::new();
    let auth = service(&h);
    let mut state = AuthState::bootstrap(&auth).await;

    state.login(&auth, EMAIL, PASSWORD).await.unwrap();
    assert!(state.user.is_some());

    state.logout(&auth);
    assert_eq!(state, AuthState::signed_out());
    assert!(!auth.is_authenticated());
}

#[tokio::test]
async fn failed_login_keeps_previous_state() {
    let h = Harness::new();
    let auth = service(&h);
    let mut state = AuthState::signed_out();

    assert!(state.login(&auth, EMAIL, "nope").await.is_err());
    assert_eq!(state, AuthState::signed_out());
}
