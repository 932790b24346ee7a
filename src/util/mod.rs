//! Utility helpers shared across views.
//!
//! SYSTEM CONTEXT
//! ==============
//! Utility modules isolate environment concerns (navigation, browser
//! storage) and pure view rules from the networking layer so both stay
//! testable.

pub mod auth;
pub mod forms;
pub mod navigation;
