//! Client-side form validation.
//!
//! Each validator returns a field → message map; an empty map means the
//! form may be submitted. Blankness is judged on trimmed input, length
//! minimums on the raw character count.

#[cfg(test)]
#[path = "forms_test.rs"]
mod forms_test;

use std::collections::BTreeMap;

use crate::net::types::{PostDraft, RegisterRequest};

pub const TITLE_MIN_CHARS: usize = 5;
pub const CONTENT_MIN_CHARS: usize = 10;

pub type FieldErrors = BTreeMap<&'static str, String>;

#[must_use]
pub fn validate_post(draft: &PostDraft) -> FieldErrors {
    let mut errors = FieldErrors::new();
    if let Some(msg) = required_min("Title", &draft.title, TITLE_MIN_CHARS) {
        errors.insert("title", msg);
    }
    if let Some(msg) = required_min("Content", &draft.content, CONTENT_MIN_CHARS) {
        errors.insert("content", msg);
    }
    errors
}

#[must_use]
pub fn validate_comment(content: &str) -> FieldErrors {
    let mut errors = FieldErrors::new();
    if content.trim().is_empty() {
        errors.insert("content", "Comment cannot be empty".to_owned());
    }
    errors
}

#[must_use]
pub fn validate_registration(form: &RegisterRequest) -> FieldErrors {
    let mut errors = FieldErrors::new();
    if form.username.trim().is_empty() {
        errors.insert("username", "Username is required".to_owned());
    }
    if form.email.trim().is_empty() {
        errors.insert("email", "Email is required".to_owned());
    } else if !form.email.contains('@') {
        errors.insert("email", "Enter a valid email address".to_owned());
    }
    if form.password.is_empty() {
        errors.insert("password", "Password is required".to_owned());
    } else if form.password != form.password_confirm {
        errors.insert("password_confirm", "Passwords do not match".to_owned());
    }
    errors
}

fn required_min(label: &str, value: &str, min: usize) -> Option<String> {
    if value.trim().is_empty() {
        Some(format!("{label} is required"))
    } else if value.chars().count() < min {
        Some(format!("{label} must be at least {min} characters"))
    } else {
        None
    }
}
