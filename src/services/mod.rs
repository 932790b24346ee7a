//! Domain services built on the HTTP client.

pub mod auth;
