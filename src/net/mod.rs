//! Networking modules for the blog REST API.
//!
//! SYSTEM CONTEXT
//! ==============
//! `transport` sends raw requests, `client` wraps it with credential
//! attachment and single-flight token renewal (`renewal`), `api` maps
//! endpoints to typed calls, and `types` defines the wire schema.

pub mod api;
pub mod client;
pub mod error;
pub mod renewal;
pub mod transport;
pub mod types;
