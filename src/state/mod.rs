//! View state owned by the embedding UI or CLI.

pub mod auth;
pub mod feed;
