//! Error taxonomy for outbound API calls.
//!
//! ERROR HANDLING
//! ==============
//! Backend validation payloads are carried verbatim so forms can show
//! field-level messages. A 401 never reaches callers directly unless the
//! replay after renewal was also rejected; renewal failure surfaces as
//! [`ApiError::SessionExpired`].

use thiserror::Error;

/// The base transport could not complete a request.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    ClientBuild(String),

    /// The request did not produce a response (connect, timeout, body read).
    #[error("request failed: {0}")]
    Request(String),
}

/// Exchanging the refresh token for a new access token failed.
///
/// Cloneable because one outcome is shared by every request waiting on the
/// same renewal.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RenewalError {
    /// No refresh token is stored.
    #[error("no refresh token stored")]
    MissingRefreshToken,

    /// The refresh call did not produce a response.
    #[error("refresh request failed: {0}")]
    Transport(String),

    /// The backend refused the refresh token.
    #[error("refresh rejected: status {status}")]
    Rejected { status: u16, body: String },

    /// The refresh response lacked a usable access token.
    #[error("refresh response parse failed: {0}")]
    Parse(String),
}

/// Errors returned by client, façade, and auth operations.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The backend rejected the input (HTTP 400); `fields` is its payload.
    #[error("validation failed: status {status}")]
    Validation { status: u16, fields: serde_json::Value },

    /// Any other non-success status, including a 401 that survived renewal.
    #[error("API response error: status {status}: {message}")]
    Status { status: u16, message: String },

    /// The session could not be renewed and has been cleared.
    #[error("session expired: {0}")]
    SessionExpired(RenewalError),

    /// A success response body could not be deserialized.
    #[error("API response parse failed: {0}")]
    Parse(String),
}

impl ApiError {
    /// Stable machine-readable code for display and logging.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::Transport(_) => "E_TRANSPORT",
            Self::Validation { .. } => "E_VALIDATION",
            Self::Status { status: 401, .. } => "E_UNAUTHORIZED",
            Self::Status { status: 403, .. } => "E_FORBIDDEN",
            Self::Status { status: 404, .. } => "E_NOT_FOUND",
            Self::Status { .. } => "E_STATUS",
            Self::SessionExpired(_) => "E_SESSION_EXPIRED",
            Self::Parse(_) => "E_PARSE",
        }
    }

    /// HTTP status behind the error, when there was a response.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Validation { status, .. } | Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// Build the error for a non-success response.
    ///
    /// A 400 with a JSON body becomes [`ApiError::Validation`]; everything
    /// else keeps the status plus the backend's `detail`/`message` text when
    /// present, or the raw body.
    #[must_use]
    pub fn from_response(status: u16, body: &str) -> Self {
        let parsed = serde_json::from_str::<serde_json::Value>(body).ok();
        if status == 400 {
            if let Some(fields) = parsed {
                return Self::Validation { status, fields };
            }
        }
        let message = parsed
            .as_ref()
            .and_then(|v| v.get("detail").or_else(|| v.get("message")))
            .and_then(serde_json::Value::as_str)
            .map_or_else(|| body.trim().to_owned(), str::to_owned);
        Self::Status { status, message }
    }
}

#[cfg(test)]
#[path = "error_test.rs"]
mod tests;
