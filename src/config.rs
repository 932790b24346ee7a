//! Client configuration parsed from environment variables.
//!
//! DESIGN
//! ======
//! The backend's path shapes differ between deployments (`/posts` vs
//! `/blogs`), so the endpoint map is data rather than code. Two presets are
//! provided and callers may also build an `Endpoints` by hand.

use std::time::Duration;

use thiserror::Error;

pub const DEFAULT_API_URL: &str = "http://localhost:8000/api";
pub const DEFAULT_LOGIN_PATH: &str = "/login";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Errors produced while reading configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A configuration value could not be parsed.
    #[error("config parse failed: {0}")]
    Parse(String),
}

// =============================================================================
// ENDPOINTS
// =============================================================================

/// Which backend path layout to talk to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ApiLayout {
    /// `/posts/...` with `/comments/post/{id}/`.
    #[default]
    Posts,
    /// `/blogs/...` with `/blogs/{id}/comments/`.
    Blogs,
}

impl ApiLayout {
    /// Parse a layout name; `None` selects the default.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for an unknown layout name.
    pub fn parse(raw: Option<&str>) -> Result<Self, ConfigError> {
        match raw.map(str::trim).unwrap_or("posts") {
            "posts" | "" => Ok(Self::Posts),
            "blogs" => Ok(Self::Blogs),
            other => Err(ConfigError::Parse(format!(
                "unknown BLOG_API_LAYOUT '{other}' (expected 'posts' or 'blogs')"
            ))),
        }
    }
}

/// Path templates for every backend route the client uses.
///
/// Templates are relative to the base URL and may contain `{id}` or
/// `{username}` placeholders, filled by [`fill`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub token: String,
    pub token_refresh: String,
    pub register: String,
    pub me: String,
    pub profile: String,
    pub posts: String,
    pub post: String,
    pub post_create: String,
    pub post_edit: String,
    pub user_posts: String,
    pub post_comments: String,
    pub comment_create: String,
    pub comment: String,
}

impl Endpoints {
    /// Endpoint map for the given layout preset.
    #[must_use]
    pub fn for_layout(layout: ApiLayout) -> Self {
        let users = Self {
            token: "/users/token/".into(),
            token_refresh: "/users/token/refresh/".into(),
            register: "/users/register/".into(),
            me: "/users/me/".into(),
            profile: "/users/profile/{username}/".into(),
            posts: "/posts/".into(),
            post: "/posts/{id}/".into(),
            post_create: "/posts/create/".into(),
            post_edit: "/posts/{id}/edit/".into(),
            user_posts: "/posts/user/{username}/".into(),
            post_comments: "/comments/post/{id}/".into(),
            comment_create: "/comments/create/".into(),
            comment: "/comments/{id}/".into(),
        };
        match layout {
            ApiLayout::Posts => users,
            ApiLayout::Blogs => Self {
                posts: "/blogs/".into(),
                post: "/blogs/{id}/".into(),
                post_create: "/blogs/".into(),
                post_edit: "/blogs/{id}/".into(),
                user_posts: "/blogs/user/{username}/".into(),
                post_comments: "/blogs/{id}/comments/".into(),
                comment_create: "/comments/".into(),
                ..users
            },
        }
    }
}

impl Default for Endpoints {
    fn default() -> Self {
        Self::for_layout(ApiLayout::default())
    }
}

/// Substitute `{name}` placeholders in a path template.
#[must_use]
pub fn fill(template: &str, params: &[(&str, &str)]) -> String {
    params.iter().fold(template.to_owned(), |path, (name, value)| {
        path.replace(&format!("{{{name}}}"), value)
    })
}

// =============================================================================
// CLIENT CONFIG
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

impl Timeouts {
    /// Read `BLOG_REQUEST_TIMEOUT_SECS` and `BLOG_CONNECT_TIMEOUT_SECS`;
    /// missing or unparsable values fall back to the defaults.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            request_secs: env_parse_u64("BLOG_REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS),
            connect_secs: env_parse_u64("BLOG_CONNECT_TIMEOUT_SECS", DEFAULT_CONNECT_TIMEOUT_SECS),
        }
    }

    #[must_use]
    pub fn request(&self) -> Duration {
        Duration::from_secs(self.request_secs)
    }

    #[must_use]
    pub fn connect(&self) -> Duration {
        Duration::from_secs(self.connect_secs)
    }
}

impl Default for Timeouts {
    fn default() -> Self {
        Self { request_secs: DEFAULT_REQUEST_TIMEOUT_SECS, connect_secs: DEFAULT_CONNECT_TIMEOUT_SECS }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Backend base URL without a trailing slash.
    pub base_url: String,
    pub layout: ApiLayout,
    pub endpoints: Endpoints,
    /// Where the user is sent when the session cannot be renewed.
    pub login_path: String,
    pub timeouts: Timeouts,
}

impl ClientConfig {
    /// Config for `base_url` with every other setting at its default.
    #[must_use]
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: normalize_base_url(base_url),
            layout: ApiLayout::default(),
            endpoints: Endpoints::default(),
            login_path: DEFAULT_LOGIN_PATH.to_owned(),
            timeouts: Timeouts::default(),
        }
    }

    /// Build typed client config from environment variables.
    ///
    /// Optional:
    /// - `BLOG_API_URL`: default `http://localhost:8000/api`
    /// - `BLOG_API_LAYOUT`: `posts` (default) or `blogs`
    /// - `BLOG_LOGIN_PATH`: default `/login`
    /// - `BLOG_REQUEST_TIMEOUT_SECS`: default 30
    /// - `BLOG_CONNECT_TIMEOUT_SECS`: default 10
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] when `BLOG_API_LAYOUT` is not recognized.
    pub fn from_env() -> Result<Self, ConfigError> {
        let base_url = std::env::var("BLOG_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_owned());
        let layout = ApiLayout::parse(std::env::var("BLOG_API_LAYOUT").ok().as_deref())?;
        Ok(Self::new(&base_url).with_layout(layout).with_env_session())
    }

    /// Apply `BLOG_LOGIN_PATH` and the timeout variables, leaving the base
    /// URL and layout as they are.
    #[must_use]
    pub fn with_env_session(mut self) -> Self {
        self.login_path = std::env::var("BLOG_LOGIN_PATH").unwrap_or_else(|_| DEFAULT_LOGIN_PATH.to_owned());
        self.timeouts = Timeouts::from_env();
        self
    }

    /// Switch to another layout preset, replacing the endpoint map.
    #[must_use]
    pub fn with_layout(mut self, layout: ApiLayout) -> Self {
        self.layout = layout;
        self.endpoints = Endpoints::for_layout(layout);
        self
    }
}

fn normalize_base_url(raw: &str) -> String {
    raw.trim().trim_end_matches('/').to_owned()
}

fn env_parse_u64(key: &str, default: u64) -> u64 {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(default)
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
