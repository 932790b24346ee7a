//! Forced navigation used when the session ends underneath the user.
//!
//! SYSTEM CONTEXT
//! ==============
//! The HTTP client calls [`Navigator::navigate`] with the login path after a
//! failed renewal. Browser builds perform a hard location change; other
//! hosts decide for themselves (the CLI just logs).

/// Sink for forced navigations.
pub trait Navigator: Send + Sync {
    fn navigate(&self, path: &str);
}

/// Navigator that only records the event in the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNavigator;

impl Navigator for LogNavigator {
    fn navigate(&self, path: &str) {
        tracing::info!(%path, "session ended; login required");
    }
}

/// Hard browser navigation via `window.location` (hydrate builds only).
#[cfg(feature = "hydrate")]
#[derive(Debug, Default, Clone, Copy)]
pub struct BrowserNavigator;

#[cfg(feature = "hydrate")]
impl Navigator for BrowserNavigator {
    fn navigate(&self, path: &str) {
        if let Some(window) = web_sys::window() {
            let _ = window.location().set_href(path);
        }
    }
}
