//! Paginated "load more" post feed for the home page.
//!
//! DESIGN
//! ======
//! Pages are requested one at a time starting from 1. Page 1 replaces the
//! list, later pages append. The feed ends when the backend reports no
//! `next` link or returns an empty page. A failed fetch keeps the posts
//! already shown and records a message for display.

use crate::net::api::BlogApi;
use crate::net::types::{Page, Post};

pub const LOAD_FAILED_MESSAGE: &str = "Failed to load blog posts. Please try again later.";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PostFeed {
    pub posts: Vec<Post>,
    /// Last page successfully applied; 0 before the first load.
    pub page: u32,
    pub has_more: bool,
    pub loading: bool,
    pub error: Option<String>,
}

impl Default for PostFeed {
    fn default() -> Self {
        Self { posts: Vec::new(), page: 0, has_more: true, loading: false, error: None }
    }
}

impl PostFeed {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a "load more" action should be offered.
    #[must_use]
    pub fn can_load_more(&self) -> bool {
        self.has_more && !self.loading
    }

    /// Fetch and apply the next page. Does nothing when the feed is exhausted.
    pub async fn load_next(&mut self, api: &BlogApi) {
        if !self.can_load_more() {
            return;
        }
        let page = self.page + 1;
        self.loading = true;
        let result = api.list_posts(page).await;
        self.loading = false;

        match result {
            Ok(listing) => self.apply_page(page, listing),
            Err(e) => {
                tracing::warn!(page, error = %e, "failed to load posts");
                self.error = Some(LOAD_FAILED_MESSAGE.to_owned());
            }
        }
    }

    /// Fold a fetched page into the feed.
    pub fn apply_page(&mut self, page: u32, listing: Page<Post>) {
        self.error = None;
        if listing.results.is_empty() {
            self.has_more = false;
            return;
        }
        self.has_more = listing.has_next();
        if page <= 1 {
            self.posts = listing.results;
        } else {
            self.posts.extend(listing.results);
        }
        self.page = page;
    }

    /// Drop everything and start again from page 1.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// No posts to show and nothing went wrong.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.posts.is_empty() && !self.loading && self.error.is_none()
    }
}

/// First 150 characters of `content`, with `...` when truncated.
#[must_use]
pub fn excerpt(content: &str) -> String {
    const LIMIT: usize = 150;
    match content.char_indices().nth(LIMIT) {
        Some((cut, _)) => format!("{}...", &content[..cut]),
        None => content.to_owned(),
    }
}

#[cfg(test)]
#[path = "feed_test.rs"]
mod feed_test;
