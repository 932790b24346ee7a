//! Typed REST façade for posts, comments, and user profiles.
//!
//! SYSTEM CONTEXT
//! ==============
//! Pages and the CLI call these helpers instead of building requests. Every
//! call runs through [`HttpClient`], so credentials and renewal apply
//! uniformly; paths come from the configured [`Endpoints`].

use super::client::HttpClient;
use super::error::ApiError;
use super::transport::PendingRequest;
use super::types::{Comment, CommentUpdate, Listing, NewComment, Page, Post, PostDraft, User};
use crate::config::{Endpoints, fill};

#[derive(Clone)]
pub struct BlogApi {
    client: HttpClient,
    endpoints: Endpoints,
}

impl BlogApi {
    #[must_use]
    pub fn new(client: HttpClient, endpoints: Endpoints) -> Self {
        Self { client, endpoints }
    }

    #[must_use]
    pub fn client(&self) -> &HttpClient {
        &self.client
    }

    #[must_use]
    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    // =========================================================================
    // POSTS
    // =========================================================================

    /// Fetch page `page` (1-based) of the post listing.
    ///
    /// # Errors
    ///
    /// Propagates [`ApiError`] from the request pipeline or body parsing.
    pub async fn list_posts(&self, page: u32) -> Result<Page<Post>, ApiError> {
        self.client.execute_json(PendingRequest::get(posts_page_path(&self.endpoints.posts, page))).await
    }

    /// # Errors
    ///
    /// Returns [`ApiError::Status`] with 404 when the post does not exist.
    pub async fn get_post(&self, id: i64) -> Result<Post, ApiError> {
        self.client.execute_json(PendingRequest::get(id_path(&self.endpoints.post, id))).await
    }

    /// # Errors
    ///
    /// Returns [`ApiError::Validation`] with the backend's field errors on 400.
    pub async fn create_post(&self, draft: &PostDraft) -> Result<Post, ApiError> {
        let request = PendingRequest::post(self.endpoints.post_create.clone()).json(draft)?;
        self.client.execute_json(request).await
    }

    /// # Errors
    ///
    /// Returns [`ApiError::Validation`] with the backend's field errors on 400.
    pub async fn update_post(&self, id: i64, draft: &PostDraft) -> Result<Post, ApiError> {
        let request = PendingRequest::put(id_path(&self.endpoints.post_edit, id)).json(draft)?;
        self.client.execute_json(request).await
    }

    /// # Errors
    ///
    /// Propagates [`ApiError`] from the request pipeline.
    pub async fn delete_post(&self, id: i64) -> Result<(), ApiError> {
        self.client
            .execute(PendingRequest::delete(id_path(&self.endpoints.post_edit, id)))
            .await?;
        Ok(())
    }

    /// Posts written by `username`.
    ///
    /// # Errors
    ///
    /// Propagates [`ApiError`] from the request pipeline or body parsing.
    pub async fn posts_by_author(&self, username: &str) -> Result<Vec<Post>, ApiError> {
        let path = fill(&self.endpoints.user_posts, &[("username", username)]);
        let listing: Listing<Post> = self.client.execute_json(PendingRequest::get(path)).await?;
        Ok(listing.into_items())
    }

    // =========================================================================
    // COMMENTS
    // =========================================================================

    /// # Errors
    ///
    /// Propagates [`ApiError`] from the request pipeline or body parsing.
    pub async fn comments_for_post(&self, post_id: i64) -> Result<Vec<Comment>, ApiError> {
        let path = id_path(&self.endpoints.post_comments, post_id);
        let listing: Listing<Comment> = self.client.execute_json(PendingRequest::get(path)).await?;
        Ok(listing.into_items())
    }

    /// # Errors
    ///
    /// Propagates [`ApiError`] from the request pipeline or body parsing.
    pub async fn create_comment(&self, post_id: i64, content: &str) -> Result<Comment, ApiError> {
        let body = NewComment { post: post_id, content };
        let request = PendingRequest::post(self.endpoints.comment_create.clone()).json(&body)?;
        self.client.execute_json(request).await
    }

    /// # Errors
    ///
    /// Propagates [`ApiError`] from the request pipeline or body parsing.
    pub async fn update_comment(&self, id: i64, content: &str) -> Result<Comment, ApiError> {
        let request = PendingRequest::put(id_path(&self.endpoints.comment, id)).json(&CommentUpdate { content })?;
        self.client.execute_json(request).await
    }

    /// # Errors
    ///
    /// Propagates [`ApiError`] from the request pipeline.
    pub async fn delete_comment(&self, id: i64) -> Result<(), ApiError> {
        self.client
            .execute(PendingRequest::delete(id_path(&self.endpoints.comment, id)))
            .await?;
        Ok(())
    }

    // =========================================================================
    // USERS
    // =========================================================================

    /// Public profile of `username`.
    ///
    /// # Errors
    ///
    /// Propagates [`ApiError`] from the request pipeline or body parsing.
    pub async fn user_profile(&self, username: &str) -> Result<User, ApiError> {
        let path = fill(&self.endpoints.profile, &[("username", username)]);
        self.client.execute_json(PendingRequest::get(path)).await
    }
}

fn id_path(template: &str, id: i64) -> String {
    fill(template, &[("id", &id.to_string())])
}

fn posts_page_path(base: &str, page: u32) -> String {
    let separator = if base.contains('?') { '&' } else { '?' };
    format!("{base}{separator}page={}", page.max(1))
}

#[cfg(test)]
#[path = "api_test.rs"]
mod tests;
