//! Shared fixtures for unit tests: an in-process fake backend speaking the
//! default endpoint layout, and a navigator that records redirects.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{Value, json};

use crate::config::ClientConfig;
use crate::net::client::HttpClient;
use crate::net::error::TransportError;
use crate::net::transport::{Method, PendingRequest, RawResponse, Transport};
use crate::session::{MemoryStore, SessionStore, TokenPair};
use crate::util::navigation::Navigator;

pub const EMAIL: &str = "a@b.com";
pub const PASSWORD: &str = "pw";

// =========================================================================
// RecordingNavigator
// =========================================================================

#[derive(Default)]
pub struct RecordingNavigator {
    visits: Mutex<Vec<String>>,
}

impl RecordingNavigator {
    pub fn visits(&self) -> Vec<String> {
        self.visits.lock().unwrap().clone()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, path: &str) {
        self.visits.lock().unwrap().push(path.to_owned());
    }
}

// =========================================================================
// FakeBackend
// =========================================================================

/// Scripted backend: JWT-style auth plus a small posts/comments dataset.
pub struct FakeBackend {
    valid_access: Mutex<String>,
    refresh_token: String,
    issue_access: String,
    rotate_refresh: Option<String>,
    refresh_fails: AtomicBool,
    offline: AtomicBool,
    /// Protected routes reject every token, even freshly renewed ones.
    reject_all_tokens: AtomicBool,
    /// Number of posts pages served before an empty page.
    pages: AtomicUsize,
    calls: Mutex<Vec<PendingRequest>>,
}

impl Default for FakeBackend {
    fn default() -> Self {
        Self {
            valid_access: Mutex::new("A1".into()),
            refresh_token: "R1".into(),
            issue_access: "A2".into(),
            rotate_refresh: None,
            refresh_fails: AtomicBool::new(false),
            offline: AtomicBool::new(false),
            reject_all_tokens: AtomicBool::new(false),
            pages: AtomicUsize::new(2),
            calls: Mutex::new(Vec::new()),
        }
    }
}

impl FakeBackend {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Backend whose refresh endpoint also rotates the refresh token.
    pub fn rotating(refresh: &str) -> Arc<Self> {
        Arc::new(Self { rotate_refresh: Some(refresh.to_owned()), ..Self::default() })
    }

    /// Make the currently issued access token stale, as if it expired.
    pub fn expire_access(&self) {
        *self.valid_access.lock().unwrap() = "expired-and-replaced".into();
    }

    pub fn fail_refresh(&self) {
        self.refresh_fails.store(true, Ordering::SeqCst);
    }

    pub fn reject_all_tokens(&self) {
        self.reject_all_tokens.store(true, Ordering::SeqCst);
    }

    pub fn go_offline(&self) {
        self.offline.store(true, Ordering::SeqCst);
    }

    pub fn set_pages(&self, pages: usize) {
        self.pages.store(pages, Ordering::SeqCst);
    }

    pub fn calls(&self) -> Vec<PendingRequest> {
        self.calls.lock().unwrap().clone()
    }

    /// Number of requests whose path (ignoring query) equals `path`.
    pub fn count(&self, path: &str) -> usize {
        self.calls()
            .iter()
            .filter(|r| r.path.split('?').next() == Some(path))
            .count()
    }

    fn handle(&self, req: &PendingRequest) -> RawResponse {
        let (path, query) = req.path.split_once('?').unwrap_or((req.path.as_str(), ""));
        let body = req.body.clone().unwrap_or(Value::Null);

        match (req.method, path) {
            (Method::Post, "/users/token/") => return self.login(&body),
            (Method::Post, "/users/token/refresh/") => return self.refresh(&body),
            (Method::Post, "/users/register/") => return register(&body),
            _ => {}
        }

        let public = req.method == Method::Get
            && ((path.starts_with("/posts/") && !path.starts_with("/posts/user/")) || path.starts_with("/comments/post/"));
        let accepted = match req.bearer() {
            Some(token) => !self.reject_all_tokens.load(Ordering::SeqCst) && *self.valid_access.lock().unwrap() == token,
            None => public,
        };
        if !accepted {
            return respond(401, &json!({ "detail": "Given token not valid for any token type" }));
        }

        let segments: Vec<&str> = path.trim_matches('/').split('/').collect();
        match (req.method, segments.as_slice()) {
            (Method::Get, ["users", "me"]) => respond(200, &user_json(1, "ana")),
            (Method::Get, ["users", "profile", name]) => respond(200, &user_json(2, name)),
            (Method::Get, ["posts"]) => self.posts_page(query),
            (Method::Get, ["posts", "user", name]) => respond(200, &json!([post_json(5, name)])),
            (Method::Get, ["posts", "404"]) => respond(404, &json!({ "detail": "Not found." })),
            (Method::Get, ["posts", id]) => respond(200, &post_json(id.parse().unwrap_or(0), "ana")),
            (Method::Post, ["posts", "create"]) => create_post(&body),
            (Method::Put, ["posts", id, "edit"]) => {
                let mut post = post_json(id.parse().unwrap_or(0), "ana");
                post["title"] = body["title"].clone();
                post["content"] = body["content"].clone();
                respond(200, &post)
            }
            (Method::Delete, ["posts", _, "edit"] | ["comments", _]) => RawResponse::new(204, ""),
            (Method::Get, ["comments", "post", id]) => {
                let post: i64 = id.parse().unwrap_or(0);
                respond(200, &json!([comment_json(10, post, "first!"), comment_json(11, post, "nice")]))
            }
            (Method::Post, ["comments", "create"]) => {
                let post = body["post"].as_i64().unwrap_or(0);
                respond(201, &comment_json(12, post, body["content"].as_str().unwrap_or("")))
            }
            (Method::Put, ["comments", id]) => {
                respond(200, &comment_json(id.parse().unwrap_or(0), 1, body["content"].as_str().unwrap_or("")))
            }
            (Method::Get, ["boom"]) => RawResponse::new(500, "Internal Server Error"),
            _ => respond(404, &json!({ "detail": "Not found." })),
        }
    }

    fn login(&self, body: &Value) -> RawResponse {
        if body["email"] == EMAIL && body["password"] == PASSWORD {
            let access = self.valid_access.lock().unwrap().clone();
            respond(200, &json!({ "access": access, "refresh": self.refresh_token }))
        } else {
            respond(401, &json!({ "detail": "No active account found with the given credentials" }))
        }
    }

    fn refresh(&self, body: &Value) -> RawResponse {
        if self.refresh_fails.load(Ordering::SeqCst) || body["refresh"] != self.refresh_token.as_str() {
            return respond(401, &json!({ "detail": "Token is invalid or expired", "code": "token_not_valid" }));
        }
        *self.valid_access.lock().unwrap() = self.issue_access.clone();
        match &self.rotate_refresh {
            Some(rotated) => respond(200, &json!({ "access": self.issue_access, "refresh": rotated })),
            None => respond(200, &json!({ "access": self.issue_access })),
        }
    }

    fn posts_page(&self, query: &str) -> RawResponse {
        let page: usize = query
            .strip_prefix("page=")
            .and_then(|p| p.parse().ok())
            .unwrap_or(1);
        let pages = self.pages.load(Ordering::SeqCst);
        if page > pages {
            return respond(200, &json!({ "count": pages * 2, "next": null, "previous": null, "results": [] }));
        }
        let first = i64::try_from(page * 2 - 1).unwrap_or(0);
        let next = (page < pages).then(|| format!("http://fake/api/posts/?page={}", page + 1));
        respond(
            200,
            &json!({
                "count": pages * 2,
                "next": next,
                "previous": null,
                "results": [post_json(first, "ana"), post_json(first + 1, "ben")],
            }),
        )
    }
}

#[async_trait]
impl Transport for FakeBackend {
    async fn send(&self, request: &PendingRequest) -> Result<RawResponse, TransportError> {
        self.calls.lock().unwrap().push(request.clone());
        tokio::task::yield_now().await;
        if self.offline.load(Ordering::SeqCst) {
            return Err(TransportError::Request("connection refused".into()));
        }
        Ok(self.handle(request))
    }
}

fn register(body: &Value) -> RawResponse {
    if body["password"] != body["password_confirm"] {
        return respond(400, &json!({ "password": ["Password fields didn't match."] }));
    }
    respond(201, &json!({ "username": body["username"], "email": body["email"] }))
}

fn create_post(body: &Value) -> RawResponse {
    if body["title"].as_str().unwrap_or("").is_empty() {
        return respond(400, &json!({ "title": ["This field may not be blank."] }));
    }
    let mut post = post_json(99, "ana");
    post["title"] = body["title"].clone();
    post["content"] = body["content"].clone();
    respond(201, &post)
}

fn respond(status: u16, body: &Value) -> RawResponse {
    RawResponse::new(status, body.to_string())
}

pub fn user_json(id: i64, username: &str) -> Value {
    json!({ "id": id, "username": username, "email": format!("{username}@example.test") })
}

pub fn post_json(id: i64, author: &str) -> Value {
    let author_id = if author == "ana" { 1 } else { 2 };
    json!({
        "id": id,
        "title": format!("Post {id}"),
        "content": format!("Body of post {id}"),
        "user": { "id": author_id, "username": author },
        "created_at": "2025-03-01T10:00:00Z",
        "categories": ["rust"],
    })
}

pub fn comment_json(id: i64, post: i64, content: &str) -> Value {
    json!({
        "id": id,
        "post": post,
        "user": { "id": 1, "username": "ana" },
        "content": content,
        "created_at": "2025-03-02T08:30:00Z",
    })
}

// =========================================================================
// Wiring
// =========================================================================

pub struct Harness {
    pub backend: Arc<FakeBackend>,
    pub store: Arc<MemoryStore>,
    pub navigator: Arc<RecordingNavigator>,
    pub client: HttpClient,
    pub config: ClientConfig,
}

impl Harness {
    pub fn with_backend(backend: Arc<FakeBackend>) -> Self {
        let config = ClientConfig::new("http://fake/api");
        let store = Arc::new(MemoryStore::new());
        let navigator = Arc::new(RecordingNavigator::default());
        let client = HttpClient::new(
            Arc::clone(&backend) as Arc<dyn Transport>,
            Arc::clone(&store) as Arc<dyn SessionStore>,
            Arc::clone(&navigator) as Arc<dyn Navigator>,
            config.endpoints.token_refresh.clone(),
            config.login_path.clone(),
        );
        Self { backend, store, navigator, client, config }
    }

    pub fn new() -> Self {
        Self::with_backend(FakeBackend::new())
    }

    /// Harness whose store already holds the pair the backend issued at login.
    pub fn signed_in() -> Self {
        let h = Self::new();
        h.store.save(&TokenPair { access: "A1".into(), refresh: "R1".into() });
        h
    }
}
