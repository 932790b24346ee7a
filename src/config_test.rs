use super::*;

/// # Safety
/// Only the single env test below touches `BLOG_*` variables.
unsafe fn clear_blog_env() {
    unsafe {
        std::env::remove_var("BLOG_API_URL");
        std::env::remove_var("BLOG_API_LAYOUT");
        std::env::remove_var("BLOG_LOGIN_PATH");
        std::env::remove_var("BLOG_REQUEST_TIMEOUT_SECS");
        std::env::remove_var("BLOG_CONNECT_TIMEOUT_SECS");
    }
}

#[test]
fn from_env_defaults_then_overrides_then_rejects_unknown_layout() {
    unsafe { clear_blog_env() };

    let cfg = ClientConfig::from_env().unwrap();
    assert_eq!(cfg.base_url, DEFAULT_API_URL);
    assert_eq!(cfg.layout, ApiLayout::Posts);
    assert_eq!(cfg.endpoints, Endpoints::for_layout(ApiLayout::Posts));
    assert_eq!(cfg.login_path, "/login");
    assert_eq!(cfg.timeouts, Timeouts { request_secs: 30, connect_secs: 10 });

    unsafe {
        std::env::set_var("BLOG_API_URL", "https://blog.example.test/api/");
        std::env::set_var("BLOG_API_LAYOUT", "blogs");
        std::env::set_var("BLOG_LOGIN_PATH", "/signin");
        std::env::set_var("BLOG_REQUEST_TIMEOUT_SECS", "42");
        std::env::set_var("BLOG_CONNECT_TIMEOUT_SECS", "nope");
    }

    let cfg = ClientConfig::from_env().unwrap();
    assert_eq!(cfg.base_url, "https://blog.example.test/api");
    assert_eq!(cfg.layout, ApiLayout::Blogs);
    assert_eq!(cfg.endpoints.posts, "/blogs/");
    assert_eq!(cfg.login_path, "/signin");
    assert_eq!(cfg.timeouts, Timeouts { request_secs: 42, connect_secs: 10 });

    unsafe { std::env::set_var("BLOG_API_LAYOUT", "wordpress") };
    let err = ClientConfig::from_env().unwrap_err().to_string();
    assert!(err.contains("unknown BLOG_API_LAYOUT"));

    let explicit = ClientConfig::new("http://other.test/api").with_layout(ApiLayout::Blogs).with_env_session();
    assert_eq!(explicit.base_url, "http://other.test/api");
    assert_eq!(explicit.layout, ApiLayout::Blogs);
    assert_eq!(explicit.login_path, "/signin");
    assert_eq!(explicit.timeouts, Timeouts::from_env());
    assert_eq!(explicit.timeouts, Timeouts { request_secs: 42, connect_secs: 10 });

    unsafe { clear_blog_env() };
}

// =============================================================================
// ApiLayout / Endpoints
// =============================================================================

#[test]
fn layout_parse_accepts_known_names() {
    assert_eq!(ApiLayout::parse(None), Ok(ApiLayout::Posts));
    assert_eq!(ApiLayout::parse(Some(" blogs ")), Ok(ApiLayout::Blogs));
    assert!(ApiLayout::parse(Some("BLOGS")).is_err());
}

#[test]
fn posts_layout_matches_nested_comment_routes() {
    let e = Endpoints::for_layout(ApiLayout::Posts);
    assert_eq!(e.post_create, "/posts/create/");
    assert_eq!(e.post_edit, "/posts/{id}/edit/");
    assert_eq!(e.post_comments, "/comments/post/{id}/");
    assert_eq!(e.comment_create, "/comments/create/");
}

#[test]
fn blogs_layout_keeps_user_routes() {
    let e = Endpoints::for_layout(ApiLayout::Blogs);
    assert_eq!(e.token, "/users/token/");
    assert_eq!(e.token_refresh, "/users/token/refresh/");
    assert_eq!(e.post_comments, "/blogs/{id}/comments/");
    assert_eq!(e.comment, "/comments/{id}/");
}

#[test]
fn fill_replaces_every_placeholder() {
    assert_eq!(fill("/posts/{id}/edit/", &[("id", "7")]), "/posts/7/edit/");
    assert_eq!(fill("/users/profile/{username}/", &[("username", "ana")]), "/users/profile/ana/");
    assert_eq!(fill("/posts/", &[("id", "7")]), "/posts/");
}

#[test]
fn new_trims_trailing_slash_and_with_layout_swaps_endpoints() {
    let cfg = ClientConfig::new("http://api.test/v1/").with_layout(ApiLayout::Blogs);
    assert_eq!(cfg.base_url, "http://api.test/v1");
    assert_eq!(cfg.endpoints.post, "/blogs/{id}/");
}

#[test]
fn timeouts_convert_to_durations() {
    let t = Timeouts { request_secs: 5, connect_secs: 2 };
    assert_eq!(t.request(), Duration::from_secs(5));
    assert_eq!(t.connect(), Duration::from_secs(2));
}
