//! HTTP API Handler Tests Infrastructure
//!
//! Key components:
//! - `TestContext` - in-memory repositories plus the pieces `AppState::build` needs
//! - Uses production `build_router()` so every request goes through the real
//!   extractors, middleware and handlers
//! - Helper functions for making HTTP requests (get_json, post_json, etc.)

pub mod content_http_test;
pub mod tenant_http_test;

use crate::api::{
    create_test_blog, create_test_config, create_test_jwt_manager, RecordingEmailProvider,
    StaticReadiness, TestBlogRepository, TestCommentRepository, TestMediaRepository,
    TestMenuRepository, TestPageRepository, TestPostRepository, TestSettingsRepository,
    TestSubscriptionRepository, TestTaxonomyRepository, TestUserRepository,
};
use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use serde::{de::DeserializeOwned, Serialize};
use std::sync::Arc;
use taita_core::cache::MemoryStore;
use taita_core::config::Config;
use taita_core::domain::{Blog, StringUuid, Subscription, User, UserRole};
use taita_core::jwt::JwtManager;
use taita_core::repository::SubscriptionRepository;
use taita_core::server::build_router;
use taita_core::state::{AppState, Repositories, Stores};
use tower::ServiceExt;

/// Header that pins the tenant of a public request
pub const TENANT_HEADER: &str = "x-taita-subdomain";

// ============================================================================
// Test Context
// ============================================================================

pub struct TestContext {
    pub config: Config,
    pub blog_repo: Arc<TestBlogRepository>,
    pub user_repo: Arc<TestUserRepository>,
    pub post_repo: Arc<TestPostRepository>,
    pub page_repo: Arc<TestPageRepository>,
    pub taxonomy_repo: Arc<TestTaxonomyRepository>,
    pub menu_repo: Arc<TestMenuRepository>,
    pub comment_repo: Arc<TestCommentRepository>,
    pub media_repo: Arc<TestMediaRepository>,
    pub settings_repo: Arc<TestSettingsRepository>,
    pub subscription_repo: Arc<TestSubscriptionRepository>,
    pub store: Arc<MemoryStore>,
    pub email: Arc<RecordingEmailProvider>,
    pub jwt: JwtManager,
    pub ready: bool,
}

impl TestContext {
    pub fn new() -> Self {
        Self::with_config(create_test_config())
    }

    pub fn with_config(config: Config) -> Self {
        Self {
            config,
            blog_repo: Arc::new(TestBlogRepository::new()),
            user_repo: Arc::new(TestUserRepository::new()),
            post_repo: Arc::new(TestPostRepository::new()),
            page_repo: Arc::new(TestPageRepository::new()),
            taxonomy_repo: Arc::new(TestTaxonomyRepository::new()),
            menu_repo: Arc::new(TestMenuRepository::new()),
            comment_repo: Arc::new(TestCommentRepository::new()),
            media_repo: Arc::new(TestMediaRepository::new()),
            settings_repo: Arc::new(TestSettingsRepository::new()),
            subscription_repo: Arc::new(TestSubscriptionRepository::new()),
            store: Arc::new(MemoryStore::new()),
            email: Arc::new(RecordingEmailProvider::new()),
            jwt: create_test_jwt_manager(),
            ready: true,
        }
    }

    pub fn state(&self) -> AppState {
        let repos = Repositories {
            blogs: self.blog_repo.clone(),
            users: self.user_repo.clone(),
            posts: self.post_repo.clone(),
            pages: self.page_repo.clone(),
            taxonomies: self.taxonomy_repo.clone(),
            menus: self.menu_repo.clone(),
            comments: self.comment_repo.clone(),
            media: self.media_repo.clone(),
            settings: self.settings_repo.clone(),
            subscriptions: self.subscription_repo.clone(),
        };
        let stores = Stores {
            otp: self.store.clone(),
            comment_throttle: self.store.clone(),
        };
        let readiness = Arc::new(StaticReadiness {
            database: self.ready,
            cache: true,
        });

        AppState::build(
            self.config.clone(),
            repos,
            stores,
            self.email.clone(),
            readiness,
        )
    }

    pub fn router(&self) -> Router {
        build_router(self.state())
    }

    /// Store a blog with a free subscription
    pub async fn seed_blog(&self, subdomain: &str) -> Blog {
        let blog = create_test_blog(subdomain);
        self.blog_repo.add_blog(blog.clone()).await;
        self.subscription_repo
            .create(&Subscription::free(blog.id))
            .await
            .unwrap();
        blog
    }

    /// Create an owner for `blog` and return a bearer token for it
    pub async fn admin_token(&self, blog: &Blog) -> String {
        let user = User {
            blog_id: blog.id,
            email: format!("owner@{}.test", blog.subdomain),
            name: "Owner".to_string(),
            role: UserRole::Owner,
            ..Default::default()
        };
        self.user_repo.add_user(user.clone()).await;
        self.jwt
            .create_access_token(user.id, &user.email, blog.id, UserRole::Owner)
            .unwrap()
    }

    pub fn commenter_token(&self, email: &str) -> String {
        self.jwt.create_commenter_token(email).unwrap()
    }
}

pub fn bearer(token: &str) -> String {
    format!("Bearer {}", token)
}

pub fn new_id() -> StringUuid {
    StringUuid::new_v4()
}

// ============================================================================
// HTTP Test Helpers
// ============================================================================

async fn send<R: DeserializeOwned>(
    app: &Router,
    method: Method,
    path: &str,
    headers: &[(&str, &str)],
    body: Option<String>,
) -> (StatusCode, Option<R>) {
    let mut builder = Request::builder().method(method).uri(path);
    for (name, value) in headers {
        builder = builder.header(*name, *value);
    }
    let request = match body {
        Some(json) => builder
            .header("Content-Type", "application/json")
            .body(Body::from(json))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();

    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap_or_default();

    if body_bytes.is_empty() {
        return (status, None);
    }

    match serde_json::from_slice(&body_bytes) {
        Ok(data) => (status, Some(data)),
        Err(_) => (status, None),
    }
}

/// Make a GET request and parse JSON response
pub async fn get_json<R: DeserializeOwned>(
    app: &Router,
    path: &str,
    headers: &[(&str, &str)],
) -> (StatusCode, Option<R>) {
    send(app, Method::GET, path, headers, None).await
}

/// Make a POST request with JSON body and parse JSON response
pub async fn post_json<T: Serialize, R: DeserializeOwned>(
    app: &Router,
    path: &str,
    headers: &[(&str, &str)],
    body: &T,
) -> (StatusCode, Option<R>) {
    let json = serde_json::to_string(body).unwrap();
    send(app, Method::POST, path, headers, Some(json)).await
}

/// Make a PUT request with JSON body and parse JSON response
pub async fn put_json<T: Serialize, R: DeserializeOwned>(
    app: &Router,
    path: &str,
    headers: &[(&str, &str)],
    body: &T,
) -> (StatusCode, Option<R>) {
    let json = serde_json::to_string(body).unwrap();
    send(app, Method::PUT, path, headers, Some(json)).await
}

/// Make a DELETE request and parse JSON response
pub async fn delete_json<R: DeserializeOwned>(
    app: &Router,
    path: &str,
    headers: &[(&str, &str)],
) -> (StatusCode, Option<R>) {
    send(app, Method::DELETE, path, headers, None).await
}

/// Send a prepared request and return status, headers and raw body
pub async fn send_raw(
    app: &Router,
    request: Request<Body>,
) -> (StatusCode, axum::http::HeaderMap, Vec<u8>) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap_or_default();
    (status, headers, body.to_vec())
}
