//! Tenant resolution, health and cross-cutting middleware tests

use super::{bearer, get_json, send_raw, TestContext, TENANT_HEADER};
use crate::api::create_test_post;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::Value;
use taita_core::api::SuccessResponse;
use taita_core::domain::{Blog, Post, PublishStatus};

// ============================================================================
// Resolution Precedence
// ============================================================================

#[tokio::test]
async fn test_header_selects_blog() {
    let ctx = TestContext::new();
    ctx.seed_blog("ana").await;
    ctx.seed_blog("bea").await;
    let app = ctx.router();

    let (status, body): (StatusCode, Option<SuccessResponse<Blog>>) =
        get_json(&app, "/api/blog", &[(TENANT_HEADER, "bea"), ("host", "ana.taita.blog")]).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.unwrap().data.subdomain, "bea");
}

#[tokio::test]
async fn test_query_beats_host() {
    let ctx = TestContext::new();
    ctx.seed_blog("ana").await;
    ctx.seed_blog("bea").await;
    let app = ctx.router();

    let (status, body): (StatusCode, Option<SuccessResponse<Blog>>) =
        get_json(&app, "/api/blog?tenant=bea", &[("host", "ana.taita.blog")]).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.unwrap().data.subdomain, "bea");

    let (_, body): (StatusCode, Option<SuccessResponse<Blog>>) =
        get_json(&app, "/api/blog?subdomain=ana", &[]).await;
    assert_eq!(body.unwrap().data.subdomain, "ana");
}

#[tokio::test]
async fn test_host_subdomain_selects_blog() {
    let ctx = TestContext::new();
    ctx.seed_blog("ana").await;
    let app = ctx.router();

    let (status, body): (StatusCode, Option<SuccessResponse<Blog>>) =
        get_json(&app, "/api/blog", &[("host", "ana.taita.blog")]).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.unwrap().data.subdomain, "ana");
}

#[tokio::test]
async fn test_custom_domain_selects_blog() {
    let ctx = TestContext::new();
    let mut blog = crate::api::create_test_blog("ana");
    blog.custom_domain = Some("blog.ana.dev".to_string());
    ctx.blog_repo.add_blog(blog).await;
    let app = ctx.router();

    let (status, body): (StatusCode, Option<SuccessResponse<Blog>>) =
        get_json(&app, "/api/blog", &[("host", "blog.ana.dev:443")]).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.unwrap().data.subdomain, "ana");
}

#[tokio::test]
async fn test_localhost_falls_back_to_default_tenant() {
    let ctx = TestContext::new();
    ctx.seed_blog("demo").await;
    let app = ctx.router();

    let (status, body): (StatusCode, Option<SuccessResponse<Blog>>) =
        get_json(&app, "/api/blog", &[("host", "localhost:3000")]).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.unwrap().data.subdomain, "demo");
}

#[tokio::test]
async fn test_unknown_tenant_returns_404() {
    let ctx = TestContext::new();
    ctx.seed_blog("ana").await;
    let app = ctx.router();

    let (status, body): (StatusCode, Option<Value>) =
        get_json(&app, "/api/posts", &[(TENANT_HEADER, "nobody")]).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body.unwrap()["error"], "not_found");
}

#[tokio::test]
async fn test_public_content_is_scoped_to_resolved_blog() {
    let ctx = TestContext::new();
    let ana = ctx.seed_blog("ana").await;
    let bea = ctx.seed_blog("bea").await;
    ctx.post_repo
        .add_post(create_test_post(ana.id, "hello", PublishStatus::Published))
        .await;
    ctx.post_repo
        .add_post(create_test_post(bea.id, "other", PublishStatus::Published))
        .await;
    let app = ctx.router();

    let (status, body): (StatusCode, Option<SuccessResponse<Post>>) =
        get_json(&app, "/api/posts/hello", &[(TENANT_HEADER, "ana")]).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.unwrap().data.blog_id, ana.id);

    let (status, _): (StatusCode, Option<Value>) =
        get_json(&app, "/api/posts/hello", &[(TENANT_HEADER, "bea")]).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_admin_routes_ignore_host() {
    let ctx = TestContext::new();
    let ana = ctx.seed_blog("ana").await;
    ctx.seed_blog("bea").await;
    let token = ctx.admin_token(&ana).await;
    let auth = bearer(&token);
    let app = ctx.router();

    let (status, body): (StatusCode, Option<SuccessResponse<Blog>>) = get_json(
        &app,
        "/api/admin/blog",
        &[("authorization", auth.as_str()), (TENANT_HEADER, "bea")],
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.unwrap().data.id, ana.id);
}

// ============================================================================
// Health and Middleware
// ============================================================================

#[tokio::test]
async fn test_health_needs_no_tenant() {
    let ctx = TestContext::new();
    let app = ctx.router();

    let (status, body): (StatusCode, Option<Value>) = get_json(&app, "/health", &[]).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.unwrap()["status"], "healthy");
}

#[tokio::test]
async fn test_ready_reflects_backends() {
    let ctx = TestContext::new();
    let request = Request::builder().uri("/ready").body(Body::empty()).unwrap();
    let (status, _, body) = send_raw(&ctx.router(), request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"ready");

    let mut ctx = TestContext::new();
    ctx.ready = false;
    let request = Request::builder().uri("/ready").body(Body::empty()).unwrap();
    let (status, _, _) = send_raw(&ctx.router(), request).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_metrics_disabled_returns_404() {
    let ctx = TestContext::new();
    let request = Request::builder().uri("/metrics").body(Body::empty()).unwrap();
    let (status, _, _) = send_raw(&ctx.router(), request).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_security_headers_and_private_cache_control() {
    let ctx = TestContext::new();
    ctx.seed_blog("ana").await;
    let app = ctx.router();

    let request = Request::builder()
        .uri("/api/blog")
        .header(TENANT_HEADER, "ana")
        .body(Body::empty())
        .unwrap();
    let (_, headers, _) = send_raw(&app, request).await;
    assert_eq!(headers["x-content-type-options"], "nosniff");
    assert_eq!(headers["x-frame-options"], "DENY");
    assert!(headers.get("cache-control").is_none());

    let request = Request::builder()
        .uri("/api/admin/blog")
        .body(Body::empty())
        .unwrap();
    let (status, headers, _) = send_raw(&app, request).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(headers["cache-control"]
        .to_str()
        .unwrap()
        .contains("no-store"));
}
