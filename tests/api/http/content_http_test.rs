//! Pages, taxonomy, menu, settings, blog profile, media and subscription HTTP tests

use super::{
    bearer, delete_json, get_json, new_id, post_json, put_json, send_raw, TestContext,
    TENANT_HEADER,
};
use crate::api::create_test_post;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::{json, Value};
use taita_core::api::{PaginatedResponse, SuccessResponse};
use taita_core::domain::{
    Blog, Media, MenuItem, Page, PublishStatus, Subscription, SubscriptionStatus, Taxonomy,
    TaxonomyKind,
};

// ============================================================================
// Pages
// ============================================================================

#[tokio::test]
async fn test_page_crud_and_public_visibility() {
    let ctx = TestContext::new();
    let blog = ctx.seed_blog("ana").await;
    let auth = bearer(&ctx.admin_token(&blog).await);
    let app = ctx.router();

    let (status, body): (StatusCode, Option<SuccessResponse<Page>>) = post_json(
        &app,
        "/api/admin/pages",
        &[("authorization", auth.as_str())],
        &json!({"title": "About Me", "content": "Hi"}),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let page = body.unwrap().data;
    assert_eq!(page.slug, "about-me");
    assert_eq!(page.status, PublishStatus::Draft);

    // Drafts stay private
    let (status, _): (StatusCode, Option<Value>) =
        get_json(&app, "/api/pages/about-me", &[(TENANT_HEADER, "ana")]).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let path = format!("/api/admin/pages/{}", page.id);
    let (status, _): (StatusCode, Option<SuccessResponse<Page>>) = put_json(
        &app,
        &path,
        &[("authorization", auth.as_str())],
        &json!({"status": "published"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body): (StatusCode, Option<SuccessResponse<Vec<Page>>>) =
        get_json(&app, "/api/pages", &[(TENANT_HEADER, "ana")]).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.unwrap().data.len(), 1);

    let (status, body): (StatusCode, Option<SuccessResponse<Page>>) =
        get_json(&app, "/api/pages/about-me", &[(TENANT_HEADER, "ana")]).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.unwrap().data.content, "Hi");

    let (status, body): (StatusCode, Option<Value>) =
        delete_json(&app, &path, &[("authorization", auth.as_str())]).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.unwrap()["message"], "Page deleted successfully");

    let (status, _): (StatusCode, Option<Value>) =
        get_json(&app, &path, &[("authorization", auth.as_str())]).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// ============================================================================
// Taxonomy
// ============================================================================

#[tokio::test]
async fn test_taxonomy_admin_crud() {
    let ctx = TestContext::new();
    let blog = ctx.seed_blog("ana").await;
    let auth = bearer(&ctx.admin_token(&blog).await);
    let app = ctx.router();

    let (status, body): (StatusCode, Option<SuccessResponse<Taxonomy>>) = post_json(
        &app,
        "/api/admin/tags",
        &[("authorization", auth.as_str())],
        &json!({"name": "Rust Lang"}),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let tag = body.unwrap().data;
    assert_eq!(tag.kind, TaxonomyKind::Tag);
    assert_eq!(tag.slug, "rust-lang");

    // Kinds are separate namespaces
    let path = format!("/api/admin/categories/{}", tag.id);
    let (status, _): (StatusCode, Option<Value>) =
        get_json(&app, &path, &[("authorization", auth.as_str())]).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let path = format!("/api/admin/tags/{}", tag.id);
    let (status, body): (StatusCode, Option<SuccessResponse<Taxonomy>>) = put_json(
        &app,
        &path,
        &[("authorization", auth.as_str())],
        &json!({"name": "Rust", "description": "Systems"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let updated = body.unwrap().data;
    assert_eq!(updated.name, "Rust");
    assert_eq!(updated.description.as_deref(), Some("Systems"));

    let (status, body): (StatusCode, Option<SuccessResponse<Vec<Taxonomy>>>) =
        get_json(&app, "/api/tags", &[(TENANT_HEADER, "ana")]).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.unwrap().data.len(), 1);

    let (status, body): (StatusCode, Option<Value>) =
        delete_json(&app, &path, &[("authorization", auth.as_str())]).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.unwrap()["message"], "Tag deleted successfully");

    let (_, body): (StatusCode, Option<SuccessResponse<Vec<Taxonomy>>>) =
        get_json(&app, "/api/tags", &[(TENANT_HEADER, "ana")]).await;
    assert!(body.unwrap().data.is_empty());
}

#[tokio::test]
async fn test_series_detail_lists_published_posts_in_order() {
    let ctx = TestContext::new();
    let blog = ctx.seed_blog("ana").await;
    let series = Taxonomy::new(blog.id, TaxonomyKind::Series, "Intro to Rust", "intro");
    ctx.taxonomy_repo.add_term(series.clone()).await;

    let mut second = create_test_post(blog.id, "part-two", PublishStatus::Published);
    second.series_id = Some(series.id);
    second.series_order = Some(2);
    let mut first = create_test_post(blog.id, "part-one", PublishStatus::Published);
    first.series_id = Some(series.id);
    first.series_order = Some(1);
    let mut draft = create_test_post(blog.id, "part-three", PublishStatus::Draft);
    draft.series_id = Some(series.id);
    draft.series_order = Some(3);
    ctx.post_repo.add_post(second).await;
    ctx.post_repo.add_post(first).await;
    ctx.post_repo.add_post(draft).await;
    let app = ctx.router();

    let (status, body): (StatusCode, Option<Value>) =
        get_json(&app, "/api/series/intro", &[(TENANT_HEADER, "ana")]).await;
    assert_eq!(status, StatusCode::OK);
    let data = &body.unwrap()["data"];
    assert_eq!(data["name"], "Intro to Rust");
    let slugs: Vec<&str> = data["posts"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["slug"].as_str().unwrap())
        .collect();
    assert_eq!(slugs, vec!["part-one", "part-two"]);

    let (status, _): (StatusCode, Option<Value>) =
        get_json(&app, "/api/series/missing", &[(TENANT_HEADER, "ana")]).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// ============================================================================
// Menu
// ============================================================================

#[tokio::test]
async fn test_menu_create_appends_and_reorders() {
    let ctx = TestContext::new();
    let blog = ctx.seed_blog("ana").await;
    let auth = bearer(&ctx.admin_token(&blog).await);
    let app = ctx.router();

    let mut ids = Vec::new();
    for (i, label) in ["Home", "About"].iter().enumerate() {
        let (status, body): (StatusCode, Option<SuccessResponse<MenuItem>>) = post_json(
            &app,
            "/api/admin/menu",
            &[("authorization", auth.as_str())],
            &json!({"label": label, "url": format!("/{}", label.to_lowercase())}),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let item = body.unwrap().data;
        assert_eq!(item.position, i as i32);
        ids.push(item.id);
    }

    let (status, body): (StatusCode, Option<SuccessResponse<Vec<MenuItem>>>) = put_json(
        &app,
        "/api/admin/menu/reorder",
        &[("authorization", auth.as_str())],
        &json!({"items": [
            {"id": ids[0].to_string(), "position": 1},
            {"id": ids[1].to_string(), "position": 0}
        ]}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let labels: Vec<String> = body.unwrap().data.into_iter().map(|i| i.label).collect();
    assert_eq!(labels, vec!["About", "Home"]);

    let (status, body): (StatusCode, Option<SuccessResponse<Vec<MenuItem>>>) =
        get_json(&app, "/api/menu", &[(TENANT_HEADER, "ana")]).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.unwrap().data[0].label, "About");
}

#[tokio::test]
async fn test_menu_reorder_unknown_item_returns_400() {
    let ctx = TestContext::new();
    let blog = ctx.seed_blog("ana").await;
    let auth = bearer(&ctx.admin_token(&blog).await);
    let app = ctx.router();

    let (status, body): (StatusCode, Option<Value>) = put_json(
        &app,
        "/api/admin/menu/reorder",
        &[("authorization", auth.as_str())],
        &json!({"items": [{"id": new_id().to_string(), "position": 0}]}),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body.unwrap()["error"], "bad_request");
}

// ============================================================================
// Settings and Blog Profile
// ============================================================================

#[tokio::test]
async fn test_settings_update_and_public_view() {
    let ctx = TestContext::new();
    let blog = ctx.seed_blog("ana").await;
    let auth = bearer(&ctx.admin_token(&blog).await);
    let app = ctx.router();

    // Missing settings read as defaults
    let (status, body): (StatusCode, Option<Value>) =
        get_json(&app, "/api/admin/settings", &[("authorization", auth.as_str())]).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.unwrap()["data"]["comments_enabled"], true);

    let (status, body): (StatusCode, Option<Value>) = put_json(
        &app,
        "/api/admin/settings",
        &[("authorization", auth.as_str())],
        &json!({"theme": "dark", "comment_blocklist": ["casino"], "posts_per_page": 5}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let data = &body.unwrap()["data"];
    assert_eq!(data["theme"], "dark");
    assert_eq!(data["comment_blocklist"][0], "casino");

    let (status, body): (StatusCode, Option<Value>) =
        get_json(&app, "/api/settings", &[(TENANT_HEADER, "ana")]).await;
    assert_eq!(status, StatusCode::OK);
    let data = &body.unwrap()["data"];
    assert_eq!(data["theme"], "dark");
    assert_eq!(data["posts_per_page"], 5);
    assert!(data.get("comment_blocklist").is_none());
    assert!(data.get("moderate_all_comments").is_none());
}

#[tokio::test]
async fn test_settings_rejects_invalid_page_size() {
    let ctx = TestContext::new();
    let blog = ctx.seed_blog("ana").await;
    let auth = bearer(&ctx.admin_token(&blog).await);
    let app = ctx.router();

    let (status, body): (StatusCode, Option<Value>) = put_json(
        &app,
        "/api/admin/settings",
        &[("authorization", auth.as_str())],
        &json!({"posts_per_page": 0}),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body.unwrap()["error"], "validation");
}

#[tokio::test]
async fn test_blog_profile_update_and_custom_domain() {
    let ctx = TestContext::new();
    let blog = ctx.seed_blog("ana").await;
    let bea = ctx.seed_blog("bea").await;
    let auth = bearer(&ctx.admin_token(&blog).await);
    let app = ctx.router();

    let (status, body): (StatusCode, Option<SuccessResponse<Blog>>) = put_json(
        &app,
        "/api/admin/blog",
        &[("authorization", auth.as_str())],
        &json!({"name": "Ana Writes", "custom_domain": "ana.dev"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.unwrap().data.name, "Ana Writes");

    let (status, body): (StatusCode, Option<SuccessResponse<Blog>>) =
        get_json(&app, "/api/blog", &[("host", "ana.dev")]).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.unwrap().data.id, blog.id);

    // Another blog cannot claim the same domain
    let other = bearer(&ctx.admin_token(&bea).await);
    let (status, _): (StatusCode, Option<Value>) = put_json(
        &app,
        "/api/admin/blog",
        &[("authorization", other.as_str())],
        &json!({"custom_domain": "ana.dev"}),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

// ============================================================================
// Media
// ============================================================================

const BOUNDARY: &str = "taita-test-boundary";
const PNG_BYTES: &[u8] = &[0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a, 1, 2, 3, 4];

fn multipart_body(content_type: &str, data: &[u8], alt_text: Option<&str>) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
    body.extend_from_slice(
        b"Content-Disposition: form-data; name=\"file\"; filename=\"picture.png\"\r\n",
    );
    body.extend_from_slice(format!("Content-Type: {}\r\n\r\n", content_type).as_bytes());
    body.extend_from_slice(data);
    body.extend_from_slice(b"\r\n");
    if let Some(alt) = alt_text {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        body.extend_from_slice(b"Content-Disposition: form-data; name=\"alt_text\"\r\n\r\n");
        body.extend_from_slice(alt.as_bytes());
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    body
}

fn upload_request(auth: &str, body: Vec<u8>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/admin/media")
        .header("authorization", auth)
        .header(
            "content-type",
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(body))
        .unwrap()
}

#[tokio::test]
async fn test_media_upload_serve_list_delete() {
    let ctx = TestContext::new();
    let blog = ctx.seed_blog("ana").await;
    let auth = bearer(&ctx.admin_token(&blog).await);
    let app = ctx.router();

    let request = upload_request(
        &auth,
        multipart_body("image/png", PNG_BYTES, Some("A picture")),
    );
    let (status, _, body) = send_raw(&app, request).await;
    assert_eq!(status, StatusCode::CREATED);
    let media: SuccessResponse<Media> = serde_json::from_slice(&body).unwrap();
    let media = media.data;
    assert_eq!(media.mime_type, "image/png");
    assert_eq!(media.original_name, "picture.png");
    assert_eq!(media.alt_text.as_deref(), Some("A picture"));
    assert_eq!(media.size_bytes, PNG_BYTES.len() as i64);
    assert!(media.filename.ends_with(".png"));
    assert_eq!(
        media.url,
        format!("/uploads/{}/{}", blog.id, media.filename)
    );

    // The stored file is served under its public url
    let request = Request::builder()
        .uri(&media.url)
        .body(Body::empty())
        .unwrap();
    let (status, _, served) = send_raw(&app, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(served, PNG_BYTES);

    let (status, body): (StatusCode, Option<PaginatedResponse<Media>>) =
        get_json(&app, "/api/admin/media", &[("authorization", auth.as_str())]).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.unwrap().pagination.total, 1);

    let path = format!("/api/admin/media/{}", media.id);
    let (status, _): (StatusCode, Option<Value>) =
        delete_json(&app, &path, &[("authorization", auth.as_str())]).await;
    assert_eq!(status, StatusCode::OK);

    let request = Request::builder()
        .uri(&media.url)
        .body(Body::empty())
        .unwrap();
    let (status, _, _) = send_raw(&app, request).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _): (StatusCode, Option<Value>) =
        delete_json(&app, &path, &[("authorization", auth.as_str())]).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_media_rejects_bad_uploads() {
    let ctx = TestContext::new();
    let blog = ctx.seed_blog("ana").await;
    let auth = bearer(&ctx.admin_token(&blog).await);
    let app = ctx.router();

    let request = upload_request(&auth, multipart_body("text/html", b"<p>hi</p>", None));
    let (status, _, body) = send_raw(&app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["error"], "bad_request");

    let request = upload_request(&auth, multipart_body("image/png", b"", None));
    let (status, _, _) = send_raw(&app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, body): (StatusCode, Option<PaginatedResponse<Media>>) =
        get_json(&app, "/api/admin/media", &[("authorization", auth.as_str())]).await;
    assert_eq!(body.unwrap().pagination.total, 0);
}

#[tokio::test]
async fn test_media_requires_admin() {
    let ctx = TestContext::new();
    ctx.seed_blog("ana").await;
    let app = ctx.router();

    let request = Request::builder()
        .method("POST")
        .uri("/api/admin/media")
        .header(
            "content-type",
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(multipart_body("image/png", PNG_BYTES, None)))
        .unwrap();
    let (status, _, _) = send_raw(&app, request).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

// ============================================================================
// Subscription
// ============================================================================

#[tokio::test]
async fn test_subscription_shows_free_plan() {
    let ctx = TestContext::new();
    let blog = ctx.seed_blog("ana").await;
    let auth = bearer(&ctx.admin_token(&blog).await);
    let app = ctx.router();

    let (status, body): (StatusCode, Option<SuccessResponse<Subscription>>) = get_json(
        &app,
        "/api/admin/subscription",
        &[("authorization", auth.as_str())],
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let subscription = body.unwrap().data;
    assert_eq!(subscription.plan, "free");
    assert_eq!(subscription.status, SubscriptionStatus::Active);
    assert_eq!(subscription.blog_id, blog.id);
}
