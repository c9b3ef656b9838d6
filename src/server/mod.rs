//! Server initialization and routing

use crate::api;
use crate::cache::{CacheManager, MemoryStore};
use crate::config::Config;
use crate::domain::TaxonomyKind;
use crate::email;
use crate::middleware::{
    inject_client_ip, normalize_error_response, security_headers_middleware, ObservabilityLayer,
    SanitizedMakeSpan,
};
use crate::repository::{
    blog::BlogRepositoryImpl, comment::CommentRepositoryImpl, media::MediaRepositoryImpl,
    menu::MenuRepositoryImpl, page::PageRepositoryImpl, post::PostRepositoryImpl,
    settings::SettingsRepositoryImpl, subscription::SubscriptionRepositoryImpl,
    taxonomy::TaxonomyRepositoryImpl, user::UserRepositoryImpl,
};
use crate::state::{AppState, ReadinessCheck, Repositories, Stores};
use anyhow::{Context, Result};
use async_trait::async_trait;
use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method, StatusCode},
    middleware,
    routing::{get, post, put},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use sqlx::{mysql::MySqlPoolOptions, MySqlPool};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::{
    compression::CompressionLayer,
    cors::{AllowOrigin, Any, CorsLayer},
    services::ServeDir,
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::info;

/// Requests running longer than this are answered with 408
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Multipart overhead allowed on top of the configured upload limit
const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// Readiness probes against the MySQL pool and, when configured, Redis
pub struct BackendReadiness {
    pool: MySqlPool,
    cache: Option<CacheManager>,
}

#[async_trait]
impl ReadinessCheck for BackendReadiness {
    async fn database_ready(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.pool).await.is_ok()
    }

    async fn cache_ready(&self) -> bool {
        match &self.cache {
            Some(cache) => cache.ping().await.is_ok(),
            None => true,
        }
    }
}

/// Run the HTTP server
pub async fn run(config: Config, prometheus_handle: Option<PrometheusHandle>) -> Result<()> {
    info!("Initializing server...");

    let db_pool = MySqlPoolOptions::new()
        .max_connections(config.database.max_connections)
        .min_connections(config.database.min_connections)
        .connect(&config.database.url)
        .await
        .context("Failed to connect to database")?;

    info!("Connected to database");

    let cache = match &config.redis {
        Some(redis) => {
            let manager = CacheManager::new(redis).await?;
            info!("Connected to Redis");
            Some(manager)
        }
        None => {
            info!("REDIS_URL not set, using in-process stores");
            None
        }
    };
    let stores = match &cache {
        Some(manager) => Stores {
            otp: Arc::new(manager.clone()),
            comment_throttle: Arc::new(manager.clone()),
        },
        None => {
            let memory = Arc::new(MemoryStore::new());
            Stores {
                otp: memory.clone(),
                comment_throttle: memory,
            }
        }
    };

    // One pool, cloned into every repository
    let repos = Repositories {
        blogs: Arc::new(BlogRepositoryImpl::new(db_pool.clone())),
        users: Arc::new(UserRepositoryImpl::new(db_pool.clone())),
        posts: Arc::new(PostRepositoryImpl::new(db_pool.clone())),
        pages: Arc::new(PageRepositoryImpl::new(db_pool.clone())),
        taxonomies: Arc::new(TaxonomyRepositoryImpl::new(db_pool.clone())),
        menus: Arc::new(MenuRepositoryImpl::new(db_pool.clone())),
        comments: Arc::new(CommentRepositoryImpl::new(db_pool.clone())),
        media: Arc::new(MediaRepositoryImpl::new(db_pool.clone())),
        settings: Arc::new(SettingsRepositoryImpl::new(db_pool.clone())),
        subscriptions: Arc::new(SubscriptionRepositoryImpl::new(db_pool.clone())),
    };

    let email_provider = email::provider_from_config(&config.email)
        .context("Failed to configure email provider")?;
    let readiness = Arc::new(BackendReadiness {
        pool: db_pool,
        cache,
    });

    tokio::fs::create_dir_all(&config.media.upload_dir)
        .await
        .with_context(|| format!("Failed to create upload dir {}", config.media.upload_dir))?;

    let http_addr = config.http_addr();
    let state = AppState::build(config, repos, stores, email_provider, readiness)
        .with_prometheus(prometheus_handle);
    let app = build_router(state);

    let listener = TcpListener::bind(&http_addr).await?;
    info!("HTTP server started on {}", http_addr);
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    info!("HTTP server stopped");
    Ok(())
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut terminate) => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {},
                    _ = terminate.recv() => {},
                }
            }
            Err(e) => {
                tracing::warn!("Failed to install SIGTERM handler: {}", e);
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}

/// Requests running past `timeout` are answered with 408
fn timeout_layer(timeout: Duration) -> TimeoutLayer {
    TimeoutLayer::with_status_code(StatusCode::REQUEST_TIMEOUT, timeout)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers(Any);

    let parsed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| HeaderValue::from_str(o).ok())
        .collect();
    if parsed.is_empty() {
        cors.allow_origin(Any)
    } else {
        cors.allow_origin(AllowOrigin::list(parsed))
    }
}

/// Build the HTTP router
pub fn build_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.cors_allowed_origins);
    let upload_limit = state.config.media.max_upload_bytes + MULTIPART_OVERHEAD;
    let uploads = ServeDir::new(&state.config.media.upload_dir);
    let uploads_path = format!(
        "/{}",
        state.config.media.public_path.trim_matches('/')
    );

    let public = Router::new()
        .route("/api/blog", get(api::blog::get_public))
        .route("/api/settings", get(api::settings::get_public))
        .route("/api/posts", get(api::post::list_public))
        .route("/api/posts/{slug}", get(api::post::get_public))
        .route(
            "/api/posts/{slug}/comments",
            get(api::comment::list_public).post(api::comment::submit),
        )
        .route("/api/pages", get(api::page::list_public))
        .route("/api/pages/{slug}", get(api::page::get_public))
        .route("/api/series/{slug}", get(api::taxonomy::series_detail))
        .route("/api/menu", get(api::menu::list_public))
        .merge(api::taxonomy::public_routes(
            "/api/categories",
            TaxonomyKind::Category,
        ))
        .merge(api::taxonomy::public_routes("/api/tags", TaxonomyKind::Tag))
        .merge(api::taxonomy::public_routes(
            "/api/series",
            TaxonomyKind::Series,
        ));

    let auth = Router::new()
        .route("/api/auth/signup", post(api::auth::signup))
        .route("/api/auth/login", post(api::auth::login))
        .route("/api/auth/me", get(api::auth::me))
        .route("/api/auth/otp/request", post(api::auth::request_otp))
        .route("/api/auth/otp/verify", post(api::auth::verify_otp));

    let admin = Router::new()
        .route(
            "/api/admin/blog",
            get(api::blog::get).put(api::blog::update),
        )
        .route(
            "/api/admin/settings",
            get(api::settings::get).put(api::settings::update),
        )
        .route(
            "/api/admin/posts",
            get(api::post::list).post(api::post::create),
        )
        .route(
            "/api/admin/posts/{id}",
            get(api::post::get)
                .put(api::post::update)
                .delete(api::post::delete),
        )
        .route(
            "/api/admin/pages",
            get(api::page::list).post(api::page::create),
        )
        .route(
            "/api/admin/pages/{id}",
            get(api::page::get)
                .put(api::page::update)
                .delete(api::page::delete),
        )
        .route(
            "/api/admin/menu",
            get(api::menu::list).post(api::menu::create),
        )
        .route("/api/admin/menu/reorder", put(api::menu::reorder))
        .route(
            "/api/admin/menu/{id}",
            put(api::menu::update).delete(api::menu::delete),
        )
        .route("/api/admin/comments", get(api::comment::list))
        .route(
            "/api/admin/comments/{id}/status",
            put(api::comment::set_status),
        )
        .route(
            "/api/admin/comments/{id}",
            axum::routing::delete(api::comment::delete),
        )
        .route(
            "/api/admin/media",
            get(api::media::list)
                .post(api::media::upload)
                .layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route(
            "/api/admin/media/{id}",
            axum::routing::delete(api::media::delete),
        )
        .route("/api/admin/subscription", get(api::subscription::get))
        .merge(api::taxonomy::admin_routes(
            "/api/admin/categories",
            TaxonomyKind::Category,
        ))
        .merge(api::taxonomy::admin_routes(
            "/api/admin/tags",
            TaxonomyKind::Tag,
        ))
        .merge(api::taxonomy::admin_routes(
            "/api/admin/series",
            TaxonomyKind::Series,
        ));

    Router::new()
        .route("/health", get(api::health::health))
        .route("/ready", get(api::health::ready))
        .route("/metrics", get(api::metrics::metrics_handler))
        .route(
            "/api/webhooks/mercadopago",
            post(api::subscription::mercadopago),
        )
        .merge(public)
        .merge(auth)
        .merge(admin)
        .nest_service(&uploads_path, uploads)
        .layer(middleware::from_fn(normalize_error_response))
        .layer(middleware::from_fn(security_headers_middleware))
        .layer(middleware::from_fn(inject_client_ip))
        .layer(CompressionLayer::new())
        .layer(timeout_layer(REQUEST_TIMEOUT))
        .layer(ObservabilityLayer)
        .layer(TraceLayer::new_for_http().make_span_with(SanitizedMakeSpan))
        .layer(cors)
        .with_state(state)
}
