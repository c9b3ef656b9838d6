//! Shared application state
//!
//! Services receive their repositories as trait objects, so the same
//! `AppState` serves production (MySQL/Redis) and the HTTP tests
//! (in-memory implementations).

use crate::cache::{CommentThrottle, OtpStore};
use crate::config::Config;
use crate::email::EmailProvider;
use crate::jwt::JwtManager;
use crate::repository::{
    BlogRepository, CommentRepository, MediaRepository, MenuRepository, PageRepository,
    PostRepository, SettingsRepository, SubscriptionRepository, TaxonomyRepository,
    UserRepository,
};
use crate::service::{
    AuthService, BlogService, CommentService, MediaService, MenuService, OtpService, PageService,
    PostService, SettingsService, SpamFilter, SubscriptionService, TaxonomyService,
};
use async_trait::async_trait;
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;
use std::time::Duration;

/// Backing store probes used by `/ready`
#[async_trait]
pub trait ReadinessCheck: Send + Sync {
    async fn database_ready(&self) -> bool;
    async fn cache_ready(&self) -> bool;
}

/// Every repository the services need
#[derive(Clone)]
pub struct Repositories {
    pub blogs: Arc<dyn BlogRepository>,
    pub users: Arc<dyn UserRepository>,
    pub posts: Arc<dyn PostRepository>,
    pub pages: Arc<dyn PageRepository>,
    pub taxonomies: Arc<dyn TaxonomyRepository>,
    pub menus: Arc<dyn MenuRepository>,
    pub comments: Arc<dyn CommentRepository>,
    pub media: Arc<dyn MediaRepository>,
    pub settings: Arc<dyn SettingsRepository>,
    pub subscriptions: Arc<dyn SubscriptionRepository>,
}

/// Ephemeral stores (Redis or in-process)
#[derive(Clone)]
pub struct Stores {
    pub otp: Arc<dyn OtpStore>,
    pub comment_throttle: Arc<dyn CommentThrottle>,
}

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub jwt_manager: JwtManager,
    pub blog_service: Arc<BlogService>,
    pub auth_service: Arc<AuthService>,
    pub otp_service: Arc<OtpService>,
    pub comment_service: Arc<CommentService>,
    pub post_service: Arc<PostService>,
    pub page_service: Arc<PageService>,
    pub taxonomy_service: Arc<TaxonomyService>,
    pub menu_service: Arc<MenuService>,
    pub media_service: Arc<MediaService>,
    pub settings_service: Arc<SettingsService>,
    pub subscription_service: Arc<SubscriptionService>,
    pub readiness: Arc<dyn ReadinessCheck>,
    pub prometheus_handle: Option<PrometheusHandle>,
}

impl AppState {
    /// Wire services from their dependencies
    pub fn build(
        config: Config,
        repos: Repositories,
        stores: Stores,
        email: Arc<dyn EmailProvider>,
        readiness: Arc<dyn ReadinessCheck>,
    ) -> Self {
        let jwt_manager = JwtManager::new(config.jwt.clone());

        let blog_service = Arc::new(BlogService::new(repos.blogs.clone()));
        let auth_service = Arc::new(AuthService::new(
            repos.blogs.clone(),
            repos.users.clone(),
            repos.settings.clone(),
            repos.subscriptions.clone(),
            email.clone(),
            jwt_manager.clone(),
            config.tenant.base_domain.clone(),
        ));
        let otp_service = Arc::new(OtpService::new(
            stores.otp,
            email,
            jwt_manager.clone(),
            config.otp.clone(),
        ));
        let comment_service = Arc::new(CommentService::new(
            repos.comments.clone(),
            repos.posts.clone(),
            repos.settings.clone(),
            stores.comment_throttle,
            jwt_manager.clone(),
            SpamFilter::new(&config.comments.extra_denylist),
            Duration::from_secs(config.comments.rate_limit_window_secs),
        ));
        let post_service = Arc::new(PostService::new(
            repos.posts.clone(),
            repos.taxonomies.clone(),
        ));
        let page_service = Arc::new(PageService::new(repos.pages.clone()));
        let taxonomy_service = Arc::new(TaxonomyService::new(
            repos.taxonomies.clone(),
            repos.posts.clone(),
        ));
        let menu_service = Arc::new(MenuService::new(repos.menus.clone()));
        let media_service = Arc::new(MediaService::new(
            repos.media.clone(),
            config.media.clone(),
        ));
        let settings_service = Arc::new(SettingsService::new(repos.settings.clone()));
        let subscription_service = Arc::new(SubscriptionService::new(
            repos.subscriptions.clone(),
            config.payments.webhook_secret.clone(),
        ));

        Self {
            config: Arc::new(config),
            jwt_manager,
            blog_service,
            auth_service,
            otp_service,
            comment_service,
            post_service,
            page_service,
            taxonomy_service,
            menu_service,
            media_service,
            settings_service,
            subscription_service,
            readiness,
            prometheus_handle: None,
        }
    }

    pub fn with_prometheus(mut self, handle: Option<PrometheusHandle>) -> Self {
        self.prometheus_handle = handle;
        self
    }
}
