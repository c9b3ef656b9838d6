//! Blog owner signup and login

use crate::crypto::{hash_password, verify_password};
use crate::domain::{
    AuthTokenResponse, Blog, BlogSettings, EmailAddress, EmailMessage, LoginInput, SignupInput,
    StringUuid, Subscription, User, UserRole,
};
use crate::email::{EmailProvider, EmailTemplate, TemplateEngine};
use crate::error::{AppError, Result};
use crate::jwt::JwtManager;
use crate::repository::{
    BlogRepository, SettingsRepository, SubscriptionRepository, UserRepository,
};
use chrono::{Datelike, Utc};
use metrics::counter;
use std::sync::Arc;
use validator::Validate;

/// Subdomains that can never be claimed by a blog
const RESERVED_SUBDOMAINS: &[&str] = &["www", "api", "admin", "app", "mail", "static", "uploads"];

pub struct AuthService {
    blogs: Arc<dyn BlogRepository>,
    users: Arc<dyn UserRepository>,
    settings: Arc<dyn SettingsRepository>,
    subscriptions: Arc<dyn SubscriptionRepository>,
    email: Arc<dyn EmailProvider>,
    jwt: JwtManager,
    base_domain: String,
}

impl AuthService {
    pub fn new(
        blogs: Arc<dyn BlogRepository>,
        users: Arc<dyn UserRepository>,
        settings: Arc<dyn SettingsRepository>,
        subscriptions: Arc<dyn SubscriptionRepository>,
        email: Arc<dyn EmailProvider>,
        jwt: JwtManager,
        base_domain: String,
    ) -> Self {
        Self {
            blogs,
            users,
            settings,
            subscriptions,
            email,
            jwt,
            base_domain,
        }
    }

    fn token_response(&self, user: User) -> Result<AuthTokenResponse> {
        let access_token =
            self.jwt
                .create_access_token(user.id, &user.email, user.blog_id, user.role)?;
        Ok(AuthTokenResponse {
            access_token,
            token_type: "Bearer".to_string(),
            expires_in: self.jwt.access_token_ttl(),
            user,
        })
    }

    /// Create a blog with its owner, default settings and the free plan
    pub async fn signup(&self, input: SignupInput) -> Result<AuthTokenResponse> {
        input.validate()?;
        let subdomain = input.subdomain.to_lowercase();
        let email = input.email.trim().to_lowercase();

        if RESERVED_SUBDOMAINS.contains(&subdomain.as_str()) {
            return Err(AppError::BadRequest(format!(
                "Subdomain '{}' is reserved",
                subdomain
            )));
        }
        if self.blogs.find_by_subdomain(&subdomain).await?.is_some() {
            return Err(AppError::Conflict(format!(
                "Subdomain '{}' is already taken",
                subdomain
            )));
        }
        if self.users.find_by_email(&email).await?.is_some() {
            return Err(AppError::Conflict(
                "An account with this email already exists".to_string(),
            ));
        }

        let blog = self
            .blogs
            .create(&Blog {
                name: input.blog_name,
                subdomain,
                ..Default::default()
            })
            .await?;

        let user = self
            .users
            .create(&User {
                blog_id: blog.id,
                email,
                password_hash: hash_password(&input.password)?,
                name: input.name,
                role: UserRole::Owner,
                ..Default::default()
            })
            .await?;

        self.settings
            .upsert(blog.id, &BlogSettings::default())
            .await?;
        self.subscriptions
            .create(&Subscription::free(blog.id))
            .await?;

        tracing::info!(blog_id = %blog.id, subdomain = %blog.subdomain, "Blog created");
        self.send_welcome(&blog, &user).await;

        self.token_response(user)
    }

    async fn send_welcome(&self, blog: &Blog, user: &User) {
        let mut engine = TemplateEngine::new();
        engine
            .set("app_name", "Taita")
            .set("user_name", user.name.as_str())
            .set("blog_name", blog.name.as_str())
            .set(
                "blog_url",
                format!("https://{}.{}", blog.subdomain, self.base_domain),
            )
            .set("year", Utc::now().year().to_string());
        let rendered = engine.render_template(EmailTemplate::Welcome);
        let message = EmailMessage::new(
            EmailAddress::with_name(user.email.as_str(), user.name.as_str()),
            rendered.subject,
            rendered.html_body,
        )
        .with_text_body(rendered.text_body);

        if let Err(e) = self.email.send(&message).await {
            tracing::warn!(blog_id = %blog.id, "Failed to send welcome email: {}", e);
        }
    }

    pub async fn login(&self, input: LoginInput) -> Result<AuthTokenResponse> {
        input.validate()?;
        let email = input.email.trim().to_lowercase();

        let user = match self.users.find_by_email(&email).await? {
            Some(user) => user,
            None => {
                counter!("taita_auth_login_total", "result" => "unknown_user").increment(1);
                return Err(AppError::Unauthorized(
                    "Invalid email or password".to_string(),
                ));
            }
        };

        if !verify_password(&input.password, &user.password_hash)? {
            counter!("taita_auth_login_total", "result" => "bad_password").increment(1);
            return Err(AppError::Unauthorized(
                "Invalid email or password".to_string(),
            ));
        }

        counter!("taita_auth_login_total", "result" => "success").increment(1);
        self.token_response(user)
    }

    pub async fn me(&self, user_id: StringUuid) -> Result<User> {
        self.users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))
    }
}
