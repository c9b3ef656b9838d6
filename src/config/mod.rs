//! Configuration management for Taita Core

use anyhow::{Context, Result};
use std::env;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server host
    pub http_host: String,
    /// HTTP server port
    pub http_port: u16,
    /// Deployment environment ("development", "production", ...)
    pub environment: String,
    /// Database configuration
    pub database: DatabaseConfig,
    /// Redis configuration (in-process stores are used when absent)
    pub redis: Option<RedisConfig>,
    /// JWT configuration
    pub jwt: JwtConfig,
    /// Tenant resolution
    pub tenant: TenantConfig,
    /// Comment gate configuration
    pub comments: CommentConfig,
    /// OTP configuration
    pub otp: OtpConfig,
    /// Media upload configuration
    pub media: MediaConfig,
    /// Outbound email configuration
    pub email: EmailConfig,
    /// Payment webhook configuration
    pub payments: PaymentConfig,
    /// Logging and metrics
    pub telemetry: TelemetryConfig,
    /// Allowed CORS origins (empty means any)
    pub cors_allowed_origins: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
}

#[derive(Debug, Clone)]
pub struct RedisConfig {
    pub url: String,
}

#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    /// Lifetime of admin access tokens
    pub access_token_ttl_secs: i64,
    /// Lifetime of the token issued after OTP verification
    pub commenter_token_ttl_secs: i64,
}

#[derive(Debug, Clone)]
pub struct TenantConfig {
    /// Platform domain blogs are served under (e.g. "taita.blog")
    pub base_domain: String,
    /// Subdomain used when nothing else identifies the tenant
    pub default_tenant: String,
}

impl Default for TenantConfig {
    fn default() -> Self {
        Self {
            base_domain: "taita.blog".to_string(),
            default_tenant: "demo".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CommentConfig {
    /// Minimum seconds between accepted comments from one IP
    pub rate_limit_window_secs: u64,
    /// Extra denylist words on top of the built-in list
    pub extra_denylist: Vec<String>,
}

impl Default for CommentConfig {
    fn default() -> Self {
        Self {
            rate_limit_window_secs: 60,
            extra_denylist: Vec::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct OtpConfig {
    pub ttl_secs: i64,
    /// Echo the code in the request response (never in production)
    pub expose_code: bool,
}

impl Default for OtpConfig {
    fn default() -> Self {
        Self {
            ttl_secs: 600,
            expose_code: false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct MediaConfig {
    /// Directory uploaded files are written to
    pub upload_dir: String,
    /// URL prefix the upload directory is served under
    pub public_path: String,
    pub max_upload_bytes: usize,
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            upload_dir: "./uploads".to_string(),
            public_path: "/uploads".to_string(),
            max_upload_bytes: 10 * 1024 * 1024,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct EmailConfig {
    /// SMTP transport; when `None` emails are only logged
    pub smtp: Option<SmtpSettings>,
    pub from_email: String,
    pub from_name: Option<String>,
}

#[derive(Debug, Clone)]
pub struct SmtpSettings {
    pub host: String,
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
    pub use_tls: bool,
}

#[derive(Debug, Clone, Default)]
pub struct PaymentConfig {
    /// MercadoPago webhook secret; signatures are not checked when unset
    pub webhook_secret: Option<String>,
}

#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    /// "text" or "json"
    pub log_format: String,
    pub metrics_enabled: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_format: "text".to_string(),
            metrics_enabled: false,
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_bool(key: &str, default: bool) -> bool {
    env::var(key)
        .map(|s| matches!(s.to_lowercase().as_str(), "true" | "1" | "yes"))
        .unwrap_or(default)
}

fn env_list(key: &str) -> Vec<String> {
    env::var(key)
        .map(|s| {
            s.split(',')
                .map(|item| item.trim().to_string())
                .filter(|item| !item.is_empty())
                .collect()
        })
        .unwrap_or_default()
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let environment = env_or("APP_ENV", "development");
        let is_production = environment == "production";

        Ok(Self {
            http_host: env_or("HTTP_HOST", "0.0.0.0"),
            http_port: env_or("HTTP_PORT", "8080")
                .parse()
                .context("Invalid HTTP_PORT")?,
            database: DatabaseConfig {
                url: env::var("DATABASE_URL").context("DATABASE_URL is required")?,
                max_connections: env_or("DATABASE_MAX_CONNECTIONS", "10")
                    .parse()
                    .unwrap_or(10),
                min_connections: env_or("DATABASE_MIN_CONNECTIONS", "2")
                    .parse()
                    .unwrap_or(2),
            },
            redis: env::var("REDIS_URL")
                .ok()
                .filter(|url| !url.trim().is_empty())
                .map(|url| RedisConfig { url }),
            jwt: JwtConfig {
                secret: env::var("JWT_SECRET").context("JWT_SECRET is required")?,
                issuer: env_or("JWT_ISSUER", "https://api.taita.blog"),
                access_token_ttl_secs: env_or("JWT_ACCESS_TOKEN_TTL_SECS", "86400")
                    .parse()
                    .unwrap_or(86400),
                commenter_token_ttl_secs: env_or("JWT_COMMENTER_TOKEN_TTL_SECS", "3600")
                    .parse()
                    .unwrap_or(3600),
            },
            tenant: TenantConfig {
                base_domain: env_or("TENANT_BASE_DOMAIN", "taita.blog"),
                default_tenant: env_or("TENANT_DEFAULT", "demo"),
            },
            comments: CommentConfig {
                rate_limit_window_secs: env_or("COMMENT_RATE_LIMIT_WINDOW_SECS", "60")
                    .parse()
                    .unwrap_or(60),
                extra_denylist: env_list("COMMENT_EXTRA_DENYLIST"),
            },
            otp: OtpConfig {
                ttl_secs: env_or("OTP_TTL_SECS", "600").parse().unwrap_or(600),
                // Never echo codes in production, whatever the flag says
                expose_code: !is_production && env_bool("OTP_EXPOSE_CODE", false),
            },
            media: MediaConfig {
                upload_dir: env_or("UPLOAD_DIR", "./uploads"),
                public_path: env_or("UPLOAD_PUBLIC_PATH", "/uploads"),
                max_upload_bytes: env_or("UPLOAD_MAX_BYTES", "10485760")
                    .parse()
                    .unwrap_or(10 * 1024 * 1024),
            },
            email: EmailConfig {
                smtp: match env::var("SMTP_HOST") {
                    Ok(host) if !host.trim().is_empty() => Some(SmtpSettings {
                        host,
                        port: env_or("SMTP_PORT", "587")
                            .parse()
                            .context("Invalid SMTP_PORT")?,
                        username: env::var("SMTP_USERNAME").ok(),
                        password: env::var("SMTP_PASSWORD").ok(),
                        use_tls: env_bool("SMTP_USE_TLS", true),
                    }),
                    _ => None,
                },
                from_email: env_or("EMAIL_FROM", "no-reply@taita.blog"),
                from_name: env::var("EMAIL_FROM_NAME").ok(),
            },
            payments: PaymentConfig {
                webhook_secret: env::var("MERCADOPAGO_WEBHOOK_SECRET")
                    .ok()
                    .filter(|s| !s.is_empty()),
            },
            telemetry: TelemetryConfig {
                log_format: env_or("LOG_FORMAT", "text"),
                metrics_enabled: env_bool("METRICS_ENABLED", false),
            },
            cors_allowed_origins: env_list("CORS_ALLOWED_ORIGINS"),
            environment,
        })
    }

    /// Get HTTP server address
    pub fn http_addr(&self) -> String {
        format!("{}:{}", self.http_host, self.http_port)
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}
