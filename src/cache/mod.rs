//! Ephemeral key-value stores (OTP codes, comment rate limiting)
//!
//! Both stores have a Redis implementation, shared across instances with
//! key TTLs, and an in-process implementation used when Redis is not
//! configured.

pub mod memory;

use crate::config::RedisConfig;
use crate::domain::OtpRecord;
use crate::error::{AppError, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use redis::{aio::ConnectionManager, AsyncCommands, Script};
use serde::{de::DeserializeOwned, Serialize};
use std::time::Duration;

pub use memory::MemoryStore;

/// Cache key prefixes
mod keys {
    pub const OTP: &str = "taita:otp";
    pub const COMMENT_RATE: &str = "taita:comment_rate";
}

/// Pending OTP codes keyed by normalized email
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OtpStore: Send + Sync {
    /// Store a record, replacing any previous one for the email
    async fn save(&self, email: &str, record: &OtpRecord, ttl: Duration) -> Result<()>;
    async fn load(&self, email: &str) -> Result<Option<OtpRecord>>;
    async fn remove(&self, email: &str) -> Result<()>;
}

/// One comment slot per source IP and window
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommentThrottle: Send + Sync {
    /// Reserve the slot for `ip` at `at`; returns false while an earlier
    /// reservation is still inside `window`. Check and reserve are atomic.
    async fn try_acquire(&self, ip: &str, at: DateTime<Utc>, window: Duration) -> Result<bool>;
    /// Drop the reservation made at `at`, leaving newer ones in place
    async fn release(&self, ip: &str, at: DateTime<Utc>) -> Result<()>;
}

/// Whether a reservation made at `last` has expired by `now`.
/// A `last` in the future keeps the window closed.
pub fn window_open(last: DateTime<Utc>, now: DateTime<Utc>, window: Duration) -> bool {
    match now.signed_duration_since(last).to_std() {
        Ok(elapsed) => elapsed >= window,
        Err(_) => false,
    }
}

/// Cache manager for Redis operations
#[derive(Clone)]
pub struct CacheManager {
    conn: ConnectionManager,
}

impl CacheManager {
    /// Create a new cache manager
    pub async fn new(config: &RedisConfig) -> Result<Self> {
        let client = redis::Client::open(config.url.as_str()).map_err(|e| {
            AppError::Internal(anyhow::anyhow!("Failed to create Redis client: {}", e))
        })?;

        let conn = ConnectionManager::new(client)
            .await
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to connect to Redis: {}", e)))?;

        Ok(Self { conn })
    }

    /// Round-trip check used by readiness probes
    pub async fn ping(&self) -> Result<()> {
        let mut conn = self.conn.clone();
        let _: String = redis::cmd("PING").query_async(&mut conn).await?;
        Ok(())
    }

    async fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let mut conn = self.conn.clone();
        let value: Option<String> = conn.get(key).await?;

        match value {
            Some(v) => {
                let parsed = serde_json::from_str(&v).map_err(|e| {
                    AppError::Internal(anyhow::anyhow!("Cache deserialize error: {}", e))
                })?;
                Ok(Some(parsed))
            }
            None => Ok(None),
        }
    }

    async fn set<T: Serialize + Sync>(&self, key: &str, value: &T, ttl: Duration) -> Result<()> {
        let mut conn = self.conn.clone();
        let serialized = serde_json::to_string(value)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Cache serialize error: {}", e)))?;

        // SETEX rejects a zero TTL
        let _: () = conn.set_ex(key, serialized, ttl.as_secs().max(1)).await?;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        let mut conn = self.conn.clone();
        let _: () = conn.del(key).await?;
        Ok(())
    }
}

fn otp_key(email: &str) -> String {
    format!("{}:{}", keys::OTP, email)
}

fn comment_rate_key(ip: &str) -> String {
    format!("{}:{}", keys::COMMENT_RATE, ip)
}

#[async_trait]
impl OtpStore for CacheManager {
    async fn save(&self, email: &str, record: &OtpRecord, ttl: Duration) -> Result<()> {
        self.set(&otp_key(email), record, ttl).await
    }

    async fn load(&self, email: &str) -> Result<Option<OtpRecord>> {
        self.get(&otp_key(email)).await
    }

    async fn remove(&self, email: &str) -> Result<()> {
        self.delete(&otp_key(email)).await
    }
}

fn throttle_value(at: DateTime<Utc>) -> String {
    at.timestamp_micros().to_string()
}

#[async_trait]
impl CommentThrottle for CacheManager {
    async fn try_acquire(&self, ip: &str, at: DateTime<Utc>, window: Duration) -> Result<bool> {
        let mut conn = self.conn.clone();
        // SET NX fails while the previous key is alive; EX drops it after the window
        let reply: Option<String> = redis::cmd("SET")
            .arg(comment_rate_key(ip))
            .arg(throttle_value(at))
            .arg("NX")
            .arg("EX")
            .arg(window.as_secs().max(1))
            .query_async(&mut conn)
            .await?;
        Ok(reply.is_some())
    }

    async fn release(&self, ip: &str, at: DateTime<Utc>) -> Result<()> {
        let mut conn = self.conn.clone();
        let script = Script::new(
            r#"
            if redis.call('GET', KEYS[1]) == ARGV[1] then
                return redis.call('DEL', KEYS[1])
            end
            return 0
            "#,
        );
        let _: i64 = script
            .key(comment_rate_key(ip))
            .arg(throttle_value(at))
            .invoke_async(&mut conn)
            .await?;
        Ok(())
    }
}
