//! In-process store for single-instance deployments and tests

use super::{window_open, CommentThrottle, OtpStore};
use crate::domain::OtpRecord;
use crate::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

/// Value plus the instant after which it may be pruned
struct Entry<T> {
    value: T,
    retain_until: DateTime<Utc>,
}

/// `Mutex<HashMap>` backed stores. Expired entries are pruned on every
/// write, so memory stays bounded by the number of live keys.
#[derive(Default)]
pub struct MemoryStore {
    otps: Mutex<HashMap<String, Entry<OtpRecord>>>,
    comment_rate: Mutex<HashMap<String, Entry<DateTime<Utc>>>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    // A panic while holding the lock cannot leave a map half-written
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn prune<T>(map: &mut HashMap<String, Entry<T>>, now: DateTime<Utc>) {
    map.retain(|_, entry| entry.retain_until > now);
}

fn deadline(from: DateTime<Utc>, ttl: Duration) -> DateTime<Utc> {
    chrono::Duration::from_std(ttl)
        .ok()
        .and_then(|d| from.checked_add_signed(d))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live OTP entries (after pruning)
    pub fn otp_len(&self) -> usize {
        let mut map = lock(&self.otps);
        prune(&mut map, Utc::now());
        map.len()
    }

    /// Number of tracked IPs (after pruning)
    pub fn comment_rate_len(&self) -> usize {
        let mut map = lock(&self.comment_rate);
        prune(&mut map, Utc::now());
        map.len()
    }
}

#[async_trait]
impl OtpStore for MemoryStore {
    async fn save(&self, email: &str, record: &OtpRecord, ttl: Duration) -> Result<()> {
        let now = Utc::now();
        let mut map = lock(&self.otps);
        prune(&mut map, now);
        map.insert(
            email.to_string(),
            Entry {
                value: record.clone(),
                retain_until: deadline(now, ttl).max(record.expires_at),
            },
        );
        Ok(())
    }

    async fn load(&self, email: &str) -> Result<Option<OtpRecord>> {
        Ok(lock(&self.otps).get(email).map(|e| e.value.clone()))
    }

    async fn remove(&self, email: &str) -> Result<()> {
        lock(&self.otps).remove(email);
        Ok(())
    }
}

#[async_trait]
impl CommentThrottle for MemoryStore {
    async fn try_acquire(&self, ip: &str, at: DateTime<Utc>, window: Duration) -> Result<bool> {
        let mut map = lock(&self.comment_rate);
        prune(&mut map, Utc::now());
        if let Some(entry) = map.get(ip) {
            if !window_open(entry.value, at, window) {
                return Ok(false);
            }
        }
        map.insert(
            ip.to_string(),
            Entry {
                value: at,
                retain_until: deadline(at, window),
            },
        );
        Ok(true)
    }

    async fn release(&self, ip: &str, at: DateTime<Utc>) -> Result<()> {
        let mut map = lock(&self.comment_rate);
        if map.get(ip).is_some_and(|entry| entry.value == at) {
            map.remove(ip);
        }
        Ok(())
    }
}
