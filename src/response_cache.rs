//! Single-slot per-user cache of the last rendered recommendation.
//!
//! Only entitled users get cached replies. The key uses the exact hour, not
//! the slot, so two requests at different hours of the same slot never share
//! an entry.

use chrono::{DateTime, Duration, Utc};
use std::fmt;

use crate::catalog::DietChoice;
use crate::dialogue::PreferenceAnswer;
use crate::store::UserRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub hour: u32,
    pub healthy: bool,
    pub diet: DietChoice,
}

impl CacheKey {
    pub fn new(hour: u32, preferences: PreferenceAnswer) -> Self {
        Self {
            hour,
            healthy: preferences.healthy,
            diet: preferences.diet,
        }
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}_{}", self.hour, self.healthy, self.diet)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedResponse {
    pub key: CacheKey,
    pub text: String,
    pub produced_at: DateTime<Utc>,
}

impl CachedResponse {
    pub fn is_fresh(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        now - self.produced_at < ttl
    }
}

impl UserRecord {
    /// Cached text for `key`, if the user is entitled and the entry is still fresh
    pub fn cached_reply(&self, key: &CacheKey, now: DateTime<Utc>, ttl: Duration) -> Option<&str> {
        if !self.entitled {
            return None;
        }
        self.cached
            .as_ref()
            .filter(|entry| entry.key == *key && entry.is_fresh(now, ttl))
            .map(|entry| entry.text.as_str())
    }

    /// Replace the cached entry
    pub fn remember_reply(&mut self, key: CacheKey, text: String, now: DateTime<Utc>) {
        self.cached = Some(CachedResponse {
            key,
            text,
            produced_at: now,
        });
    }
}
