//! # User Store Module
//!
//! In-memory, process-lifetime state for every user that ever talked to the
//! bot. Each user has one record behind its own mutex, so the
//! read-then-write sequences of the orchestrator never interleave for the
//! same user while different users proceed independently.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard, RwLock};

use crate::dialogue::PreferenceDialogue;
use crate::response_cache::CachedResponse;

/// Opaque user identifier (the Telegram user id)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UserKey(pub u64);

impl fmt::Display for UserKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Everything the bot knows about one user
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserRecord {
    /// Paid for lifetime access
    pub entitled: bool,
    /// Free recommendations consumed while not entitled
    pub free_attempts_used: u32,
    /// Last cooking request that passed the rate limit
    pub last_request_at: Option<DateTime<Utc>>,
    pub dialogue: PreferenceDialogue,
    /// Last recommendation, reused for entitled users only
    pub cached: Option<CachedResponse>,
}

type SharedRecord = Arc<Mutex<UserRecord>>;

/// Keyed store of user records with per-user locking
#[derive(Debug, Default)]
pub struct UserStore {
    users: RwLock<HashMap<UserKey, SharedRecord>>,
}

impl UserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lock the record of `user`, creating an empty one on first contact
    pub async fn lock(&self, user: UserKey) -> OwnedMutexGuard<UserRecord> {
        self.record(user).await.lock_owned().await
    }

    async fn record(&self, user: UserKey) -> SharedRecord {
        if let Some(record) = self.users.read().await.get(&user) {
            return Arc::clone(record);
        }

        let mut users = self.users.write().await;
        Arc::clone(users.entry(user).or_default())
    }

    /// Copy of the current record, if the user has been seen
    pub async fn snapshot(&self, user: UserKey) -> Option<UserRecord> {
        let record = self.users.read().await.get(&user).cloned()?;
        let guard = record.lock().await;
        Some(guard.clone())
    }

    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.users.read().await.is_empty()
    }
}
