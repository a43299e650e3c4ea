//! In-memory store backend
//!
//! Default single-process backend: per-user state behind a `RwLock`ed map,
//! plus a bounded LRU cache for performance snapshots so long-lived
//! processes with many users don't hold every snapshot forever. The ledger
//! itself is unbounded by design (append-only; retention policy is the
//! host's concern).

use std::collections::HashMap;
use std::num::NonZeroUsize;

use async_trait::async_trait;
use lru::LruCache;
use tokio::sync::{Mutex, RwLock};

use crate::error::Result;
use crate::storage::AttemptStore;
use crate::types::{
    AttemptRecord, DifficultyAdjustment, LearningSession, PerformanceMetrics,
    PersonalizedLearningPath, UserId,
};

/// Maximum number of per-user metrics snapshots kept resident
const METRICS_CACHE_CAPACITY: usize = 1024;

#[derive(Default)]
struct UserState {
    attempts: Vec<AttemptRecord>,
    sessions: Vec<LearningSession>,
    adjustments: Vec<DifficultyAdjustment>,
}

/// Process-local implementation of [`AttemptStore`]
pub struct MemoryStore {
    users: RwLock<HashMap<UserId, UserState>>,
    metrics_cache: Mutex<LruCache<UserId, PerformanceMetrics>>,
    paths: RwLock<HashMap<UserId, PersonalizedLearningPath>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::with_cache_capacity(METRICS_CACHE_CAPACITY)
    }

    /// Construct with an explicit snapshot-cache capacity
    pub fn with_cache_capacity(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity.max(1)).unwrap_or(NonZeroUsize::MIN);
        Self {
            users: RwLock::new(HashMap::new()),
            metrics_cache: Mutex::new(LruCache::new(capacity)),
            paths: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AttemptStore for MemoryStore {
    async fn append_attempt(&self, attempt: AttemptRecord) -> Result<()> {
        let mut users = self.users.write().await;
        users
            .entry(attempt.user_id.clone())
            .or_default()
            .attempts
            .push(attempt);
        Ok(())
    }

    async fn attempts_for_user(&self, user: &UserId) -> Result<Vec<AttemptRecord>> {
        let users = self.users.read().await;
        Ok(users.get(user).map(|s| s.attempts.clone()).unwrap_or_default())
    }

    async fn latest_session(&self, user: &UserId) -> Result<Option<LearningSession>> {
        let users = self.users.read().await;
        Ok(users
            .get(user)
            .and_then(|s| s.sessions.iter().max_by_key(|sess| sess.last_activity_at))
            .cloned())
    }

    async fn upsert_session(&self, session: LearningSession) -> Result<()> {
        let mut users = self.users.write().await;
        let state = users.entry(session.user_id.clone()).or_default();
        match state.sessions.iter_mut().find(|s| s.id == session.id) {
            Some(existing) => *existing = session,
            None => state.sessions.push(session),
        }
        Ok(())
    }

    async fn sessions_for_user(&self, user: &UserId) -> Result<Vec<LearningSession>> {
        let users = self.users.read().await;
        Ok(users.get(user).map(|s| s.sessions.clone()).unwrap_or_default())
    }

    async fn append_adjustment(&self, adjustment: DifficultyAdjustment) -> Result<()> {
        let mut users = self.users.write().await;
        users
            .entry(adjustment.user_id.clone())
            .or_default()
            .adjustments
            .push(adjustment);
        Ok(())
    }

    async fn latest_adjustment(
        &self,
        user: &UserId,
        category: &str,
    ) -> Result<Option<DifficultyAdjustment>> {
        let users = self.users.read().await;
        Ok(users.get(user).and_then(|s| {
            // History is append-ordered, so the last match is the newest.
            s.adjustments
                .iter()
                .rev()
                .find(|a| a.skill_category == category)
                .cloned()
        }))
    }

    async fn cached_metrics(&self, user: &UserId) -> Result<Option<PerformanceMetrics>> {
        let mut cache = self.metrics_cache.lock().await;
        Ok(cache.get(user).cloned())
    }

    async fn put_cached_metrics(&self, metrics: PerformanceMetrics) -> Result<()> {
        let mut cache = self.metrics_cache.lock().await;
        cache.put(metrics.user_id.clone(), metrics);
        Ok(())
    }

    async fn evict_metrics(&self, user: &UserId) -> Result<()> {
        let mut cache = self.metrics_cache.lock().await;
        cache.pop(user);
        Ok(())
    }

    async fn cached_path(&self, user: &UserId) -> Result<Option<PersonalizedLearningPath>> {
        let paths = self.paths.read().await;
        Ok(paths.get(user).cloned())
    }

    async fn put_cached_path(&self, path: PersonalizedLearningPath) -> Result<()> {
        let mut paths = self.paths.write().await;
        paths.insert(path.user_id.clone(), path);
        Ok(())
    }
}
