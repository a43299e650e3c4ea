//! Storage layer for the learning engine
//!
//! Provides the injected store abstraction the aggregation logic runs
//! against: per-user attempt ledgers, learning sessions, difficulty
//! adjustment histories, and the metrics/path caches. The engine only ever
//! talks to `AttemptStore`, so a durable backend can replace the in-memory
//! one without touching the algorithmic contracts.

pub mod memory;

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{
    AttemptRecord, DifficultyAdjustment, LearningSession, PerformanceMetrics,
    PersonalizedLearningPath, UserId,
};

/// Store trait defining all required per-user state operations
///
/// Every method is internally atomic; read-modify-write sequences that
/// span calls are the caller's concern (see the concurrency notes on
/// [`crate::engine::LearningEngine`]).
#[async_trait]
pub trait AttemptStore: Send + Sync {
    /// Append an attempt to the user's ledger
    async fn append_attempt(&self, attempt: AttemptRecord) -> Result<()>;

    /// Full ledger for a user, in append order
    async fn attempts_for_user(&self, user: &UserId) -> Result<Vec<AttemptRecord>>;

    /// Most recently updated session for a user
    async fn latest_session(&self, user: &UserId) -> Result<Option<LearningSession>>;

    /// Insert a session, or replace it if the id already exists
    async fn upsert_session(&self, session: LearningSession) -> Result<()>;

    /// All sessions for a user, in creation order
    async fn sessions_for_user(&self, user: &UserId) -> Result<Vec<LearningSession>>;

    /// Append a difficulty adjustment to the user's history
    async fn append_adjustment(&self, adjustment: DifficultyAdjustment) -> Result<()>;

    /// Most recent adjustment for a (user, skill category) pair
    async fn latest_adjustment(
        &self,
        user: &UserId,
        category: &str,
    ) -> Result<Option<DifficultyAdjustment>>;

    /// Cached performance snapshot, if any (staleness is the caller's call)
    async fn cached_metrics(&self, user: &UserId) -> Result<Option<PerformanceMetrics>>;

    /// Cache a performance snapshot, replacing any previous one
    async fn put_cached_metrics(&self, metrics: PerformanceMetrics) -> Result<()>;

    /// Drop the cached snapshot for a user, forcing recomputation
    async fn evict_metrics(&self, user: &UserId) -> Result<()>;

    /// Last-built learning path for a user, if any
    async fn cached_path(&self, user: &UserId) -> Result<Option<PersonalizedLearningPath>>;

    /// Cache the last-built learning path
    async fn put_cached_path(&self, path: PersonalizedLearningPath) -> Result<()>;
}
