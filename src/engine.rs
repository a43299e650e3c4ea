//! Engine facade wiring the store, config, and pipeline together
//!
//! `LearningEngine` is the narrow interface the host system talks to: one
//! inbound write (`record_attempt`) and the read surface for metrics,
//! weak areas, velocity, difficulty, recommendations, and paths.
//!
//! # Concurrency
//!
//! Every store call is internally atomic, but sequences of store calls
//! (e.g. the session fold inside `record_attempt`) are not. The engine
//! follows the cooperative model the host runs under: two logically
//! concurrent operations for the *same* user must not be interleaved by
//! the caller. Operations for different users are independent.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info};

use crate::adaptive::{self, DEFAULT_DIFFICULTY};
use crate::analytics;
use crate::config::{CurriculumConfig, SkillCategory};
use crate::error::{EngineError, Result};
use crate::storage::{memory::MemoryStore, AttemptStore};
use crate::types::{
    AnswerSubmission, AttemptMetadata, AttemptOutcome, AttemptRecord, ChallengeId,
    ChallengeRecommendation, DifficultyAdjustment, LearningVelocityData, PerformanceMetrics,
    PersonalizedLearningPath, RecentPerformance, UserId, VelocityWindow, WeakArea,
};

/// The adaptive learning analytics and difficulty engine
pub struct LearningEngine {
    store: Arc<dyn AttemptStore>,
    config: Arc<CurriculumConfig>,
}

impl LearningEngine {
    /// Create an engine over an injected store and curriculum
    pub fn new(store: Arc<dyn AttemptStore>, config: CurriculumConfig) -> Self {
        Self {
            store,
            config: Arc::new(config),
        }
    }

    /// Engine over the in-memory store and built-in curriculum
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()), CurriculumConfig::default())
    }

    /// The curriculum this engine runs against
    pub fn config(&self) -> &CurriculumConfig {
        &self.config
    }

    /// Record one evaluated attempt and fold it into the session stream
    ///
    /// Appends to the user's ledger, extends or opens a learning session,
    /// and evicts the user's cached metrics so the next read recomputes.
    pub async fn record_attempt(
        &self,
        user_id: UserId,
        challenge_id: ChallengeId,
        metadata: AttemptMetadata,
        answer: AnswerSubmission,
        outcome: AttemptOutcome,
    ) -> Result<AttemptRecord> {
        let record =
            analytics::build_attempt(user_id, challenge_id, metadata, &answer, outcome);

        // Concepts already present in the ledger are "reinforced" when
        // they recur; the rest are newly learned.
        let prior = self.store.attempts_for_user(&record.user_id).await?;
        let seen: HashSet<String> = prior
            .iter()
            .flat_map(|a| a.metadata.concepts.iter().cloned())
            .collect();

        let latest = self.store.latest_session(&record.user_id).await?;
        let session =
            analytics::fold_into_session(latest, &record, &seen, self.config.session_gap());

        self.store.upsert_session(session).await?;
        self.store.append_attempt(record.clone()).await?;
        self.store.evict_metrics(&record.user_id).await?;

        info!(
            user = %record.user_id,
            challenge = %record.challenge_id,
            correct = record.is_correct,
            "attempt recorded"
        );
        Ok(record)
    }

    /// Per-user performance snapshot, served from cache while fresh
    pub async fn performance_metrics(&self, user: &UserId) -> Result<PerformanceMetrics> {
        let now = Utc::now();
        if let Some(cached) = self.store.cached_metrics(user).await? {
            if analytics::is_fresh(&cached, now, self.config.metrics_cache_ttl()) {
                debug!(user = %user, "serving cached performance snapshot");
                return Ok(cached);
            }
        }

        let attempts = self.store.attempts_for_user(user).await?;
        let sessions = self.store.sessions_for_user(user).await?;
        let metrics = analytics::compute_metrics(user, &attempts, &sessions, &self.config, now);
        self.store.put_cached_metrics(metrics.clone()).await?;
        Ok(metrics)
    }

    /// Concepts needing remediation, highest priority first
    pub async fn identify_weak_areas(&self, user: &UserId) -> Result<Vec<WeakArea>> {
        let attempts = self.store.attempts_for_user(user).await?;
        let concepts = analytics::aggregate_concepts(&attempts);
        Ok(analytics::identify_weak_areas(&attempts, &concepts))
    }

    /// Rate of improvement over a sliding window
    pub async fn learning_velocity(
        &self,
        user: &UserId,
        window: VelocityWindow,
    ) -> Result<LearningVelocityData> {
        let attempts = self.store.attempts_for_user(user).await?;
        let sessions = self.store.sessions_for_user(user).await?;
        Ok(analytics::calculate_velocity(
            &attempts,
            &sessions,
            window,
            Utc::now(),
        ))
    }

    /// Current difficulty for a (user, category) pair
    ///
    /// The most recent adjustment of either kind (batch or realtime) wins;
    /// with no history the default level applies.
    pub async fn current_difficulty(&self, user: &UserId, category: &str) -> Result<u8> {
        self.require_category(category)?;
        Ok(self
            .store
            .latest_adjustment(user, category)
            .await?
            .map(|a| a.recommended_difficulty)
            .unwrap_or(DEFAULT_DIFFICULTY))
    }

    /// Batch difficulty recalculation for a skill category
    ///
    /// The resulting adjustment is appended to the user's history and
    /// becomes the new current difficulty.
    pub async fn calculate_optimal_difficulty(
        &self,
        user: &UserId,
        category: &str,
    ) -> Result<DifficultyAdjustment> {
        let cat = self.require_category(category)?.clone();
        let current = self.current_difficulty(user, category).await?;

        let attempts = self.store.attempts_for_user(user).await?;
        let concepts = analytics::aggregate_concepts(&attempts);
        let adjustment =
            adaptive::calculate_optimal_difficulty(user, &cat, current, &concepts, Utc::now());

        self.store.append_adjustment(adjustment.clone()).await?;
        Ok(adjustment)
    }

    /// Fast in-session adjustment from recent performance
    ///
    /// Returns `Ok(None)` when no trigger rule matches; a match is
    /// appended to the adjustment history without replacing prior entries.
    pub async fn adjust_difficulty_realtime(
        &self,
        user: &UserId,
        category: &str,
        recent: RecentPerformance,
    ) -> Result<Option<DifficultyAdjustment>> {
        self.require_category(category)?;
        let current = self.current_difficulty(user, category).await?;

        let adjustment = adaptive::adjust_realtime(user, category, current, recent, Utc::now());
        if let Some(ref adj) = adjustment {
            self.store.append_adjustment(adj.clone()).await?;
        }
        Ok(adjustment)
    }

    /// Challenge-selection hints for the host's recommendation surface
    pub async fn challenge_recommendations(
        &self,
        user: &UserId,
    ) -> Result<Vec<ChallengeRecommendation>> {
        let weak_areas = self.identify_weak_areas(user).await?;
        let metrics = self.performance_metrics(user).await?;
        let difficulties = self.current_difficulties(user).await?;
        Ok(adaptive::build_recommendations(
            &weak_areas,
            &self.config,
            &difficulties,
            &metrics.realm_progress,
        ))
    }

    /// Build (and cache) a prioritized, prerequisite-ordered learning path
    pub async fn personalized_learning_path(
        &self,
        user: &UserId,
        target_level: u8,
    ) -> Result<PersonalizedLearningPath> {
        let metrics = self.performance_metrics(user).await?;
        let attempts = self.store.attempts_for_user(user).await?;
        let concepts = analytics::aggregate_concepts(&attempts);
        let difficulties = self.current_difficulties(user).await?;

        let path = adaptive::build_path(
            user,
            &self.config,
            &difficulties,
            &concepts,
            &metrics.realm_progress,
            target_level,
            Utc::now(),
        );
        self.store.put_cached_path(path.clone()).await?;
        Ok(path)
    }

    /// The last path built for a user, if any
    pub async fn last_learning_path(
        &self,
        user: &UserId,
    ) -> Result<Option<PersonalizedLearningPath>> {
        self.store.cached_path(user).await
    }

    /// Current difficulty per configured category
    async fn current_difficulties(&self, user: &UserId) -> Result<HashMap<String, u8>> {
        let mut difficulties = HashMap::with_capacity(self.config.categories.len());
        for cat in &self.config.categories {
            let level = self
                .store
                .latest_adjustment(user, &cat.name)
                .await?
                .map(|a| a.recommended_difficulty)
                .unwrap_or(DEFAULT_DIFFICULTY);
            difficulties.insert(cat.name.clone(), level);
        }
        Ok(difficulties)
    }

    fn require_category(&self, name: &str) -> Result<&SkillCategory> {
        self.config
            .category(name)
            .ok_or_else(|| EngineError::UnknownCategory(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn answer(secs_ago: i64, elapsed: i64) -> AnswerSubmission {
        let completed = Utc::now() - Duration::seconds(secs_ago);
        AnswerSubmission {
            started_at: completed - Duration::seconds(elapsed),
            completed_at: completed,
            hints_used: 0,
        }
    }

    fn metadata(concepts: &[&str]) -> AttemptMetadata {
        AttemptMetadata {
            realm_id: "realm-reactions".to_string(),
            challenge_type: "drill".to_string(),
            concepts: concepts.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_unknown_category_is_an_error() {
        let engine = LearningEngine::in_memory();
        let user = UserId::new("ada");
        let err = engine
            .current_difficulty(&user, "interpretive-dance")
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::UnknownCategory(_)));
    }

    #[tokio::test]
    async fn test_default_difficulty_without_history() {
        let engine = LearningEngine::in_memory();
        let user = UserId::new("ada");
        assert_eq!(
            engine
                .current_difficulty(&user, "stoichiometry")
                .await
                .unwrap(),
            3
        );
    }

    #[tokio::test]
    async fn test_realtime_adjustment_feeds_batch_baseline() {
        let engine = LearningEngine::in_memory();
        let user = UserId::new("ada");

        let adjustment = engine
            .adjust_difficulty_realtime(
                &user,
                "stoichiometry",
                RecentPerformance {
                    accuracy: 0.96,
                    average_time: 40.0,
                    streak: 4,
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(adjustment.recommended_difficulty, 4);

        // Shared history: the realtime entry is now the baseline.
        assert_eq!(
            engine
                .current_difficulty(&user, "stoichiometry")
                .await
                .unwrap(),
            4
        );

        // Cold-start batch calc steps down from that baseline.
        let batch = engine
            .calculate_optimal_difficulty(&user, "stoichiometry")
            .await
            .unwrap();
        assert_eq!(batch.previous_difficulty, 4);
        assert_eq!(batch.recommended_difficulty, 3);
        assert_eq!(batch.confidence, 0.5);
    }

    #[tokio::test]
    async fn test_record_attempt_builds_sessions() {
        let engine = LearningEngine::in_memory();
        let user = UserId::new("ada");

        engine
            .record_attempt(
                user.clone(),
                ChallengeId::new("ch-1"),
                metadata(&["Balancing Equations"]),
                answer(600, 40),
                AttemptOutcome {
                    is_correct: true,
                    score: 90.0,
                },
            )
            .await
            .unwrap();
        engine
            .record_attempt(
                user.clone(),
                ChallengeId::new("ch-2"),
                metadata(&["Balancing Equations", "Reaction Types"]),
                answer(300, 50),
                AttemptOutcome {
                    is_correct: false,
                    score: 30.0,
                },
            )
            .await
            .unwrap();

        let metrics = engine.performance_metrics(&user).await.unwrap();
        assert_eq!(metrics.overall_accuracy, 0.5);
        assert_eq!(metrics.total_challenges_completed, 1);
        // Both attempts landed within the session gap.
        assert_eq!(metrics.streak.current_streak, 1);
    }
}
