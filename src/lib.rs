//! Paideia - Adaptive Learning Analytics & Difficulty Engine
//!
//! A per-learner analytics engine that turns a raw stream of attempt
//! records into performance summaries, and uses those summaries to decide
//! what difficulty level and learning sequence to present next:
//! - Append-only attempt ledger with gap-based session tracking
//! - Per-concept accuracy/timing/trend/confidence aggregation
//! - Cached per-user performance snapshots with streaks and realm progress
//! - Weak-area detection and windowed learning velocity
//! - Feedback-controlled difficulty adjustment (batch and realtime)
//! - Prioritized, prerequisite-ordered learning paths
//!
//! # Architecture
//!
//! The system is organized into several layers:
//! - **Types**: Core data structures (AttemptRecord, PerformanceMetrics, etc.)
//! - **Storage**: The injected `AttemptStore` seam and the in-memory backend
//! - **Analytics**: Pure aggregation over the ledger
//! - **Adaptive**: Difficulty and path decisions on top of the analytics
//! - **Engine**: The facade the host service embeds
//!
//! # Example
//!
//! ```ignore
//! use paideia::{AnswerSubmission, AttemptMetadata, AttemptOutcome,
//!               ChallengeId, LearningEngine, UserId};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let engine = LearningEngine::in_memory();
//!     let user = UserId::new("learner-42");
//!
//!     engine.record_attempt(
//!         user.clone(),
//!         ChallengeId::new("stoich-11"),
//!         AttemptMetadata { /* realm, type, concepts */ ..Default::default() },
//!         AnswerSubmission { /* timestamps, hints */ ..unimplemented!() },
//!         AttemptOutcome { is_correct: true, score: 92.0 },
//!     ).await?;
//!
//!     let metrics = engine.performance_metrics(&user).await?;
//!     let path = engine.personalized_learning_path(&user, 4).await?;
//!
//!     Ok(())
//! }
//! ```

pub mod adaptive;
pub mod analytics;
pub mod config;
pub mod engine;
pub mod error;
pub mod storage;
pub mod types;

// Re-export commonly used types
pub use config::{CurriculumConfig, SkillCategory};
pub use engine::LearningEngine;
pub use error::{EngineError, Result};
pub use storage::{memory::MemoryStore, AttemptStore};
pub use types::{
    AnswerSubmission, AttemptId, AttemptMetadata, AttemptOutcome, AttemptRecord,
    ChallengeId, ChallengeRecommendation, ConceptPerformance, DifficultyAdjustment,
    LearningPathNode, LearningSession, LearningVelocityData, PerformanceMetrics,
    PersonalizedLearningPath, Priority, RealmProgress, RecentPerformance, SessionId,
    SessionKind, StreakData, Trend, UserId, VelocityWindow, WeakArea,
};
