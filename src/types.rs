//! Core data types for the Paideia learning engine
//!
//! This module defines the fundamental data structures flowing through the
//! analytics pipeline: attempt records, learning sessions, derived
//! performance aggregates, and difficulty adjustments. Attempts are
//! append-only; everything downstream is recomputed from them.

use std::collections::BTreeSet;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for attempt records
///
/// Wraps a UUID to provide type safety and prevent mixing attempt IDs
/// with other UUID-based identifiers in the system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttemptId(pub Uuid);

impl AttemptId {
    /// Create a new random attempt ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for AttemptId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for AttemptId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for learning sessions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(pub Uuid);

impl SessionId {
    /// Create a new random session ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Learner identifier, issued by the host system's auth layer
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Challenge identifier, issued by the host system's content catalog
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChallengeId(pub String);

impl ChallengeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl std::fmt::Display for ChallengeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Device class the attempt was made from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceClass {
    Desktop,
    Tablet,
    Phone,
    Unknown,
}

impl Default for DeviceClass {
    fn default() -> Self {
        DeviceClass::Unknown
    }
}

/// Challenge metadata attached to each attempt by the content catalog
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AttemptMetadata {
    /// Device the attempt came from
    pub device: DeviceClass,

    /// Curriculum-area grouping the challenge belongs to
    pub realm_id: String,

    /// Challenge-type tag (e.g. "balancing-drill", "boss-synthesis")
    pub challenge_type: String,

    /// Skill/topic tags involved in the challenge
    pub concepts: Vec<String>,
}

/// One evaluated response to one challenge
///
/// Immutable once created; owned exclusively by the attempt ledger and
/// appended, never mutated or deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttemptRecord {
    /// Unique identifier
    pub id: AttemptId,

    /// Learner who made the attempt
    pub user_id: UserId,

    /// Challenge attempted
    pub challenge_id: ChallengeId,

    /// When the learner started the challenge
    pub started_at: DateTime<Utc>,

    /// When the response was submitted
    pub completed_at: DateTime<Utc>,

    /// Whether the response was graded correct
    pub is_correct: bool,

    /// Numeric score (0-100)
    pub score: f64,

    /// Hints consumed during the attempt
    pub hints_used: u32,

    /// Elapsed time in seconds
    pub time_elapsed: f64,

    /// Realm/type/concept tags from the content catalog
    pub metadata: AttemptMetadata,
}

/// Inbound answer shape supplied by the challenge-evaluation collaborator
///
/// `time_elapsed` on the resulting record is derived from these timestamps.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnswerSubmission {
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
    pub hints_used: u32,
}

impl AnswerSubmission {
    /// Elapsed seconds between start and submission, floored at zero
    pub fn elapsed_seconds(&self) -> f64 {
        let millis = (self.completed_at - self.started_at).num_milliseconds();
        (millis.max(0) as f64) / 1000.0
    }
}

/// Grading result supplied by the challenge-evaluation collaborator
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AttemptOutcome {
    pub is_correct: bool,

    /// Score in 0-100
    pub score: f64,
}

/// Session classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionKind {
    Practice,
    Quest,
    Boss,
    Tournament,
}

impl SessionKind {
    /// Classify a session from its opening attempt's challenge-type tag
    pub fn from_challenge_type(challenge_type: &str) -> Self {
        let tag = challenge_type.to_ascii_lowercase();
        if tag.starts_with("boss") {
            SessionKind::Boss
        } else if tag.starts_with("quest") {
            SessionKind::Quest
        } else if tag.starts_with("tournament") {
            SessionKind::Tournament
        } else {
            SessionKind::Practice
        }
    }
}

/// A time-bounded grouping of attempts for one learner
///
/// Created when an attempt arrives more than the gap threshold after the
/// previous session's last activity; extended in place otherwise.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LearningSession {
    pub id: SessionId,
    pub user_id: UserId,
    pub kind: SessionKind,
    pub started_at: DateTime<Utc>,

    /// Timestamp of the most recent attempt folded into this session
    pub last_activity_at: DateTime<Utc>,

    /// Attempts belonging to this session, in arrival order
    pub attempt_ids: Vec<AttemptId>,

    /// Cumulative score across the session's attempts
    pub total_score: f64,

    /// Concepts the learner had seen before this session
    pub concepts_reinforced: BTreeSet<String>,

    /// Concepts first touched during this session
    pub concepts_learned: BTreeSet<String>,
}

impl LearningSession {
    /// Session duration in seconds
    pub fn duration_seconds(&self) -> f64 {
        let millis = (self.last_activity_at - self.started_at).num_milliseconds();
        (millis.max(0) as f64) / 1000.0
    }
}

/// Short-term accuracy trend for a concept
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    Improving,
    Declining,
    Stable,
}

/// Derived per-(user, concept) performance rollup
///
/// Recomputed from the ledger on demand; never stored independently.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConceptPerformance {
    pub concept: String,

    /// Fraction of attempts graded correct (0-1)
    pub accuracy: f64,

    /// Mean elapsed time in seconds
    pub average_time: f64,

    pub total_attempts: usize,
    pub trend: Trend,

    /// Trustworthiness of the estimate (0-1), from score variance and
    /// sample size
    pub confidence: f64,
}

/// Consecutive-day activity streak
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreakData {
    pub current_streak: u32,
    pub longest_streak: u32,
    pub last_activity: Option<NaiveDate>,
    pub streak_type: StreakKind,
}

/// What kind of activity the streak counts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StreakKind {
    DailyActivity,
}

impl Default for StreakData {
    fn default() -> Self {
        Self {
            current_streak: 0,
            longest_streak: 0,
            last_activity: None,
            streak_type: StreakKind::DailyActivity,
        }
    }
}

impl StreakData {
    /// Reward multiplier: +0.1 per current-streak day, capped at 2.0x
    pub fn multiplier(&self) -> f64 {
        1.0 + (self.current_streak as f64 * 0.1).min(1.0)
    }
}

/// Per curriculum-area rollup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RealmProgress {
    pub realm_id: String,

    /// Unique challenges attempted / total available, as 0-100, capped
    pub completion_pct: f64,

    /// Mean attempt score within the realm
    pub average_score: f64,

    /// Seconds spent on the realm's challenges
    pub time_spent: f64,

    /// Highest-accuracy challenge type in the realm
    pub strongest_challenge_type: Option<String>,

    /// Lowest-accuracy challenge type in the realm
    pub weakest_challenge_type: Option<String>,
}

/// The per-user performance snapshot
///
/// Cached by the store; snapshots older than the configured staleness
/// window are recomputed on the next read.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerformanceMetrics {
    pub user_id: UserId,

    /// correct / total across the whole ledger (0 when empty)
    pub overall_accuracy: f64,

    /// Mean elapsed seconds across the whole ledger
    pub average_response_time: f64,

    /// Top 5 concepts by accuracy among those with >= 3 attempts
    pub strongest_concepts: Vec<ConceptPerformance>,

    /// Bottom 5 concepts by accuracy among those with >= 3 attempts
    pub weakest_concepts: Vec<ConceptPerformance>,

    /// Attempts per day over the trailing week
    pub learning_velocity: f64,

    pub streak: StreakData,
    pub realm_progress: Vec<RealmProgress>,

    /// Distinct challenges with at least one correct attempt
    pub total_challenges_completed: usize,

    /// Sum of session durations, in seconds
    pub total_time_spent: f64,

    pub computed_at: DateTime<Utc>,
}

/// Remediation priority for a weak area
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    /// Sort weight (higher sorts first)
    pub fn weight(&self) -> u8 {
        match self {
            Priority::High => 3,
            Priority::Medium => 2,
            Priority::Low => 1,
        }
    }
}

/// A concept flagged for remediation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeakArea {
    pub concept: String,

    /// Worst-performing challenge type touching the concept
    pub challenge_type: String,

    /// Realm of that worst-performing combination
    pub realm_id: String,

    pub accuracy: f64,
    pub total_attempts: usize,
    pub priority: Priority,
    pub suggestions: Vec<String>,
}

/// One difficulty decision for a (user, skill category) pair
///
/// Append-only history; the current difficulty is the most recent entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DifficultyAdjustment {
    pub user_id: UserId,
    pub skill_category: String,

    /// Difficulty level before the adjustment (1-5)
    pub previous_difficulty: u8,

    /// Recommended difficulty level (1-5)
    pub recommended_difficulty: u8,

    /// Human-readable justification, one clause per triggered rule
    pub reason: String,

    /// Trustworthiness of the recommendation (0-1)
    pub confidence: f64,

    pub adjusted_at: DateTime<Utc>,
}

/// Sliding window used for velocity calculations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VelocityWindow {
    Daily,
    Weekly,
    Monthly,
}

impl VelocityWindow {
    /// Window length in days
    pub fn days(&self) -> i64 {
        match self {
            VelocityWindow::Daily => 1,
            VelocityWindow::Weekly => 7,
            VelocityWindow::Monthly => 30,
        }
    }
}

/// Rate-of-improvement summary over a sliding window
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LearningVelocityData {
    pub window: VelocityWindow,

    /// Distinct newly-learned concepts across in-window sessions
    pub new_concepts: usize,

    /// Correctly answered attempts in the window
    pub correct_attempts: usize,

    /// Second-half accuracy minus first-half accuracy
    pub accuracy_trend: f64,

    /// Relative speedup; positive means getting faster
    pub speed_trend: f64,

    /// Volume-proportional progression heuristic (0-1)
    pub difficulty_progression: f64,
}

/// In-session performance fed to the realtime difficulty rules
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RecentPerformance {
    /// Accuracy over the recent in-session attempts (0-1)
    pub accuracy: f64,

    /// Mean elapsed seconds over those attempts
    pub average_time: f64,

    /// Current consecutive-correct count within the session
    pub streak: u32,
}

/// One recommended activity in a personalized learning path
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LearningPathNode {
    pub skill_category: String,

    /// Difficulty to present the category at (1-5)
    pub target_difficulty: u8,

    /// Concepts the category covers
    pub concepts: Vec<String>,

    /// Concepts the learner should have seen first
    pub prerequisites: Vec<String>,

    /// Estimated minutes of work
    pub estimated_minutes: u32,

    /// Higher means more urgent
    pub priority_score: u32,
}

/// Ordered sequence of recommended activities, built fresh per request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonalizedLearningPath {
    pub user_id: UserId,

    /// Mastery level the path aims toward (1-5)
    pub target_level: u8,

    pub nodes: Vec<LearningPathNode>,
    pub generated_at: DateTime<Utc>,
}

/// A challenge-selection hint for the host's recommendation surface
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChallengeRecommendation {
    pub skill_category: String,
    pub realm_id: String,

    /// Difficulty to select challenges at (1-5)
    pub difficulty: u8,

    pub reason: String,
}
