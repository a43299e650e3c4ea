//! Personalized learning-path construction
//!
//! Walks the curriculum's hand-authored progression, keeps the categories
//! the learner hasn't finished, and orders them by remediation priority
//! with a fewest-prerequisites-first tiebreak. The tiebreak is a cheap
//! topological approximation, not a full dependency solver.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::adaptive::difficulty::calculate_optimal_difficulty;
use crate::config::CurriculumConfig;
use crate::types::{
    ConceptPerformance, LearningPathNode, PersonalizedLearningPath, RealmProgress, UserId,
};

/// Realm completion percentage at which a category drops out of the path
const COMPLETION_THRESHOLD: f64 = 80.0;

/// Base minutes for a difficulty-1 activity
const BASE_MINUTES: f64 = 15.0;

/// Extra time per difficulty level above 1
const MINUTES_PER_LEVEL: f64 = 0.3;

/// Priority when a category has no performance data yet
const UNKNOWN_PRIORITY: u32 = 5;

/// Build a learning path toward the requested mastery level
pub fn build_path(
    user: &UserId,
    config: &CurriculumConfig,
    current_difficulties: &HashMap<String, u8>,
    concepts: &[ConceptPerformance],
    realm_progress: &[RealmProgress],
    target_level: u8,
    now: DateTime<Utc>,
) -> PersonalizedLearningPath {
    let target_level = target_level.clamp(1, 5);

    let mut nodes: Vec<LearningPathNode> = config
        .categories
        .iter()
        .filter(|cat| {
            realm_progress
                .iter()
                .find(|r| r.realm_id == cat.realm_id)
                .map_or(true, |r| r.completion_pct < COMPLETION_THRESHOLD)
        })
        .map(|cat| {
            let current = current_difficulties
                .get(&cat.name)
                .copied()
                .unwrap_or(crate::adaptive::DEFAULT_DIFFICULTY);
            let adjustment = calculate_optimal_difficulty(user, cat, current, concepts, now);
            let difficulty = adjustment.recommended_difficulty.min(target_level).max(1);

            LearningPathNode {
                skill_category: cat.name.clone(),
                target_difficulty: difficulty,
                concepts: cat.concepts.clone(),
                prerequisites: cat.prerequisites.clone(),
                estimated_minutes: estimated_minutes(difficulty),
                priority_score: priority_for(cat.concepts.as_slice(), concepts),
            }
        })
        .collect();

    nodes.sort_by(|a, b| {
        b.priority_score
            .cmp(&a.priority_score)
            .then(a.prerequisites.len().cmp(&b.prerequisites.len()))
    });

    debug!(user = %user, target_level, nodes = nodes.len(), "learning path built");

    PersonalizedLearningPath {
        user_id: user.clone(),
        target_level,
        nodes,
        generated_at: now,
    }
}

fn estimated_minutes(difficulty: u8) -> u32 {
    (BASE_MINUTES * (1.0 + MINUTES_PER_LEVEL * (difficulty.saturating_sub(1)) as f64)).round()
        as u32
}

/// Priority from mean accuracy over the category's concepts
fn priority_for(category_concepts: &[String], concepts: &[ConceptPerformance]) -> u32 {
    let relevant: Vec<&ConceptPerformance> = concepts
        .iter()
        .filter(|c| category_concepts.contains(&c.concept))
        .collect();
    if relevant.is_empty() {
        return UNKNOWN_PRIORITY;
    }

    let mean = relevant.iter().map(|c| c.accuracy).sum::<f64>() / relevant.len() as f64;
    if mean < 0.5 {
        10
    } else if mean < 0.7 {
        7
    } else if mean < 0.85 {
        5
    } else {
        3
    }
}
