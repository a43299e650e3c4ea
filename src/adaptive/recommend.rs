//! Challenge recommendations for the host's selection surface
//!
//! Remediation first: the top weak areas become recommendations at the
//! learner's current difficulty for the category covering the weak
//! concept. With nothing to remediate, the first unfinished progression
//! category becomes an advancement recommendation.

use std::collections::HashMap;

use crate::adaptive::difficulty::DEFAULT_DIFFICULTY;
use crate::config::CurriculumConfig;
use crate::types::{ChallengeRecommendation, RealmProgress, WeakArea};

/// How many weak areas feed recommendations
const MAX_REMEDIATIONS: usize = 3;

/// Realm completion percentage that counts as finished
const COMPLETION_THRESHOLD: f64 = 80.0;

/// Build challenge recommendations from weak areas and realm progress
///
/// `weak_areas` is expected in priority order (as produced by
/// [`crate::analytics::identify_weak_areas`]).
pub fn build_recommendations(
    weak_areas: &[WeakArea],
    config: &CurriculumConfig,
    current_difficulties: &HashMap<String, u8>,
    realm_progress: &[RealmProgress],
) -> Vec<ChallengeRecommendation> {
    let mut recommendations: Vec<ChallengeRecommendation> = weak_areas
        .iter()
        .take(MAX_REMEDIATIONS)
        .filter_map(|area| {
            let category = config
                .categories
                .iter()
                .find(|c| c.concepts.contains(&area.concept))?;
            let difficulty = current_difficulties
                .get(&category.name)
                .copied()
                .unwrap_or(DEFAULT_DIFFICULTY);
            Some(ChallengeRecommendation {
                skill_category: category.name.clone(),
                realm_id: category.realm_id.clone(),
                difficulty,
                reason: format!(
                    "strengthen {} (accuracy {:.0}% over {} attempts)",
                    area.concept,
                    area.accuracy * 100.0,
                    area.total_attempts
                ),
            })
        })
        .collect();

    if recommendations.is_empty() {
        if let Some(next) = config.categories.iter().find(|cat| {
            realm_progress
                .iter()
                .find(|r| r.realm_id == cat.realm_id)
                .map_or(true, |r| r.completion_pct < COMPLETION_THRESHOLD)
        }) {
            let difficulty = current_difficulties
                .get(&next.name)
                .copied()
                .unwrap_or(DEFAULT_DIFFICULTY);
            recommendations.push(ChallengeRecommendation {
                skill_category: next.name.clone(),
                realm_id: next.realm_id.clone(),
                difficulty,
                reason: format!("advance through {}", next.name),
            });
        }
    }

    recommendations
}
