//! Multi-factor difficulty adjustment
//!
//! Two entry points: the batch calculation, which weighs accuracy, timing,
//! sample size, and trend across a category's concepts into a clamped
//! single-step move; and the realtime in-session rules, which take the
//! first matching trigger or decline to adjust at all.

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::config::SkillCategory;
use crate::types::{ConceptPerformance, DifficultyAdjustment, RecentPerformance, Trend, UserId};

/// Difficulty assumed for a (user, category) pair with no history
pub const DEFAULT_DIFFICULTY: u8 = 3;

/// Valid difficulty range
const MIN_DIFFICULTY: u8 = 1;
const MAX_DIFFICULTY: u8 = 5;

/// Largest single-step difficulty move
const MAX_STEP: f64 = 2.0;

/// Starting confidence for a batch recommendation; only ever reduced
const BASE_CONFIDENCE: f64 = 0.8;

/// Confidence when no performance data exists for the category
const COLD_START_CONFIDENCE: f64 = 0.5;

/// Fixed confidence for realtime trigger matches
const REALTIME_CONFIDENCE: f64 = 0.9;

/// Mean attempts below which confidence is penalized
const MIN_SAMPLE_MEAN: f64 = 3.0;

/// Multiplier applied to confidence under the sample threshold
const LOW_SAMPLE_FACTOR: f64 = 0.6;

/// Batch recommendation: optimal difficulty for a skill category
///
/// `concepts` is the user's full concept rollup; only entries mapped to
/// the category contribute. With no relevant data the cold-start policy
/// steps down one level at reduced confidence.
pub fn calculate_optimal_difficulty(
    user: &UserId,
    category: &SkillCategory,
    current_difficulty: u8,
    concepts: &[ConceptPerformance],
    now: DateTime<Utc>,
) -> DifficultyAdjustment {
    let relevant: Vec<&ConceptPerformance> = concepts
        .iter()
        .filter(|c| category.concepts.contains(&c.concept))
        .collect();

    if relevant.is_empty() {
        return DifficultyAdjustment {
            user_id: user.clone(),
            skill_category: category.name.clone(),
            previous_difficulty: current_difficulty,
            recommended_difficulty: current_difficulty.saturating_sub(1).max(MIN_DIFFICULTY),
            reason: "no performance data for this category yet".to_string(),
            confidence: COLD_START_CONFIDENCE,
            adjusted_at: now,
        };
    }

    let count = relevant.len() as f64;
    let mean_accuracy = relevant.iter().map(|c| c.accuracy).sum::<f64>() / count;
    let mean_time = relevant.iter().map(|c| c.average_time).sum::<f64>() / count;
    let mean_attempts = relevant.iter().map(|c| c.total_attempts as f64).sum::<f64>() / count;
    let target = category.target_time_secs;

    let mut adjustment: f64 = 0.0;
    let mut confidence = BASE_CONFIDENCE;
    let mut reasons: Vec<String> = Vec::new();

    if mean_accuracy > 0.9 && mean_time < target {
        adjustment += 2.0;
        reasons.push("high accuracy with fast responses".to_string());
    } else if mean_accuracy > 0.8 && mean_time < 1.2 * target {
        adjustment += 1.0;
        reasons.push("strong accuracy at a good pace".to_string());
    }

    if mean_accuracy < 0.5 {
        adjustment -= 2.0;
        reasons.push("accuracy well below target".to_string());
    } else if mean_accuracy < 0.6 {
        adjustment -= 1.0;
        reasons.push("accuracy below target".to_string());
    }

    if mean_time > 2.0 * target {
        adjustment -= 1.0;
        reasons.push("responses far over the target time".to_string());
    }

    if mean_attempts < MIN_SAMPLE_MEAN {
        confidence *= LOW_SAMPLE_FACTOR;
        reasons.push("limited data".to_string());
    }

    match trend_vote(&relevant) {
        Trend::Improving => {
            adjustment += 0.5;
            reasons.push("improving trend".to_string());
        }
        Trend::Declining => {
            adjustment -= 0.5;
            reasons.push("declining trend".to_string());
        }
        Trend::Stable => {}
    }

    let step = adjustment.clamp(-MAX_STEP, MAX_STEP);
    let recommended = (current_difficulty as f64 + step)
        .clamp(MIN_DIFFICULTY as f64, MAX_DIFFICULTY as f64)
        .round() as u8;

    debug!(
        user = %user,
        category = %category.name,
        mean_accuracy,
        mean_time,
        step,
        recommended,
        "batch difficulty calculated"
    );

    DifficultyAdjustment {
        user_id: user.clone(),
        skill_category: category.name.clone(),
        previous_difficulty: current_difficulty,
        recommended_difficulty: recommended,
        reason: if reasons.is_empty() {
            "performance steady at the current level".to_string()
        } else {
            reasons.join("; ")
        },
        confidence,
        adjusted_at: now,
    }
}

/// Majority vote across the relevant concepts' trends
fn trend_vote(relevant: &[&ConceptPerformance]) -> Trend {
    let improving = relevant.iter().filter(|c| c.trend == Trend::Improving).count();
    let declining = relevant.iter().filter(|c| c.trend == Trend::Declining).count();
    if improving > declining {
        Trend::Improving
    } else if declining > improving {
        Trend::Declining
    } else {
        Trend::Stable
    }
}

/// Realtime in-session adjustment: first matching trigger wins
///
/// Returns `None` when no rule fires, distinguishing "evaluated, no change
/// warranted" from a zero-delta adjustment record.
pub fn adjust_realtime(
    user: &UserId,
    category_name: &str,
    current_difficulty: u8,
    recent: RecentPerformance,
    now: DateTime<Utc>,
) -> Option<DifficultyAdjustment> {
    let (delta, reason) = if recent.accuracy >= 0.95 && recent.streak >= 3 {
        (1i8, "excellent performance with an answer streak")
    } else if recent.accuracy <= 0.3 && recent.streak == 0 {
        (-1, "poor recent performance")
    } else if recent.accuracy >= 0.8 && recent.average_time < 30.0 {
        (1, "fast and accurate answers")
    } else {
        return None;
    };

    let recommended = (current_difficulty as i8 + delta)
        .clamp(MIN_DIFFICULTY as i8, MAX_DIFFICULTY as i8) as u8;

    debug!(
        user = %user,
        category = category_name,
        delta,
        recommended,
        "realtime difficulty trigger fired"
    );

    Some(DifficultyAdjustment {
        user_id: user.clone(),
        skill_category: category_name.to_string(),
        previous_difficulty: current_difficulty,
        recommended_difficulty: recommended,
        reason: reason.to_string(),
        confidence: REALTIME_CONFIDENCE,
        adjusted_at: now,
    })
}
