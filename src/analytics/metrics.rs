//! Per-user performance snapshot
//!
//! Combines the ledger, sessions, and per-concept rollups into one
//! `PerformanceMetrics` value. A learner with zero attempts gets a fully
//! zeroed default snapshot rather than an error. Snapshot freshness is
//! decided here; the engine owns the cache itself.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Duration, Utc};
use tracing::debug;

use crate::analytics::concepts::aggregate_concepts;
use crate::analytics::streaks::compute_streaks;
use crate::config::CurriculumConfig;
use crate::types::{
    AttemptRecord, ConceptPerformance, LearningSession, PerformanceMetrics, RealmProgress,
    StreakData, UserId,
};

/// Minimum attempts for a concept to rank as strongest/weakest
const RANKING_MIN_ATTEMPTS: usize = 3;

/// How many concepts each of the strongest/weakest lists holds
const RANKING_DEPTH: usize = 5;

/// Trailing window for the snapshot's attempts-per-day velocity scalar
const VELOCITY_WINDOW_DAYS: i64 = 7;

/// Whether a cached snapshot is still servable
pub fn is_fresh(metrics: &PerformanceMetrics, now: DateTime<Utc>, ttl: Duration) -> bool {
    now - metrics.computed_at <= ttl
}

/// Compute a complete performance snapshot from scratch
pub fn compute_metrics(
    user: &UserId,
    attempts: &[AttemptRecord],
    sessions: &[LearningSession],
    config: &CurriculumConfig,
    now: DateTime<Utc>,
) -> PerformanceMetrics {
    if attempts.is_empty() {
        debug!(user = %user, "empty ledger, returning default snapshot");
        return empty_snapshot(user.clone(), now);
    }

    let correct = attempts.iter().filter(|a| a.is_correct).count();
    let overall_accuracy = correct as f64 / attempts.len() as f64;
    let average_response_time =
        attempts.iter().map(|a| a.time_elapsed).sum::<f64>() / attempts.len() as f64;

    let concepts = aggregate_concepts(attempts);
    let (strongest, weakest) = rank_concepts(&concepts);

    let completed: HashSet<_> = attempts
        .iter()
        .filter(|a| a.is_correct)
        .map(|a| &a.challenge_id)
        .collect();

    let velocity_cutoff = now - Duration::days(VELOCITY_WINDOW_DAYS);
    let recent = attempts
        .iter()
        .filter(|a| a.completed_at > velocity_cutoff)
        .count();

    PerformanceMetrics {
        user_id: user.clone(),
        overall_accuracy,
        average_response_time,
        strongest_concepts: strongest,
        weakest_concepts: weakest,
        learning_velocity: recent as f64 / VELOCITY_WINDOW_DAYS as f64,
        streak: compute_streaks(sessions, now.date_naive()),
        realm_progress: realm_progress(attempts, config),
        total_challenges_completed: completed.len(),
        total_time_spent: sessions.iter().map(|s| s.duration_seconds()).sum(),
        computed_at: now,
    }
}

fn empty_snapshot(user_id: UserId, now: DateTime<Utc>) -> PerformanceMetrics {
    PerformanceMetrics {
        user_id,
        overall_accuracy: 0.0,
        average_response_time: 0.0,
        strongest_concepts: Vec::new(),
        weakest_concepts: Vec::new(),
        learning_velocity: 0.0,
        streak: StreakData::default(),
        realm_progress: Vec::new(),
        total_challenges_completed: 0,
        total_time_spent: 0.0,
        computed_at: now,
    }
}

/// Top and bottom concepts by accuracy among sufficiently-sampled ones
///
/// Sorts are stable, so accuracy ties retain discovery order.
fn rank_concepts(
    concepts: &[ConceptPerformance],
) -> (Vec<ConceptPerformance>, Vec<ConceptPerformance>) {
    let mut qualified: Vec<ConceptPerformance> = concepts
        .iter()
        .filter(|c| c.total_attempts >= RANKING_MIN_ATTEMPTS)
        .cloned()
        .collect();

    qualified.sort_by(|a, b| b.accuracy.total_cmp(&a.accuracy));
    let strongest: Vec<_> = qualified.iter().take(RANKING_DEPTH).cloned().collect();

    qualified.sort_by(|a, b| a.accuracy.total_cmp(&b.accuracy));
    let weakest: Vec<_> = qualified.into_iter().take(RANKING_DEPTH).collect();

    (strongest, weakest)
}

/// Per-realm rollups, in the order realms first appear in the ledger
fn realm_progress(attempts: &[AttemptRecord], config: &CurriculumConfig) -> Vec<RealmProgress> {
    let mut order: Vec<String> = Vec::new();
    let mut grouped: HashMap<String, Vec<&AttemptRecord>> = HashMap::new();
    for attempt in attempts {
        if attempt.metadata.realm_id.is_empty() {
            continue;
        }
        grouped
            .entry(attempt.metadata.realm_id.clone())
            .or_insert_with(|| {
                order.push(attempt.metadata.realm_id.clone());
                Vec::new()
            })
            .push(attempt);
    }

    order
        .into_iter()
        .map(|realm_id| {
            let group = &grouped[&realm_id];
            let unique: HashSet<_> = group.iter().map(|a| &a.challenge_id).collect();
            let total = config.realm_total(&realm_id).max(1);
            let completion_pct = (unique.len() as f64 / total as f64 * 100.0).min(100.0);

            let average_score =
                group.iter().map(|a| a.score).sum::<f64>() / group.len() as f64;
            let time_spent = group.iter().map(|a| a.time_elapsed).sum::<f64>();
            let (strongest, weakest) = challenge_type_extremes(group);

            RealmProgress {
                realm_id,
                completion_pct,
                average_score,
                time_spent,
                strongest_challenge_type: strongest,
                weakest_challenge_type: weakest,
            }
        })
        .collect()
}

/// Highest- and lowest-accuracy challenge types within one realm
fn challenge_type_extremes(attempts: &[&AttemptRecord]) -> (Option<String>, Option<String>) {
    let mut order: Vec<&str> = Vec::new();
    let mut tallies: HashMap<&str, (usize, usize)> = HashMap::new();
    for attempt in attempts {
        let tag = attempt.metadata.challenge_type.as_str();
        if tag.is_empty() {
            continue;
        }
        let entry = tallies.entry(tag).or_insert_with(|| {
            order.push(tag);
            (0, 0)
        });
        entry.1 += 1;
        if attempt.is_correct {
            entry.0 += 1;
        }
    }

    let mut strongest: Option<(&str, f64)> = None;
    let mut weakest: Option<(&str, f64)> = None;
    for tag in order {
        let (correct, total) = tallies[tag];
        let accuracy = correct as f64 / total as f64;
        // Strict comparisons keep the first-seen type on ties.
        if strongest.map_or(true, |(_, best)| accuracy > best) {
            strongest = Some((tag, accuracy));
        }
        if weakest.map_or(true, |(_, worst)| accuracy < worst) {
            weakest = Some((tag, accuracy));
        }
    }

    (
        strongest.map(|(tag, _)| tag.to_string()),
        weakest.map(|(tag, _)| tag.to_string()),
    )
}
