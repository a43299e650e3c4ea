//! Windowed learning-velocity calculation
//!
//! Rate-of-improvement over a sliding daily/weekly/monthly window:
//! newly-learned concepts, correct answers, and accuracy/speed trends from
//! a chronological half-split of the in-window attempts.

use std::collections::HashSet;

use chrono::{DateTime, Duration, Utc};

use crate::types::{AttemptRecord, LearningSession, LearningVelocityData, VelocityWindow};

/// Minimum attempts per half before a trend is meaningful
const MIN_HALF_SAMPLE: usize = 2;

/// Volume scale for the difficulty-progression placeholder
const PROGRESSION_PER_ATTEMPT: f64 = 0.02;

/// Compute learning velocity over the given window ending at `now`
pub fn calculate_velocity(
    attempts: &[AttemptRecord],
    sessions: &[LearningSession],
    window: VelocityWindow,
    now: DateTime<Utc>,
) -> LearningVelocityData {
    let cutoff = now - Duration::days(window.days());

    let mut in_window: Vec<&AttemptRecord> = attempts
        .iter()
        .filter(|a| a.completed_at >= cutoff)
        .collect();
    in_window.sort_by_key(|a| a.completed_at);

    let new_concepts: HashSet<&String> = sessions
        .iter()
        .filter(|s| s.started_at >= cutoff)
        .flat_map(|s| s.concepts_learned.iter())
        .collect();

    let correct_attempts = in_window.iter().filter(|a| a.is_correct).count();
    let (accuracy_trend, speed_trend) = half_split_trends(&in_window);

    LearningVelocityData {
        window,
        new_concepts: new_concepts.len(),
        correct_attempts,
        accuracy_trend,
        speed_trend,
        difficulty_progression: (in_window.len() as f64 * PROGRESSION_PER_ATTEMPT).min(1.0),
    }
}

/// Accuracy and speed deltas between the two chronological halves
///
/// Either half under the minimum sample yields zero trends, not an error.
fn half_split_trends(attempts: &[&AttemptRecord]) -> (f64, f64) {
    let mid = attempts.len() / 2;
    let (first, second) = attempts.split_at(mid);
    if first.len() < MIN_HALF_SAMPLE || second.len() < MIN_HALF_SAMPLE {
        return (0.0, 0.0);
    }

    let accuracy = |half: &[&AttemptRecord]| {
        half.iter().filter(|a| a.is_correct).count() as f64 / half.len() as f64
    };
    let avg_time = |half: &[&AttemptRecord]| {
        half.iter().map(|a| a.time_elapsed).sum::<f64>() / half.len() as f64
    };

    let accuracy_trend = accuracy(second) - accuracy(first);
    let first_avg = avg_time(first);
    let speed_trend = if first_avg > 0.0 {
        (first_avg - avg_time(second)) / first_avg
    } else {
        0.0
    };

    (accuracy_trend, speed_trend)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{
        AttemptId, AttemptMetadata, ChallengeId, SessionId, SessionKind, UserId,
    };
    use chrono::TimeZone;
    use std::collections::BTreeSet;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 10, 12, 0, 0).unwrap()
    }

    fn attempt(hours_ago: i64, correct: bool, time_elapsed: f64) -> AttemptRecord {
        let completed = now() - Duration::hours(hours_ago);
        AttemptRecord {
            id: AttemptId::new(),
            user_id: UserId::new("ada"),
            challenge_id: ChallengeId::new(format!("ch-{hours_ago}")),
            started_at: completed - Duration::seconds(time_elapsed as i64),
            completed_at: completed,
            is_correct: correct,
            score: if correct { 90.0 } else { 10.0 },
            hints_used: 0,
            time_elapsed,
            metadata: AttemptMetadata::default(),
        }
    }

    fn session(days_ago: i64, learned: &[&str]) -> LearningSession {
        let started = now() - Duration::days(days_ago);
        LearningSession {
            id: SessionId::new(),
            user_id: UserId::new("ada"),
            kind: SessionKind::Practice,
            started_at: started,
            last_activity_at: started + Duration::minutes(20),
            attempt_ids: vec![],
            total_score: 0.0,
            concepts_reinforced: BTreeSet::new(),
            concepts_learned: learned.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_window_filters_attempts_and_sessions() {
        let attempts = vec![
            attempt(2, true, 30.0),   // in window
            attempt(30, true, 30.0),  // outside daily window
        ];
        let sessions = vec![
            session(0, &["Molarity"]),
            session(10, &["Stoichiometry"]), // outside
        ];
        let velocity =
            calculate_velocity(&attempts, &sessions, VelocityWindow::Daily, now());
        assert_eq!(velocity.correct_attempts, 1);
        assert_eq!(velocity.new_concepts, 1);
    }

    #[test]
    fn test_new_concepts_union_across_sessions() {
        let sessions = vec![
            session(1, &["Molarity", "Dilutions"]),
            session(2, &["Molarity", "pH"]),
        ];
        let velocity = calculate_velocity(&[], &sessions, VelocityWindow::Weekly, now());
        assert_eq!(velocity.new_concepts, 3);
    }

    #[test]
    fn test_accuracy_trend_improving() {
        // First half 1/2 correct, second half 2/2 correct.
        let attempts = vec![
            attempt(8, false, 40.0),
            attempt(6, true, 40.0),
            attempt(4, true, 20.0),
            attempt(2, true, 20.0),
        ];
        let velocity = calculate_velocity(&attempts, &[], VelocityWindow::Daily, now());
        assert!((velocity.accuracy_trend - 0.5).abs() < 1e-9);
        // Times halved: speed trend (40-20)/40 = 0.5, positive = faster.
        assert!((velocity.speed_trend - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_sparse_halves_yield_zero_trends() {
        let attempts = vec![
            attempt(4, false, 40.0),
            attempt(2, true, 20.0),
            attempt(1, true, 20.0),
        ];
        let velocity = calculate_velocity(&attempts, &[], VelocityWindow::Daily, now());
        assert_eq!(velocity.accuracy_trend, 0.0);
        assert_eq!(velocity.speed_trend, 0.0);
    }

    #[test]
    fn test_difficulty_progression_proportional_and_capped() {
        let attempts: Vec<_> = (0..10).map(|i| attempt(i + 1, true, 30.0)).collect();
        let velocity = calculate_velocity(&attempts, &[], VelocityWindow::Monthly, now());
        assert!((velocity.difficulty_progression - 0.2).abs() < 1e-9);

        let many: Vec<_> = (0..80)
            .map(|i| attempt(1 + i % 20, true, 30.0))
            .collect();
        let velocity = calculate_velocity(&many, &[], VelocityWindow::Monthly, now());
        assert_eq!(velocity.difficulty_progression, 1.0);
    }

    #[test]
    fn test_empty_window_is_all_zeroes() {
        let velocity = calculate_velocity(&[], &[], VelocityWindow::Weekly, now());
        assert_eq!(velocity.new_concepts, 0);
        assert_eq!(velocity.correct_attempts, 0);
        assert_eq!(velocity.accuracy_trend, 0.0);
        assert_eq!(velocity.speed_trend, 0.0);
        assert_eq!(velocity.difficulty_progression, 0.0);
    }
}
