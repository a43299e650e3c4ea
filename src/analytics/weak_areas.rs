//! Weak-area identification
//!
//! Filters concept performance below the accuracy threshold (with enough
//! samples to mean something), pins each weak concept to its worst
//! (challenge type, realm) combination, and ranks the result for
//! remediation.

use std::collections::HashMap;

use crate::types::{AttemptRecord, ConceptPerformance, Priority, WeakArea};

/// Accuracy below which a concept qualifies as weak
const WEAK_ACCURACY: f64 = 0.6;

/// Accuracy below which a well-sampled concept is high priority
const CRITICAL_ACCURACY: f64 = 0.4;

/// Minimum attempts before a concept can qualify at all
const MIN_ATTEMPTS: usize = 3;

/// Attempts at which low accuracy escalates to high priority
const HIGH_PRIORITY_ATTEMPTS: usize = 5;

/// Identify weak areas from a user's concept rollups
///
/// `concepts` must come from the same attempt set; discovery order is
/// preserved through the final priority sort, which is stable.
pub fn identify_weak_areas(
    attempts: &[AttemptRecord],
    concepts: &[ConceptPerformance],
) -> Vec<WeakArea> {
    let mut areas: Vec<WeakArea> = concepts
        .iter()
        .filter(|c| c.accuracy < WEAK_ACCURACY && c.total_attempts >= MIN_ATTEMPTS)
        .map(|concept| {
            let (challenge_type, realm_id) = worst_combination(attempts, &concept.concept);
            let priority = priority_for(concept.accuracy, concept.total_attempts);
            WeakArea {
                suggestions: suggestions_for(concept, &challenge_type, &realm_id),
                concept: concept.concept.clone(),
                challenge_type,
                realm_id,
                accuracy: concept.accuracy,
                total_attempts: concept.total_attempts,
                priority,
            }
        })
        .collect();

    areas.sort_by_key(|a| std::cmp::Reverse(a.priority.weight()));
    areas
}

fn priority_for(accuracy: f64, attempts: usize) -> Priority {
    if accuracy < CRITICAL_ACCURACY && attempts >= HIGH_PRIORITY_ATTEMPTS {
        Priority::High
    } else if accuracy < WEAK_ACCURACY && attempts >= MIN_ATTEMPTS {
        Priority::Medium
    } else {
        Priority::Low
    }
}

/// Lowest-accuracy (challenge type, realm) pair touching a concept
fn worst_combination(attempts: &[AttemptRecord], concept: &str) -> (String, String) {
    let mut order: Vec<(String, String)> = Vec::new();
    let mut tallies: HashMap<(String, String), (usize, usize)> = HashMap::new();

    for attempt in attempts {
        if !attempt.metadata.concepts.iter().any(|c| c == concept) {
            continue;
        }
        let key = (
            attempt.metadata.challenge_type.clone(),
            attempt.metadata.realm_id.clone(),
        );
        let entry = tallies.entry(key.clone()).or_insert_with(|| {
            order.push(key);
            (0, 0)
        });
        entry.1 += 1;
        if attempt.is_correct {
            entry.0 += 1;
        }
    }

    let mut worst: Option<(&(String, String), f64)> = None;
    for key in &order {
        let (correct, total) = tallies[key];
        let accuracy = correct as f64 / total as f64;
        // Strict comparison keeps the first-seen pair on ties.
        if worst.map_or(true, |(_, w)| accuracy < w) {
            worst = Some((key, accuracy));
        }
    }

    worst
        .map(|((ct, realm), _)| (ct.clone(), realm.clone()))
        .unwrap_or_default()
}

fn suggestions_for(concept: &ConceptPerformance, challenge_type: &str, realm_id: &str) -> Vec<String> {
    let mut suggestions = vec![format!(
        "Review the fundamentals of {} before attempting new challenges",
        concept.concept
    )];
    if !challenge_type.is_empty() && !realm_id.is_empty() {
        suggestions.push(format!(
            "Practice {challenge_type} challenges in {realm_id} at a lower difficulty"
        ));
    }
    if concept.average_time > 0.0 {
        suggestions.push(format!(
            "Retry earlier {} challenges untimed to rebuild fluency",
            concept.concept
        ));
    }
    suggestions
}
