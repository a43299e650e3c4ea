//! Per-concept performance aggregation
//!
//! Groups a user's attempts by concept tag (one attempt can contribute to
//! several concepts) and derives accuracy, timing, a variance-based
//! confidence score, and a short-term trend for each. Concepts are emitted
//! in first-encounter order so downstream stable sorts break ties by
//! discovery order.

use std::collections::HashMap;

use crate::types::{AttemptRecord, ConceptPerformance, Trend};

/// Minimum attempts before variance-based confidence applies
const MIN_SAMPLE: usize = 3;

/// Confidence assigned below the minimum sample threshold
const LOW_SAMPLE_CONFIDENCE: f64 = 0.3;

/// Accuracy delta between trend windows that counts as movement
const TREND_BAND: f64 = 0.10;

/// Attempts per trend window
const TREND_WINDOW: usize = 5;

/// Aggregate per-concept performance for a set of attempts
///
/// Attempts are expected in ledger (chronological) order; the trend
/// windows rely on it.
pub fn aggregate_concepts(attempts: &[AttemptRecord]) -> Vec<ConceptPerformance> {
    let mut order: Vec<String> = Vec::new();
    let mut grouped: HashMap<String, Vec<&AttemptRecord>> = HashMap::new();

    for attempt in attempts {
        for concept in &attempt.metadata.concepts {
            grouped
                .entry(concept.clone())
                .or_insert_with(|| {
                    order.push(concept.clone());
                    Vec::new()
                })
                .push(attempt);
        }
    }

    order
        .into_iter()
        .map(|concept| {
            let group = &grouped[&concept];
            ConceptPerformance {
                accuracy: accuracy_of(group),
                average_time: mean(group.iter().map(|a| a.time_elapsed)),
                total_attempts: group.len(),
                trend: trend_of(group),
                confidence: confidence_of(group),
                concept,
            }
        })
        .collect()
}

fn accuracy_of(attempts: &[&AttemptRecord]) -> f64 {
    if attempts.is_empty() {
        return 0.0;
    }
    let correct = attempts.iter().filter(|a| a.is_correct).count();
    correct as f64 / attempts.len() as f64
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, count) = values.fold((0.0, 0usize), |(s, c), v| (s + v, c + 1));
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

/// Population standard deviation of per-attempt scores
fn score_std_dev(attempts: &[&AttemptRecord]) -> f64 {
    if attempts.is_empty() {
        return 0.0;
    }
    let avg = mean(attempts.iter().map(|a| a.score));
    let variance = mean(attempts.iter().map(|a| (a.score - avg).powi(2)));
    variance.sqrt()
}

/// Confidence from score variance, with an insufficient-sample override
fn confidence_of(attempts: &[&AttemptRecord]) -> f64 {
    if attempts.len() < MIN_SAMPLE {
        return LOW_SAMPLE_CONFIDENCE;
    }
    let spread = (score_std_dev(attempts) / 100.0).min(1.0);
    (1.0 - spread).max(0.1)
}

/// Trend from the most recent window against the one before it
fn trend_of(attempts: &[&AttemptRecord]) -> Trend {
    if attempts.len() < TREND_WINDOW {
        return Trend::Stable;
    }

    let recent_start = attempts.len() - TREND_WINDOW;
    let recent = &attempts[recent_start..];
    let preceding = &attempts[recent_start.saturating_sub(TREND_WINDOW)..recent_start];
    if preceding.is_empty() {
        return Trend::Stable;
    }

    let delta = accuracy_of(recent) - accuracy_of(preceding);
    if delta > TREND_BAND {
        Trend::Improving
    } else if delta < -TREND_BAND {
        Trend::Declining
    } else {
        Trend::Stable
    }
}
