//! Attempt construction and gap-based session segmentation
//!
//! An attempt either extends the user's most recent session or opens a new
//! one, depending on how long ago that session last saw activity. Both
//! functions are pure; the engine owns fetching prior state and persisting
//! the result.

use std::collections::{BTreeSet, HashSet};

use chrono::Duration;

use crate::types::{
    AnswerSubmission, AttemptId, AttemptMetadata, AttemptOutcome, AttemptRecord, ChallengeId,
    LearningSession, SessionId, SessionKind, UserId,
};

/// Construct an immutable attempt record from the inbound pieces
///
/// Correctness and score come from the grading outcome; elapsed time from
/// the answer's timestamps. Score is clamped to the valid 0-100 range.
pub fn build_attempt(
    user_id: UserId,
    challenge_id: ChallengeId,
    metadata: AttemptMetadata,
    answer: &AnswerSubmission,
    outcome: AttemptOutcome,
) -> AttemptRecord {
    AttemptRecord {
        id: AttemptId::new(),
        user_id,
        challenge_id,
        started_at: answer.started_at,
        completed_at: answer.completed_at,
        is_correct: outcome.is_correct,
        score: outcome.score.clamp(0.0, 100.0),
        hints_used: answer.hints_used,
        time_elapsed: answer.elapsed_seconds(),
        metadata,
    }
}

/// Fold an attempt into the user's session stream
///
/// Returns the session to upsert: the latest session extended in place if
/// the attempt landed within the gap window, otherwise a fresh session.
/// `seen_concepts` is the set of concepts present anywhere in the user's
/// ledger before this attempt; concepts outside it count as newly learned.
pub fn fold_into_session(
    latest: Option<LearningSession>,
    attempt: &AttemptRecord,
    seen_concepts: &HashSet<String>,
    gap: Duration,
) -> LearningSession {
    let mut session = match latest {
        Some(session) if attempt.completed_at - session.last_activity_at <= gap => session,
        _ => LearningSession {
            id: SessionId::new(),
            user_id: attempt.user_id.clone(),
            kind: SessionKind::from_challenge_type(&attempt.metadata.challenge_type),
            started_at: attempt.started_at,
            last_activity_at: attempt.completed_at,
            attempt_ids: Vec::new(),
            total_score: 0.0,
            concepts_reinforced: BTreeSet::new(),
            concepts_learned: BTreeSet::new(),
        },
    };

    session.attempt_ids.push(attempt.id);
    session.total_score += attempt.score;
    session.last_activity_at = attempt.completed_at;
    for concept in &attempt.metadata.concepts {
        if seen_concepts.contains(concept) {
            session.concepts_reinforced.insert(concept.clone());
        } else {
            session.concepts_learned.insert(concept.clone());
        }
    }

    session
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn attempt_at(minute: u32, concepts: &[&str]) -> AttemptRecord {
        let completed = Utc.with_ymd_and_hms(2025, 3, 1, 10, minute, 0).unwrap();
        AttemptRecord {
            id: AttemptId::new(),
            user_id: UserId::new("ada"),
            challenge_id: ChallengeId::new("ch-1"),
            started_at: completed - Duration::seconds(40),
            completed_at: completed,
            is_correct: true,
            score: 80.0,
            hints_used: 0,
            time_elapsed: 40.0,
            metadata: AttemptMetadata {
                concepts: concepts.iter().map(|s| s.to_string()).collect(),
                challenge_type: "balancing-drill".to_string(),
                realm_id: "realm-reactions".to_string(),
                ..Default::default()
            },
        }
    }

    #[test]
    fn test_build_attempt_derives_fields() {
        let answer = AnswerSubmission {
            started_at: Utc.with_ymd_and_hms(2025, 3, 1, 10, 0, 0).unwrap(),
            completed_at: Utc.with_ymd_and_hms(2025, 3, 1, 10, 1, 30).unwrap(),
            hints_used: 2,
        };
        let record = build_attempt(
            UserId::new("ada"),
            ChallengeId::new("ch-9"),
            AttemptMetadata::default(),
            &answer,
            AttemptOutcome {
                is_correct: false,
                score: 120.0,
            },
        );
        assert_eq!(record.time_elapsed, 90.0);
        assert_eq!(record.hints_used, 2);
        assert!(!record.is_correct);
        // Out-of-range scores are clamped, not rejected.
        assert_eq!(record.score, 100.0);
    }

    #[test]
    fn test_first_attempt_opens_session() {
        let attempt = attempt_at(0, &["Balancing Equations"]);
        let session = fold_into_session(None, &attempt, &HashSet::new(), Duration::minutes(30));

        assert_eq!(session.attempt_ids, vec![attempt.id]);
        assert_eq!(session.total_score, 80.0);
        assert_eq!(session.kind, SessionKind::Practice);
        assert!(session
            .concepts_learned
            .contains("Balancing Equations"));
        assert!(session.concepts_reinforced.is_empty());
    }

    #[test]
    fn test_attempt_within_gap_extends_session() {
        let gap = Duration::minutes(30);
        let first = attempt_at(0, &["Balancing Equations"]);
        let session = fold_into_session(None, &first, &HashSet::new(), gap);

        let seen: HashSet<String> = ["Balancing Equations".to_string()].into();
        let second = attempt_at(20, &["Balancing Equations", "Reaction Types"]);
        let extended = fold_into_session(Some(session.clone()), &second, &seen, gap);

        assert_eq!(extended.id, session.id);
        assert_eq!(extended.attempt_ids.len(), 2);
        assert_eq!(extended.total_score, 160.0);
        assert_eq!(extended.last_activity_at, second.completed_at);
        // Previously seen concept is reinforced, the new one is learned.
        assert!(extended.concepts_reinforced.contains("Balancing Equations"));
        assert!(extended.concepts_learned.contains("Reaction Types"));
    }

    #[test]
    fn test_attempt_past_gap_opens_new_session() {
        let gap = Duration::minutes(30);
        let first = attempt_at(0, &[]);
        let session = fold_into_session(None, &first, &HashSet::new(), gap);

        let late = attempt_at(31, &[]);
        let fresh = fold_into_session(Some(session.clone()), &late, &HashSet::new(), gap);

        assert_ne!(fresh.id, session.id);
        assert_eq!(fresh.attempt_ids, vec![late.id]);
    }

    #[test]
    fn test_attempt_exactly_at_gap_still_extends() {
        let gap = Duration::minutes(30);
        let first = attempt_at(0, &[]);
        let session = fold_into_session(None, &first, &HashSet::new(), gap);

        let borderline = attempt_at(30, &[]);
        let extended = fold_into_session(Some(session.clone()), &borderline, &HashSet::new(), gap);
        assert_eq!(extended.id, session.id);
    }

    #[test]
    fn test_boss_challenge_classifies_session() {
        let mut attempt = attempt_at(0, &[]);
        attempt.metadata.challenge_type = "boss-synthesis".to_string();
        let session = fold_into_session(None, &attempt, &HashSet::new(), Duration::minutes(30));
        assert_eq!(session.kind, SessionKind::Boss);
    }
}
