//! Consecutive-day streak reasoning
//!
//! Streaks are computed over the distinct calendar dates (UTC) on which
//! sessions started. `today` is passed in explicitly so the walk is
//! deterministic under test.

use chrono::{Duration, NaiveDate};

use crate::types::{LearningSession, StreakData, StreakKind};

/// Derive streak data from a user's sessions
pub fn compute_streaks(sessions: &[LearningSession], today: NaiveDate) -> StreakData {
    let mut dates: Vec<NaiveDate> = sessions
        .iter()
        .map(|s| s.started_at.date_naive())
        .collect();
    dates.sort();
    dates.dedup();

    StreakData {
        current_streak: current_streak(&dates, today),
        longest_streak: longest_streak(&dates),
        last_activity: dates.last().copied(),
        streak_type: StreakKind::DailyActivity,
    }
}

/// Walk backward from the most recent activity date
///
/// The streak is alive only if that date is today or yesterday, and each
/// earlier counted date is exactly one day before the previous one.
fn current_streak(dates: &[NaiveDate], today: NaiveDate) -> u32 {
    let last = match dates.last() {
        Some(date) => *date,
        None => return 0,
    };
    if today - last > Duration::days(1) {
        return 0;
    }

    let mut streak = 1u32;
    let mut expected = last - Duration::days(1);
    for date in dates.iter().rev().skip(1) {
        if *date == expected {
            streak += 1;
            expected = expected - Duration::days(1);
        } else {
            break;
        }
    }
    streak
}

/// Longest run of exactly-consecutive calendar days ever recorded
fn longest_streak(dates: &[NaiveDate]) -> u32 {
    let mut longest = 0u32;
    let mut run = 0u32;
    let mut previous: Option<NaiveDate> = None;

    for date in dates {
        run = match previous {
            Some(prev) if *date - prev == Duration::days(1) => run + 1,
            _ => 1,
        };
        longest = longest.max(run);
        previous = Some(*date);
    }
    longest
}
