//! Consecutive-day streak calculation.
//!
//! A streak counts calendar days with at least one progress entry, walking
//! backward from a reference day. The chain may start on the reference day
//! itself or, as a one-day grace, on the day before it (so an unbroken streak
//! survives an evaluation run before today's entry has been logged); after
//! the anchor, days must be strictly consecutive.
//!
//! The calculation is a pure function: no side effects, no mutation of the
//! input, same output for the same input every time.

use std::collections::BTreeSet;

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::progress::ProgressRecord;

/// Result of a streak calculation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakSummary {
    /// Consecutive covered days ending at the reference day (or the grace
    /// day before it); 0 when the chain is broken or no entries exist
    pub streak_length: u32,

    /// Latest date present in the input, regardless of chain continuity
    pub most_recent_date: Option<NaiveDate>,
}

impl StreakSummary {
    /// Summary for an empty record set.
    pub fn empty() -> Self {
        Self {
            streak_length: 0,
            most_recent_date: None,
        }
    }
}

/// Compute the current streak over a set of progress records.
///
/// Records are projected to distinct calendar days first, so logging the
/// same day several times counts it once. The record order does not matter.
///
/// # Arguments
/// * `records` - Progress entries for one habit, any order
/// * `reference_date` - The day to anchor the walk at, normally today
pub fn compute_streak(records: &[ProgressRecord], reference_date: NaiveDate) -> StreakSummary {
    // Distinct-day projection: same-day re-logging collapses to one covered day.
    let covered: BTreeSet<NaiveDate> = records.iter().map(|r| r.date).collect();

    let most_recent_date = covered.iter().next_back().copied();

    // The chain anchors on the reference day, or on the day before it when
    // today has not been logged yet (one-day grace).
    let anchor = if covered.contains(&reference_date) {
        Some(reference_date)
    } else {
        reference_date
            .checked_sub_days(Days::new(1))
            .filter(|grace| covered.contains(grace))
    };

    let Some(anchor) = anchor else {
        return StreakSummary {
            streak_length: 0,
            most_recent_date,
        };
    };

    let mut streak_length = 0u32;
    let mut day = Some(anchor);
    while let Some(d) = day {
        if !covered.contains(&d) {
            break;
        }
        streak_length += 1;
        day = d.checked_sub_days(Days::new(1));
    }

    StreakSummary {
        streak_length,
        most_recent_date,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn records_on(dates: &[NaiveDate]) -> Vec<ProgressRecord> {
        dates.iter().map(|&d| ProgressRecord::on(d)).collect()
    }

    #[test]
    fn test_three_consecutive_days() {
        let records = records_on(&[date(2025, 1, 10), date(2025, 1, 9), date(2025, 1, 8)]);
        let summary = compute_streak(&records, date(2025, 1, 10));

        assert_eq!(summary.streak_length, 3);
        assert_eq!(summary.most_recent_date, Some(date(2025, 1, 10)));
    }

    #[test]
    fn test_gap_breaks_the_chain() {
        // Logged the 10th and the 8th, nothing on the 9th.
        let records = records_on(&[date(2025, 1, 10), date(2025, 1, 8)]);
        let summary = compute_streak(&records, date(2025, 1, 10));

        assert_eq!(summary.streak_length, 1);
        assert_eq!(summary.most_recent_date, Some(date(2025, 1, 10)));
    }

    #[test]
    fn test_empty_input() {
        let summary = compute_streak(&[], date(2025, 1, 10));

        assert_eq!(summary.streak_length, 0);
        assert_eq!(summary.most_recent_date, None);
    }

    #[test]
    fn test_grace_day_keeps_streak_alive() {
        // Today not yet logged; yesterday and the day before are.
        let records = records_on(&[date(2025, 1, 9), date(2025, 1, 8)]);
        let summary = compute_streak(&records, date(2025, 1, 10));

        assert_eq!(summary.streak_length, 2);
        assert_eq!(summary.most_recent_date, Some(date(2025, 1, 9)));
    }

    #[test]
    fn test_stale_records_yield_zero() {
        // Everything strictly older than reference - 1 day.
        let records = records_on(&[date(2025, 1, 5), date(2025, 1, 4), date(2025, 1, 3)]);
        let summary = compute_streak(&records, date(2025, 1, 10));

        assert_eq!(summary.streak_length, 0);
        assert_eq!(summary.most_recent_date, Some(date(2025, 1, 5)));
    }

    #[test]
    fn test_same_day_duplicates_count_once() {
        let records = vec![
            ProgressRecord::on(date(2025, 1, 10)).with_reflection("morning"),
            ProgressRecord::on(date(2025, 1, 10)).with_reflection("evening"),
            ProgressRecord::on(date(2025, 1, 9)),
        ];
        let summary = compute_streak(&records, date(2025, 1, 10));

        assert_eq!(summary.streak_length, 2);
    }

    #[test]
    fn test_single_date_outside_window() {
        let records = records_on(&[date(2025, 1, 3)]);
        let summary = compute_streak(&records, date(2025, 1, 10));

        assert_eq!(summary.streak_length, 0);
        assert_eq!(summary.most_recent_date, Some(date(2025, 1, 3)));
    }

    #[test]
    fn test_single_date_on_reference() {
        let records = records_on(&[date(2025, 1, 10)]);
        let summary = compute_streak(&records, date(2025, 1, 10));

        assert_eq!(summary.streak_length, 1);
    }

    #[test]
    fn test_record_order_is_irrelevant() {
        let dates = [date(2025, 1, 8), date(2025, 1, 10), date(2025, 1, 9)];
        let summary = compute_streak(&records_on(&dates), date(2025, 1, 10));

        assert_eq!(summary.streak_length, 3);
    }

    #[test]
    fn test_future_record_does_not_anchor() {
        // A record dated after the reference never starts a chain.
        let records = records_on(&[date(2025, 1, 12)]);
        let summary = compute_streak(&records, date(2025, 1, 10));

        assert_eq!(summary.streak_length, 0);
        assert_eq!(summary.most_recent_date, Some(date(2025, 1, 12)));
    }

    #[test]
    fn test_streak_crosses_month_boundary() {
        let records = records_on(&[date(2025, 2, 1), date(2025, 1, 31), date(2025, 1, 30)]);
        let summary = compute_streak(&records, date(2025, 2, 1));

        assert_eq!(summary.streak_length, 3);
    }

    #[test]
    fn test_input_not_mutated_and_rerunnable() {
        let records = records_on(&[date(2025, 1, 10), date(2025, 1, 9)]);
        let first = compute_streak(&records, date(2025, 1, 10));
        let second = compute_streak(&records, date(2025, 1, 10));

        assert_eq!(first, second);
        assert_eq!(records.len(), 2);
    }
}
