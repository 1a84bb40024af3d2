//! Display aggregations over progress records.
//!
//! Feeds the progress views: a date-ordered measurement series for numeric
//! habits (the line chart) and a logged-day summary (gallery and totals).
//! Like the streak calculator, everything here is a pure read over the
//! record collection.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::progress::ProgressRecord;

/// One point of a numeric habit's measurement series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MeasurementPoint {
    pub date: NaiveDate,
    pub value: f64,
}

/// Measurement series for charting, sorted by date ascending.
///
/// Only records carrying a measurement contribute. When a day was logged
/// more than once with a value, the last one in input order wins.
pub fn measurement_series(records: &[ProgressRecord]) -> Vec<MeasurementPoint> {
    let mut by_day: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    for record in records {
        if let Some(value) = record.measurement {
            by_day.insert(record.date, value);
        }
    }

    by_day
        .into_iter()
        .map(|(date, value)| MeasurementPoint { date, value })
        .collect()
}

/// Totals over a habit's logged history.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogSummary {
    /// Distinct calendar days with at least one entry
    pub days_logged: u32,

    /// Total entries, same-day re-logging included
    pub total_entries: u32,

    /// Entries carrying a photo reference
    pub entries_with_images: u32,

    /// Earliest logged day
    pub first_date: Option<NaiveDate>,

    /// Latest logged day
    pub last_date: Option<NaiveDate>,
}

/// Summarize a habit's record collection.
pub fn summarize(records: &[ProgressRecord]) -> LogSummary {
    let mut days: Vec<NaiveDate> = records.iter().map(|r| r.date).collect();
    days.sort_unstable();
    days.dedup();

    LogSummary {
        days_logged: days.len() as u32,
        total_entries: records.len() as u32,
        entries_with_images: records.iter().filter(|r| r.image.is_some()).count() as u32,
        first_date: days.first().copied(),
        last_date: days.last().copied(),
    }
}
