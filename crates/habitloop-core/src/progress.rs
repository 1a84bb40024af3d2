//! Progress records.
//!
//! One record per logging action: the calendar day it covers, an optional
//! free-text reflection, an optional photo reference, and -- for numeric
//! habits -- the measured value. Records are immutable value snapshots; the
//! engine only ever reads them. Logging the same day twice is allowed and is
//! collapsed to a single covered day by the streak calculator.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One logged progress entry for a habit on one calendar day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressRecord {
    /// Calendar day the entry covers (day resolution; no time component)
    pub date: NaiveDate,

    /// Optional free-text reflection
    pub reflection: Option<String>,

    /// Optional photo reference (opaque URI, never dereferenced here)
    pub image: Option<String>,

    /// Measured value, present only for numeric habits
    pub measurement: Option<f64>,
}

impl ProgressRecord {
    /// A bare entry that just marks the day as covered.
    pub fn on(date: NaiveDate) -> Self {
        Self {
            date,
            reflection: None,
            image: None,
            measurement: None,
        }
    }

    pub fn with_reflection(mut self, reflection: impl Into<String>) -> Self {
        self.reflection = Some(reflection.into());
        self
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    pub fn with_measurement(mut self, measurement: f64) -> Self {
        self.measurement = Some(measurement);
        self
    }
}

/// A progress entry as it arrives from storage, date still in string form.
///
/// Upstream stores keep dates as strings; a record whose date does not parse
/// is dropped during projection rather than failing the whole batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawProgressRecord {
    pub date: String,
    #[serde(default)]
    pub reflection: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub measurement: Option<f64>,
}

impl RawProgressRecord {
    /// Parse the date field (`YYYY-MM-DD`); `None` if it is malformed.
    pub fn into_record(self) -> Option<ProgressRecord> {
        let date = NaiveDate::parse_from_str(&self.date, "%Y-%m-%d").ok()?;
        Some(ProgressRecord {
            date,
            reflection: self.reflection,
            image: self.image,
            measurement: self.measurement,
        })
    }
}

/// Project a raw batch to typed records, silently dropping entries whose
/// date is unparseable.
pub fn project_records(raw: Vec<RawProgressRecord>) -> Vec<ProgressRecord> {
    raw.into_iter().filter_map(RawProgressRecord::into_record).collect()
}
