pub mod config;
pub mod habit;
pub mod log;
pub mod progress;
pub mod wallet;

use chrono::NaiveDate;
use habitloop_core::ValidationError;

/// Parse a `--date` argument as a calendar day.
pub(crate) fn parse_day(raw: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| ValidationError::InvalidValue {
        field: "date".to_string(),
        message: format!("invalid date '{raw}', expected YYYY-MM-DD"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_day_accepts_iso_dates() {
        assert_eq!(
            parse_day("2025-03-14").unwrap(),
            NaiveDate::from_ymd_opt(2025, 3, 14).unwrap()
        );
    }

    #[test]
    fn parse_day_rejects_garbage() {
        let err = parse_day("yesterday").unwrap_err();
        assert!(matches!(err, ValidationError::InvalidValue { ref field, .. } if field == "date"));
    }
}
