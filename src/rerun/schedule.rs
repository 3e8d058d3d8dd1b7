use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{BatchError, course_key::CourseKey, platform::CourseSchedule};

/// Format of every date in rerun files and schedule requests, read as UTC.
pub const SCHEDULE_DATE_FORMAT: &str = "%H:%M %d/%m/%Y";

/// Parses `HH:MM DD/MM/YYYY` as a UTC instant.
///
/// ```
/// use bulk_enroll_rs::rerun::schedule::parse_schedule_date;
///
/// let start = parse_schedule_date("15:00 25/12/2022").unwrap();
/// assert_eq!(start.to_rfc3339(), "2022-12-25T15:00:00+00:00");
///
/// assert!(parse_schedule_date("15:00 25-12-2022").is_none());
/// ```
pub fn parse_schedule_date(raw: &str) -> Option<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(raw.trim(), SCHEDULE_DATE_FORMAT)
        .ok()
        .map(|date| date.and_utc())
}

/// Both dates parse and the end comes after the start.
pub fn parse_date_range(start: &str, end: &str) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
    let start = parse_schedule_date(start)?;
    let end = parse_schedule_date(end)?;
    (end > start).then_some((start, end))
}

/// New start and end dates for an existing course.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseScheduleRequest {
    pub course: String,
    /// Optional, left unchanged when blank
    #[serde(default)]
    pub start_date: String,
    pub end_date: String,
}

impl CourseScheduleRequest {
    /// Parses the dates, collecting every problem. The course itself is
    /// checked against the catalog by the caller.
    pub fn schedule(&self) -> Result<CourseSchedule, BatchError> {
        let mut errors = Vec::new();

        let start = if self.start_date.trim().is_empty() {
            None
        } else {
            let parsed = parse_schedule_date(&self.start_date);
            if parsed.is_none() {
                errors.push(format!(
                    "start_date: Wrong format start_date: {}, must be 'HH:MM DD/MM/YYYY'",
                    self.start_date
                ));
            }
            parsed
        };

        let end = if self.end_date.trim().is_empty() {
            errors.push("end_date: This field may not be blank.".to_string());
            None
        } else {
            let parsed = parse_schedule_date(&self.end_date);
            if parsed.is_none() {
                errors.push(format!(
                    "end_date: Wrong format end_date: {}, must be 'HH:MM DD/MM/YYYY'",
                    self.end_date
                ));
            }
            parsed
        };

        if matches!((start, end), (Some(start), Some(end)) if end <= start) {
            errors.push("end_date must be later than the start_date.".to_string());
        }

        match end {
            Some(end) if errors.is_empty() => Ok(CourseSchedule { start, end }),
            _ => Err(BatchError::Validation(errors)),
        }
    }

    pub fn course_key(&self) -> Option<CourseKey> {
        self.course.trim().parse().ok()
    }
}
