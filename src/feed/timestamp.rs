//! Timestamp normalization.
//!
//! Feeds report times as an absolute instant which we break down into calendar
//! components (in UTC, the way the feed library reports them). Those components
//! are then read back as *local* wall-clock time. The result carries the same
//! year/month/day/hour/minute/second as the breakdown, with no offset attached.
//! Downstream consumers rely on that shape, so the UTC breakdown is never shifted
//! into the local zone.
use chrono::{
    DateTime, Datelike, Local, LocalResult, NaiveDate, NaiveDateTime, TimeZone, Timelike, Utc,
};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TimestampError {
    #[error("invalid calendar date {year:04}-{month:02}-{day:02}")]
    InvalidDate { year: i32, month: u32, day: u32 },

    #[error("invalid time of day {hour:02}:{minute:02}:{second:02}")]
    InvalidTime { hour: u32, minute: u32, second: u32 },
}

/// Calendar components of a source timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeBreakdown {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
    pub second: u32,
}

impl From<DateTime<Utc>> for TimeBreakdown {
    fn from(dt: DateTime<Utc>) -> Self {
        Self {
            year: dt.year(),
            month: dt.month(),
            day: dt.day(),
            hour: dt.hour(),
            minute: dt.minute(),
            second: dt.second(),
        }
    }
}

impl TimeBreakdown {
    fn to_naive(self) -> Result<NaiveDateTime, TimestampError> {
        let date = NaiveDate::from_ymd_opt(self.year, self.month, self.day).ok_or(
            TimestampError::InvalidDate {
                year: self.year,
                month: self.month,
                day: self.day,
            },
        )?;
        date.and_hms_opt(self.hour, self.minute, self.second)
            .ok_or(TimestampError::InvalidTime {
                hour: self.hour,
                minute: self.minute,
                second: self.second,
            })
    }
}

/// Interprets `breakdown` as local time and returns the resulting naive timestamp.
///
/// Wall-clock times that fall into a DST gap have no local instant; they are
/// kept as given rather than being pushed across the gap.
pub fn to_local_naive(breakdown: TimeBreakdown) -> Result<NaiveDateTime, TimestampError> {
    let naive = breakdown.to_naive()?;
    let normalized = match Local.from_local_datetime(&naive) {
        LocalResult::Single(dt) => dt.naive_local(),
        // Repeated hour: both candidates share the same wall-clock reading.
        LocalResult::Ambiguous(earliest, _) => earliest.naive_local(),
        LocalResult::None => naive,
    };
    Ok(normalized)
}

/// Shorthand for `to_local_naive(TimeBreakdown::from(dt))`.
pub fn normalize(dt: DateTime<Utc>) -> Result<NaiveDateTime, TimestampError> {
    to_local_naive(TimeBreakdown::from(dt))
}
