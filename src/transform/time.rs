//! Time dimension

use crate::error::{Error, Result};
use crate::types::TimeRow;
use chrono::{DateTime, Datelike, Timelike, Utc};
use std::collections::BTreeSet;

/// Convert epoch milliseconds to a UTC timestamp
pub fn timestamp_from_millis(ts: i64) -> Result<DateTime<Utc>> {
    DateTime::from_timestamp_millis(ts).ok_or(Error::InvalidTimestamp { ts })
}

/// Calendar parts of one start time
pub fn derive_time_row(start_time: DateTime<Utc>) -> TimeRow {
    TimeRow {
        start_time,
        hour: start_time.hour() as i32,
        day: start_time.day() as i32,
        week: start_time.iso_week().week() as i32,
        month: start_time.month() as i32,
        year: start_time.year(),
        weekday: start_time.weekday().num_days_from_sunday() as i32,
    }
}

/// One row per distinct start time, ordered by start time
pub fn derive_time_table(start_times: impl IntoIterator<Item = DateTime<Utc>>) -> Vec<TimeRow> {
    start_times
        .into_iter()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(derive_time_row)
        .collect()
}
