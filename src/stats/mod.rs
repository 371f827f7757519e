//! Week-series synthesis over stored daily records.
//!
//! Storage only holds days that were actually trained; the weekly view must
//! always show seven entries, Sunday through Saturday, zero-filled for days
//! with no record. "Today" and the week boundary use the server-local
//! calendar day throughout.

use chrono::{Datelike, Duration, NaiveDate};

use crate::db::models::DayEntry;

pub const DAY_LABELS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// The most recent Sunday on or before `today`.
pub fn week_start(today: NaiveDate) -> NaiveDate {
    today - Duration::days(today.weekday().num_days_from_sunday() as i64)
}

/// Expand sparse (date, count) rows into the full seven-day series starting
/// at `start` (a Sunday). Days without a row get count 0; rows outside the
/// window are ignored.
pub fn fill_week(start: NaiveDate, rows: &[(NaiveDate, u32)]) -> Vec<DayEntry> {
    DAY_LABELS
        .iter()
        .copied()
        .enumerate()
        .map(|(offset, day)| {
            let date = start + Duration::days(offset as i64);
            let count = rows
                .iter()
                .find(|(row_date, _)| *row_date == date)
                .map(|(_, count)| *count)
                .unwrap_or(0);
            DayEntry { day, date, count }
        })
        .collect()
}
