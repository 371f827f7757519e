//! Durable per-user-per-day totals and the read-side views derived from them.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Exactly one of these exists per (user, calendar day). Created on the
/// first commit of a day, merged additively by later commits, never
/// overwritten or deleted in normal operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyRecord {
    pub user_id: String,
    pub date: NaiveDate,
    pub count: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One day of the weekly series. Always seven of these, Sun..Sat, with
/// zero-filled gaps.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DayEntry {
    pub day: &'static str,
    pub date: NaiveDate,
    pub count: u32,
}

/// Personal stats view: today's total, the current week, and all-time.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub today: u32,
    pub week: Vec<DayEntry>,
    pub total: u64,
}

/// Ranked leaderboard row. `days_active` is only populated for the overall
/// view (distinct days with a non-zero count).
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    pub rank: u32,
    pub user_id: String,
    pub display_name: String,
    pub count: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub days_active: Option<u32>,
}
