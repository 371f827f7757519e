//! Rank assignment for leaderboard views.
//!
//! The store returns standings already ordered by metric descending with
//! user_id ascending as the tie-break (the ordering contract lives in the
//! repository queries); this module turns them into 1-based, contiguous
//! ranked entries. Users without a profile row fall back to their id as the
//! display name.

use serde::{Deserialize, Serialize};

use crate::db::models::LeaderboardEntry;
use crate::db::repositories::{DailyStanding, OverallStanding};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LeaderboardKind {
    Daily,
    Overall,
}

pub fn rank_daily(standings: Vec<DailyStanding>) -> Vec<LeaderboardEntry> {
    standings
        .into_iter()
        .zip(1u32..)
        .map(|(standing, rank)| LeaderboardEntry {
            rank,
            display_name: standing
                .display_name
                .unwrap_or_else(|| standing.user_id.clone()),
            user_id: standing.user_id,
            count: standing.count,
            days_active: None,
        })
        .collect()
}

pub fn rank_overall(standings: Vec<OverallStanding>) -> Vec<LeaderboardEntry> {
    standings
        .into_iter()
        .zip(1u32..)
        .map(|(standing, rank)| LeaderboardEntry {
            rank,
            display_name: standing
                .display_name
                .unwrap_or_else(|| standing.user_id.clone()),
            user_id: standing.user_id,
            count: standing.total,
            days_active: Some(standing.days_active),
        })
        .collect()
}
