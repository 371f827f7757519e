//! Protocol-agnostic operation layer.
//!
//! The serving layer (HTTP or otherwise) lives outside this crate; it
//! resolves the acting user and hands the id in as `Option<&str>`. Every
//! operation short-circuits with `Unauthorized` before any core logic when
//! no identity was resolved, including reads.

mod error;

pub use error::ServiceError;

use chrono::{Local, NaiveDate};
use log::warn;
use tokio::time::Duration;

use crate::db::models::{DailyRecord, LeaderboardEntry, Stats, UserProfile};
use crate::db::Database;
use crate::leaderboard::{rank_daily, rank_overall, LeaderboardKind};
use crate::stats::{fill_week, week_start};

const LEADERBOARD_LIMIT: u32 = 10;
const COMMIT_ATTEMPTS: u32 = 3;
const COMMIT_RETRY_DELAY_MS: u64 = 50;

#[derive(Clone)]
pub struct WorkoutService {
    db: Database,
}

impl WorkoutService {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Commit a session's accumulated reps into today's record (server-local
    /// calendar day). Storage failures are treated as transient and retried
    /// a bounded number of times before surfacing.
    pub async fn submit_repetitions(
        &self,
        user: Option<&str>,
        count: u32,
    ) -> Result<DailyRecord, ServiceError> {
        let user = require_user(user)?;
        if count < 1 {
            return Err(ServiceError::InvalidInput(
                "count must be at least 1".into(),
            ));
        }

        let today = Local::now().date_naive();
        self.commit_with_retry(user, today, count).await
    }

    async fn commit_with_retry(
        &self,
        user: &str,
        date: NaiveDate,
        delta: u32,
    ) -> Result<DailyRecord, ServiceError> {
        let mut last_err = None;
        for attempt in 1..=COMMIT_ATTEMPTS {
            match self.db.commit_repetitions(user, date, delta).await {
                Ok(record) => return Ok(record),
                Err(err) => {
                    warn!("commit attempt {attempt}/{COMMIT_ATTEMPTS} failed for {user}: {err:#}");
                    last_err = Some(err);
                    if attempt < COMMIT_ATTEMPTS {
                        tokio::time::sleep(Duration::from_millis(COMMIT_RETRY_DELAY_MS)).await;
                    }
                }
            }
        }

        let detail = last_err
            .map(|err| format!("{err:#}"))
            .unwrap_or_else(|| "no attempts were made".into());
        Err(ServiceError::Unavailable(format!(
            "commit failed after {COMMIT_ATTEMPTS} attempts: {detail}"
        )))
    }

    /// Records for the acting user, newest first, optionally filtered to a
    /// single day.
    pub async fn list_records(
        &self,
        user: Option<&str>,
        date: Option<NaiveDate>,
    ) -> Result<Vec<DailyRecord>, ServiceError> {
        let user = require_user(user)?;
        self.db
            .list_records(user, date)
            .await
            .map_err(unavailable)
    }

    /// Today's count, the zero-filled current week (Sun..Sat), and the
    /// all-time total. A user with no records gets all zeros.
    pub async fn get_stats(&self, user: Option<&str>) -> Result<Stats, ServiceError> {
        let user = require_user(user)?;
        let today = Local::now().date_naive();
        let start = week_start(today);
        let end = start + chrono::Duration::days(6);

        let today_count = self.db.count_for_day(user, today).await.map_err(unavailable)?;
        let rows = self
            .db
            .counts_between(user, start, end)
            .await
            .map_err(unavailable)?;
        let total = self.db.total_count(user).await.map_err(unavailable)?;

        Ok(Stats {
            today: today_count,
            week: fill_week(start, &rows),
            total,
        })
    }

    /// Top-10 board, ranked. Reads require a resolved identity too.
    pub async fn get_leaderboard(
        &self,
        user: Option<&str>,
        kind: LeaderboardKind,
    ) -> Result<Vec<LeaderboardEntry>, ServiceError> {
        require_user(user)?;
        match kind {
            LeaderboardKind::Daily => {
                let today = Local::now().date_naive();
                let standings = self
                    .db
                    .daily_standings(today, LEADERBOARD_LIMIT)
                    .await
                    .map_err(unavailable)?;
                Ok(rank_daily(standings))
            }
            LeaderboardKind::Overall => {
                let standings = self
                    .db
                    .overall_standings(LEADERBOARD_LIMIT)
                    .await
                    .map_err(unavailable)?;
                Ok(rank_overall(standings))
            }
        }
    }

    /// Create or rename the acting user's profile.
    pub async fn upsert_profile(
        &self,
        user: Option<&str>,
        display_name: &str,
    ) -> Result<UserProfile, ServiceError> {
        let user = require_user(user)?;
        let display_name = display_name.trim();
        if display_name.is_empty() {
            return Err(ServiceError::InvalidInput(
                "display name must not be empty".into(),
            ));
        }

        self.db
            .upsert_user(user, display_name)
            .await
            .map_err(unavailable)
    }
}

fn require_user(user: Option<&str>) -> Result<&str, ServiceError> {
    user.ok_or(ServiceError::Unauthorized)
}

fn unavailable(err: anyhow::Error) -> ServiceError {
    ServiceError::Unavailable(format!("{err:#}"))
}
