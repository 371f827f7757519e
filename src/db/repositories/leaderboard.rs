use anyhow::Result;
use chrono::NaiveDate;
use rusqlite::params;

use crate::db::{
    connection::Database,
    helpers::{date_to_sql, to_u32, to_u64},
};

/// Unranked row for the daily board: today's count for one user.
#[derive(Debug, Clone)]
pub struct DailyStanding {
    pub user_id: String,
    pub display_name: Option<String>,
    pub count: u64,
}

/// Unranked row for the overall board: lifetime total plus distinct days
/// with a non-zero count.
#[derive(Debug, Clone)]
pub struct OverallStanding {
    pub user_id: String,
    pub display_name: Option<String>,
    pub total: u64,
    pub days_active: u32,
}

impl Database {
    /// Top counts for one calendar day, highest first. Ties break on
    /// user_id ascending so the ordering is stable across runs.
    pub async fn daily_standings(
        &self,
        date: NaiveDate,
        limit: u32,
    ) -> Result<Vec<DailyStanding>> {
        self.execute(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT r.user_id, u.display_name, r.count
                 FROM daily_records r
                 LEFT JOIN users u ON u.id = r.user_id
                 WHERE r.date = ?1
                 ORDER BY r.count DESC, r.user_id ASC
                 LIMIT ?2",
            )?;

            let mut rows = stmt.query(params![date_to_sql(date), limit])?;
            let mut standings = Vec::new();
            while let Some(row) = rows.next()? {
                let count: i64 = row.get(2)?;
                standings.push(DailyStanding {
                    user_id: row.get(0)?,
                    display_name: row.get(1)?,
                    count: to_u64(count, "count")?,
                });
            }

            Ok(standings)
        })
        .await
    }

    /// Lifetime totals across all users, highest first, same tie-break as
    /// the daily board.
    pub async fn overall_standings(&self, limit: u32) -> Result<Vec<OverallStanding>> {
        self.execute(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT r.user_id, u.display_name,
                        SUM(r.count) AS total,
                        SUM(CASE WHEN r.count > 0 THEN 1 ELSE 0 END) AS days_active
                 FROM daily_records r
                 LEFT JOIN users u ON u.id = r.user_id
                 GROUP BY r.user_id
                 ORDER BY total DESC, r.user_id ASC
                 LIMIT ?1",
            )?;

            let mut rows = stmt.query(params![limit])?;
            let mut standings = Vec::new();
            while let Some(row) = rows.next()? {
                let total: i64 = row.get(2)?;
                let days_active: i64 = row.get(3)?;
                standings.push(OverallStanding {
                    user_id: row.get(0)?,
                    display_name: row.get(1)?,
                    total: to_u64(total, "total")?,
                    days_active: to_u32(days_active, "days_active")?,
                });
            }

            Ok(standings)
        })
        .await
    }
}
