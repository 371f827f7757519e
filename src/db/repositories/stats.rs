use anyhow::Result;
use chrono::NaiveDate;
use rusqlite::{params, OptionalExtension};

use crate::db::{
    connection::Database,
    helpers::{date_to_sql, parse_date, to_u32, to_u64},
};

impl Database {
    /// Count for a single calendar day; 0 when no record exists.
    pub async fn count_for_day(&self, user_id: &str, date: NaiveDate) -> Result<u32> {
        let user_id = user_id.to_string();
        self.execute(move |conn| {
            let count: Option<i64> = conn
                .query_row(
                    "SELECT count FROM daily_records WHERE user_id = ?1 AND date = ?2",
                    params![user_id, date_to_sql(date)],
                    |row| row.get(0),
                )
                .optional()?;

            match count {
                Some(value) => to_u32(value, "count"),
                None => Ok(0),
            }
        })
        .await
    }

    /// (date, count) pairs within [start, end] inclusive, ascending by date.
    pub async fn counts_between(
        &self,
        user_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<(NaiveDate, u32)>> {
        let user_id = user_id.to_string();
        self.execute(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT date, count FROM daily_records
                 WHERE user_id = ?1 AND date >= ?2 AND date <= ?3
                 ORDER BY date ASC",
            )?;

            let mut rows = stmt.query(params![user_id, date_to_sql(start), date_to_sql(end)])?;
            let mut counts = Vec::new();
            while let Some(row) = rows.next()? {
                let date: String = row.get(0)?;
                let count: i64 = row.get(1)?;
                counts.push((parse_date(&date, "date")?, to_u32(count, "count")?));
            }

            Ok(counts)
        })
        .await
    }

    /// All-time total across every record for the user.
    pub async fn total_count(&self, user_id: &str) -> Result<u64> {
        let user_id = user_id.to_string();
        self.execute(move |conn| {
            let total: i64 = conn.query_row(
                "SELECT COALESCE(SUM(count), 0) FROM daily_records WHERE user_id = ?1",
                params![user_id],
                |row| row.get(0),
            )?;

            to_u64(total, "total")
        })
        .await
    }
}
