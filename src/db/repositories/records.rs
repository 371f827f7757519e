use anyhow::Result;
use chrono::{NaiveDate, Utc};
use rusqlite::{params, Row};

use crate::db::{
    connection::Database,
    helpers::{date_to_sql, parse_date, parse_datetime, to_i64, to_u32},
    models::DailyRecord,
};

fn row_to_record(row: &Row) -> Result<DailyRecord> {
    let date: String = row.get("date")?;
    let count: i64 = row.get("count")?;
    let created_at: String = row.get("created_at")?;
    let updated_at: String = row.get("updated_at")?;

    Ok(DailyRecord {
        user_id: row.get("user_id")?,
        date: parse_date(&date, "date")?,
        count: to_u32(count, "count")?,
        created_at: parse_datetime(&created_at, "created_at")?,
        updated_at: parse_datetime(&updated_at, "updated_at")?,
    })
}

impl Database {
    /// Merge `delta` reps into the (user, date) record. A single upsert
    /// statement does the increment inside SQLite, so concurrent commits
    /// from different sessions can never lose an update; the stored count
    /// is independent of commit order or batching. Callers validate
    /// `delta >= 1` before reaching storage.
    pub async fn commit_repetitions(
        &self,
        user_id: &str,
        date: NaiveDate,
        delta: u32,
    ) -> Result<DailyRecord> {
        let user_id = user_id.to_string();
        self.execute(move |conn| {
            let now = Utc::now().to_rfc3339();
            let mut stmt = conn.prepare(
                "INSERT INTO daily_records (user_id, date, count, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?4)
                 ON CONFLICT(user_id, date) DO UPDATE SET
                     count = count + excluded.count,
                     updated_at = excluded.updated_at
                 RETURNING user_id, date, count, created_at, updated_at",
            )?;

            let record = stmt.query_row(
                params![user_id, date_to_sql(date), to_i64(delta), now],
                |row| Ok(row_to_record(row)),
            )??;

            Ok(record)
        })
        .await
    }

    /// Records for one user, newest day first, optionally narrowed to a
    /// single calendar day.
    pub async fn list_records(
        &self,
        user_id: &str,
        date: Option<NaiveDate>,
    ) -> Result<Vec<DailyRecord>> {
        let user_id = user_id.to_string();
        self.execute(move |conn| {
            let mut records = Vec::new();
            match date {
                Some(date) => {
                    let mut stmt = conn.prepare(
                        "SELECT user_id, date, count, created_at, updated_at
                         FROM daily_records
                         WHERE user_id = ?1 AND date = ?2
                         ORDER BY date DESC",
                    )?;
                    let mut rows = stmt.query(params![user_id, date_to_sql(date)])?;
                    while let Some(row) = rows.next()? {
                        records.push(row_to_record(row)?);
                    }
                }
                None => {
                    let mut stmt = conn.prepare(
                        "SELECT user_id, date, count, created_at, updated_at
                         FROM daily_records
                         WHERE user_id = ?1
                         ORDER BY date DESC",
                    )?;
                    let mut rows = stmt.query(params![user_id])?;
                    while let Some(row) = rows.next()? {
                        records.push(row_to_record(row)?);
                    }
                }
            }

            Ok(records)
        })
        .await
    }
}
