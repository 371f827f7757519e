use anyhow::Result;
use chrono::Utc;
use rusqlite::params;

use crate::db::{connection::Database, helpers::parse_datetime, models::UserProfile};

impl Database {
    /// Create or rename a profile row. The id comes from the external
    /// identity collaborator; this table only carries presentation data.
    pub async fn upsert_user(&self, user_id: &str, display_name: &str) -> Result<UserProfile> {
        let user_id = user_id.to_string();
        let display_name = display_name.to_string();
        self.execute(move |conn| {
            let now = Utc::now().to_rfc3339();
            let mut stmt = conn.prepare(
                "INSERT INTO users (id, display_name, created_at)
                 VALUES (?1, ?2, ?3)
                 ON CONFLICT(id) DO UPDATE SET display_name = excluded.display_name
                 RETURNING id, display_name, created_at",
            )?;

            let profile = stmt.query_row(params![user_id, display_name, now], |row| {
                let created_at: String = row.get(2)?;
                Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?, created_at))
            })?;

            Ok(UserProfile {
                id: profile.0,
                display_name: profile.1,
                created_at: parse_datetime(&profile.2, "created_at")?,
            })
        })
        .await
    }
}
