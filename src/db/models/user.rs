use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Displayable identity for leaderboards. Identity resolution itself happens
/// outside this crate; a profile row only carries presentation data.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: String,
    pub display_name: String,
    pub created_at: DateTime<Utc>,
}
