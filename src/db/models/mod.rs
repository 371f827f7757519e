pub mod record;
pub mod user;

pub use record::{DailyRecord, DayEntry, LeaderboardEntry, Stats};
pub use user::UserProfile;
