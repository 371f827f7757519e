mod leaderboard;
mod records;
mod stats;
mod users;

pub use leaderboard::{DailyStanding, OverallStanding};
