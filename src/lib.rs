pub mod db;
pub mod detector;
pub mod leaderboard;
pub mod pose;
pub mod service;
pub mod settings;
pub mod stats;

pub use db::models::{DailyRecord, DayEntry, LeaderboardEntry, Stats, UserProfile};
pub use db::Database;
pub use detector::{CaptureController, RepDetector, RepEvent, SessionCounter};
pub use leaderboard::LeaderboardKind;
pub use pose::{Joint, JointSample, PoseFrame, PoseSource};
pub use service::{ServiceError, WorkoutService};
pub use settings::{DetectionSettings, SettingsStore};
