//! Demo runner: replays a synthetic push-up session against a local
//! database, commits it, and prints the resulting stats and leaderboards.

use std::path::PathBuf;

use anyhow::Result;
use chrono::Utc;
use log::info;
use rand::Rng;

use repcount::{
    CaptureController, Database, Joint, JointSample, LeaderboardKind, PoseFrame, PoseSource,
    SettingsStore, WorkoutService,
};

const DEMO_USER: &str = "demo-user";

/// Pose source that sweeps both elbows through full rep cycles, with a
/// little confidence jitter so the stream looks like real estimator output.
struct SyntheticSession {
    angles: Vec<f64>,
    cursor: usize,
}

impl SyntheticSession {
    fn new(reps: usize) -> Self {
        let mut angles = Vec::new();
        for _ in 0..reps {
            // Descend past the down threshold, then extend past the up
            // threshold; 30 frames per cycle keeps successive reps outside
            // the refractory window at the demo tick rate.
            for step in 0..15 {
                angles.push(170.0 - step as f64 * 9.0);
            }
            for step in 0..15 {
                angles.push(40.0 + step as f64 * 9.0);
            }
            angles.push(170.0);
        }
        Self { angles, cursor: 0 }
    }

    fn arm_frame(angle_deg: f64, confidence: f64) -> PoseFrame {
        let half = (angle_deg / 2.0).to_radians();
        let arms = [
            [Joint::LeftShoulder, Joint::LeftElbow, Joint::LeftWrist],
            [Joint::RightShoulder, Joint::RightElbow, Joint::RightWrist],
        ];

        let mut joints = Vec::new();
        for [shoulder, elbow, wrist] in arms {
            let (ex, ey) = (0.5, 0.5);
            joints.push(JointSample {
                joint: shoulder,
                x: ex + half.cos() * 0.3,
                y: ey + half.sin() * 0.3,
                confidence,
            });
            joints.push(JointSample {
                joint: elbow,
                x: ex,
                y: ey,
                confidence,
            });
            joints.push(JointSample {
                joint: wrist,
                x: ex + half.cos() * 0.3,
                y: ey - half.sin() * 0.3,
                confidence,
            });
        }
        PoseFrame::new(Utc::now(), joints)
    }
}

impl PoseSource for SyntheticSession {
    fn next_frame(&mut self) -> Result<Option<PoseFrame>> {
        let Some(angle) = self.angles.get(self.cursor).copied() else {
            return Ok(None);
        };
        self.cursor += 1;

        let confidence = rand::thread_rng().gen_range(0.75..0.95);
        Ok(Some(Self::arm_frame(angle, confidence)))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let data_dir = std::env::var("REPCOUNT_DATA_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("./data"));
    std::fs::create_dir_all(&data_dir)?;

    let database = Database::new(data_dir.join("repcount.sqlite3"))?;
    let settings = SettingsStore::new(data_dir.join("settings.json"))?;
    let service = WorkoutService::new(database);

    service.upsert_profile(Some(DEMO_USER), "Demo User").await?;

    let reps = 3;
    let controller = CaptureController::new(settings.detection());
    let session_id = controller
        .start_capture(Box::new(SyntheticSession::new(reps)))
        .await?;
    info!("replaying {reps} synthetic reps in session {session_id}");

    // Roughly 30 frames per rep at the configured tick rate, plus margin
    // for the loop to drain the source.
    let tick_ms = settings.detection().tick_interval_ms;
    tokio::time::sleep(tokio::time::Duration::from_millis(
        tick_ms * (reps as u64 * 31 + 30),
    ))
    .await;

    let staged = controller.current_count().await.unwrap_or(0);
    info!("staged count before commit: {staged}");

    let record = controller.commit(&service, Some(DEMO_USER)).await?;
    controller.stop_capture().await?;
    info!("committed; today's record now holds {} reps", record.count);

    let stats = service.get_stats(Some(DEMO_USER)).await?;
    println!("stats: {}", serde_json::to_string_pretty(&stats)?);

    let daily = service
        .get_leaderboard(Some(DEMO_USER), LeaderboardKind::Daily)
        .await?;
    println!("daily leaderboard: {}", serde_json::to_string_pretty(&daily)?);

    let overall = service
        .get_leaderboard(Some(DEMO_USER), LeaderboardKind::Overall)
        .await?;
    println!(
        "overall leaderboard: {}",
        serde_json::to_string_pretty(&overall)?
    );

    Ok(())
}
