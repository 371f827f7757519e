use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf, sync::RwLock};

/// Thresholds and timing for the repetition detector. Defaults match the
/// tuned values for push-ups: bend below 90° to register the down position,
/// extend past 160° to complete the rep.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectionSettings {
    /// Minimum keypoint confidence; frames with any required arm joint below
    /// this are dropped without touching the state machine.
    pub min_confidence: f64,
    /// Average elbow angle below which the motion counts as "down".
    pub down_angle: f64,
    /// Average elbow angle above which the motion counts as "up" again.
    pub up_angle: f64,
    /// Minimum time between counted reps, to absorb angle jitter near the
    /// top of the motion.
    pub refractory_ms: i64,
    /// Capture tick period; ~33ms tracks a 30 Hz camera.
    pub tick_interval_ms: u64,
}

impl Default for DetectionSettings {
    fn default() -> Self {
        Self {
            min_confidence: 0.3,
            down_angle: 90.0,
            up_angle: 160.0,
            refractory_ms: 500,
            tick_interval_ms: 33,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct UserSettings {
    detection: DetectionSettings,
}

pub struct SettingsStore {
    path: PathBuf,
    data: RwLock<UserSettings>,
}

impl SettingsStore {
    pub fn new(path: PathBuf) -> Result<Self> {
        let data = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read settings from {}", path.display()))?;
            serde_json::from_str(&contents).unwrap_or_default()
        } else {
            UserSettings::default()
        };

        Ok(Self {
            path,
            data: RwLock::new(data),
        })
    }

    pub fn detection(&self) -> DetectionSettings {
        self.data.read().unwrap().detection.clone()
    }

    pub fn update_detection(&self, settings: DetectionSettings) -> Result<()> {
        let mut guard = self.data.write().unwrap();
        guard.detection = settings;
        self.persist(&guard)
    }

    fn persist(&self, data: &UserSettings) -> Result<()> {
        let serialized = serde_json::to_string_pretty(data)?;
        fs::write(&self.path, serialized)
            .with_context(|| format!("Failed to write settings to {}", self.path.display()))
    }
}
