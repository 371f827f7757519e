//! Pose-estimation input types.
//!
//! The pose model itself lives outside this crate; whatever produces the
//! keypoints (MoveNet in the reference setup) hands us one [`PoseFrame`]
//! per capture tick through the [`PoseSource`] trait.

pub mod angle;

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// MoveNet keypoint names. Detection only uses the six arm joints, but a
/// source may deliver the full set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Joint {
    Nose,
    LeftEye,
    RightEye,
    LeftEar,
    RightEar,
    LeftShoulder,
    RightShoulder,
    LeftElbow,
    RightElbow,
    LeftWrist,
    RightWrist,
    LeftHip,
    RightHip,
    LeftKnee,
    RightKnee,
    LeftAnkle,
    RightAnkle,
}

/// One estimated keypoint: position plus the estimator's confidence in [0, 1].
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JointSample {
    pub joint: Joint,
    pub x: f64,
    pub y: f64,
    pub confidence: f64,
}

/// An ordered set of keypoints for one instant. At most one frame is in
/// flight at a time; the capture loop pulls the next frame only after the
/// previous one has been fully processed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoseFrame {
    pub timestamp: DateTime<Utc>,
    pub joints: Vec<JointSample>,
}

impl PoseFrame {
    pub fn new(timestamp: DateTime<Utc>, joints: Vec<JointSample>) -> Self {
        Self { timestamp, joints }
    }

    pub fn joint(&self, joint: Joint) -> Option<&JointSample> {
        self.joints.iter().find(|sample| sample.joint == joint)
    }

    /// Returns the sample only if it is present and meets the confidence bar.
    pub fn reliable_joint(&self, joint: Joint, min_confidence: f64) -> Option<&JointSample> {
        self.joint(joint)
            .filter(|sample| sample.confidence >= min_confidence)
    }
}

/// Supplier of pose frames, one per capture tick.
///
/// `Ok(None)` means no frame is available this tick (model still warming up,
/// camera stalled, source exhausted); the loop simply tries again on the
/// next tick.
pub trait PoseSource: Send {
    fn next_frame(&mut self) -> Result<Option<PoseFrame>>;
}
