use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::pose::{angle::joint_angle, Joint, PoseFrame};
use crate::settings::DetectionSettings;

/// Where in the motion the detector believes the body currently is.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum RepPhase {
    Up,
    Down,
}

impl Default for RepPhase {
    fn default() -> Self {
        RepPhase::Up
    }
}

/// One completed down-to-up cycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepEvent {
    pub session_id: String,
    pub timestamp: DateTime<Utc>,
}

/// Hysteresis state machine over the average elbow angle.
///
/// Two asymmetric thresholds keep a single noisy crossing from chattering:
/// the angle must drop below `down_angle` and then climb past `up_angle`
/// before a rep counts, and the refractory window rejects a second count
/// inside `refractory_ms` even if the angle oscillates past the top
/// threshold. Everything between the two thresholds is a dead zone.
///
/// State is O(1): the current phase and the last emitted event time.
#[derive(Debug, Clone)]
pub struct RepDetector {
    session_id: String,
    settings: DetectionSettings,
    phase: RepPhase,
    last_event_at: Option<DateTime<Utc>>,
}

const ARM_JOINTS: [[Joint; 3]; 2] = [
    [Joint::LeftShoulder, Joint::LeftElbow, Joint::LeftWrist],
    [Joint::RightShoulder, Joint::RightElbow, Joint::RightWrist],
];

impl RepDetector {
    pub fn new(session_id: String, settings: DetectionSettings) -> Self {
        Self {
            session_id,
            settings,
            phase: RepPhase::Up,
            last_event_at: None,
        }
    }

    pub fn phase(&self) -> RepPhase {
        self.phase
    }

    /// Feed one frame. Returns an event only when a full down-to-up cycle
    /// completes outside the refractory window. Frames with any required
    /// arm joint missing or under-confidence are dropped without touching
    /// the state.
    pub fn observe(&mut self, frame: &PoseFrame) -> Option<RepEvent> {
        let avg_angle = self.average_elbow_angle(frame)?;

        match self.phase {
            RepPhase::Up if avg_angle < self.settings.down_angle => {
                self.phase = RepPhase::Down;
                None
            }
            RepPhase::Down if avg_angle > self.settings.up_angle => {
                if !self.refractory_elapsed(frame.timestamp) {
                    return None;
                }
                self.phase = RepPhase::Up;
                self.last_event_at = Some(frame.timestamp);
                Some(RepEvent {
                    session_id: self.session_id.clone(),
                    timestamp: frame.timestamp,
                })
            }
            // Dead zone between the thresholds, or already on the matching
            // side of the motion.
            _ => None,
        }
    }

    fn refractory_elapsed(&self, now: DateTime<Utc>) -> bool {
        match self.last_event_at {
            Some(last) => (now - last).num_milliseconds() >= self.settings.refractory_ms,
            None => true,
        }
    }

    /// Average of both elbow angles, or None when any of the six arm joints
    /// is missing or below the confidence bar.
    fn average_elbow_angle(&self, frame: &PoseFrame) -> Option<f64> {
        let mut sum = 0.0;
        for [shoulder, elbow, wrist] in ARM_JOINTS {
            let shoulder = frame.reliable_joint(shoulder, self.settings.min_confidence)?;
            let elbow = frame.reliable_joint(elbow, self.settings.min_confidence)?;
            let wrist = frame.reliable_joint(wrist, self.settings.min_confidence)?;
            sum += joint_angle(shoulder, elbow, wrist);
        }
        Some(sum / ARM_JOINTS.len() as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pose::JointSample;
    use chrono::{Duration, TimeZone};

    /// Frame with both arms bent to `angle` degrees at the elbow.
    fn arm_frame(angle_deg: f64, timestamp: DateTime<Utc>, confidence: f64) -> PoseFrame {
        let mut joints = Vec::new();
        let half = (angle_deg / 2.0).to_radians();
        for [shoulder, elbow, wrist] in ARM_JOINTS {
            // Elbow at the vertex, shoulder and wrist rays opening to the
            // requested included angle.
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
        PoseFrame::new(timestamp, joints)
    }

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 8, 26, 12, 0, 0).unwrap()
    }

    fn detector() -> RepDetector {
        RepDetector::new("session-1".into(), DetectionSettings::default())
    }

    fn run(detector: &mut RepDetector, angles: &[f64], step_ms: i64) -> usize {
        let mut events = 0;
        for (i, angle) in angles.iter().enumerate() {
            let ts = t0() + Duration::milliseconds(step_ms * i as i64);
            if detector.observe(&arm_frame(*angle, ts, 1.0)).is_some() {
                events += 1;
            }
        }
        events
    }

    #[test]
    fn full_cycle_emits_exactly_one_event() {
        let mut det = detector();
        // 170 -> 95 -> 40 -> 95 -> 170: one descent, one ascent, one rep.
        let events = run(&mut det, &[170.0, 95.0, 40.0, 95.0, 170.0], 200);
        assert_eq!(events, 1);
        assert_eq!(det.phase(), RepPhase::Up);
    }

    #[test]
    fn dead_zone_dip_emits_nothing() {
        let mut det = detector();
        let events = run(&mut det, &[170.0, 120.0, 170.0], 200);
        assert_eq!(events, 0);
        assert_eq!(det.phase(), RepPhase::Up);
    }

    #[test]
    fn refractory_window_rejects_fast_second_rep() {
        let mut det = detector();
        // Two full cycles 100ms apart per frame; the second top crossing
        // lands inside the 500ms refractory window.
        let events = run(&mut det, &[170.0, 40.0, 170.0, 40.0, 170.0], 100);
        assert_eq!(events, 1);
    }

    #[test]
    fn slow_consecutive_reps_both_count() {
        let mut det = detector();
        let events = run(&mut det, &[170.0, 40.0, 170.0, 40.0, 170.0], 400);
        assert_eq!(events, 2);
    }

    #[test]
    fn events_are_never_closer_than_refractory() {
        let mut det = detector();
        let mut last: Option<DateTime<Utc>> = None;
        for i in 0..200 {
            let angle = if i % 2 == 0 { 170.0 } else { 40.0 };
            let ts = t0() + Duration::milliseconds(90 * i);
            if let Some(event) = det.observe(&arm_frame(angle, ts, 1.0)) {
                if let Some(prev) = last {
                    assert!((event.timestamp - prev).num_milliseconds() >= 500);
                }
                last = Some(event.timestamp);
            }
        }
        assert!(last.is_some());
    }

    #[test]
    fn low_confidence_frames_are_dropped() {
        let mut det = detector();
        // The dip below 90 is under-confidence, so the machine never sees it.
        assert!(det.observe(&arm_frame(170.0, t0(), 1.0)).is_none());
        assert!(det
            .observe(&arm_frame(40.0, t0() + Duration::milliseconds(200), 0.2))
            .is_none());
        assert_eq!(det.phase(), RepPhase::Up);
        assert!(det
            .observe(&arm_frame(170.0, t0() + Duration::milliseconds(400), 1.0))
            .is_none());
    }

    #[test]
    fn missing_joint_drops_frame() {
        let mut det = detector();
        let mut frame = arm_frame(40.0, t0(), 1.0);
        frame.joints.retain(|s| s.joint != Joint::RightWrist);
        assert!(det.observe(&frame).is_none());
        assert_eq!(det.phase(), RepPhase::Up);
    }
}
