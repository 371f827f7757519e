//! Joint angle geometry.

use super::JointSample;

/// Angle in degrees at vertex `b` between the rays `b -> a` and `b -> c`,
/// normalized into [0, 180].
///
/// Undefined for degenerate input (coincident points); callers guard against
/// that by filtering on keypoint confidence first.
pub fn joint_angle(a: &JointSample, b: &JointSample, c: &JointSample) -> f64 {
    let radians = (c.y - b.y).atan2(c.x - b.x) - (a.y - b.y).atan2(a.x - b.x);
    let mut angle = radians.to_degrees().abs();
    if angle > 180.0 {
        angle = 360.0 - angle;
    }
    angle
}
