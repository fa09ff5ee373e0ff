use crate::config::FramePolicy;
use crate::consts::MAX_FRAMES_PER_PAIR;
use crate::error::{InterpError, Result};
use crate::geometry::{longitude_difference, wrap_longitude};

/// Tolerance so a step landing exactly on the later record is kept.
const STEP_TOLERANCE: f64 = 1e-9;

/// One frame to synthesize between two records.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlannedFrame {
    /// 1-based position inside the pair.
    pub frame_index: usize,
    pub target_longitude: f64,
}

/// Lay out target longitudes on the westward walk from `previous_lng` to
/// `current_lng` (degrees).
///
/// The earlier record's own longitude is never planned (it closes the
/// previous pair); the later record's longitude is. A zero span plans nothing.
///
/// Fails when the policy is invalid or would plan more than
/// [`MAX_FRAMES_PER_PAIR`] frames.
pub fn plan_targets(
    previous_lng: f64,
    current_lng: f64,
    policy: &FramePolicy,
) -> Result<Vec<PlannedFrame>> {
    policy.validate()?;
    let span = longitude_difference(previous_lng, current_lng);
    if !span.is_finite() || span <= 0.0 {
        return Ok(Vec::new());
    }

    let (count, step) = match *policy {
        FramePolicy::FixedStep { degrees } => {
            let count = (span / degrees + STEP_TOLERANCE).floor();
            if count > MAX_FRAMES_PER_PAIR as f64 {
                return Err(InterpError::InvalidConfig(format!(
                    "step of {degrees}° plans {count} frames, limit is {MAX_FRAMES_PER_PAIR}"
                )));
            }
            (count as usize, degrees)
        }
        FramePolicy::FixedCount { frames } => (frames, span / frames as f64),
    };

    Ok((1..=count)
        .map(|k| PlannedFrame {
            frame_index: k,
            target_longitude: wrap_longitude(previous_lng - step * k as f64),
        })
        .collect())
}
