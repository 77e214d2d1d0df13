//! Re-anchoring measurements after a map optimization.
//!
//! A wall is rigidly attached to the device pose it was captured from. When the
//! tracker revises that pose, the plane pose moves with it:
//! `plane' = anchor' ∘ (anchor⁻¹ ∘ plane)`, so `anchor⁻¹ ∘ plane` is preserved.

use tracing::{debug, warn};

use crate::cfg::CorrectionCfg;
use crate::error::InvalidPoseError;
use crate::geometry::Transform;
use crate::measurement::PlaneMeasurement;
use crate::tracking::{CoordinateFrame, PoseStatus, TrackingService};

/// Carry `measurement` along to `new_anchor_pose` (same map frame, post-correction).
pub fn correct_measurement(
    measurement: &PlaneMeasurement,
    new_anchor_pose: Transform,
) -> PlaneMeasurement {
    let plane_pose = new_anchor_pose * measurement.relative_pose();
    PlaneMeasurement::new(
        plane_pose,
        new_anchor_pose,
        measurement.capture_timestamp(),
    )
}

/// Ask the tracker for the device pose in the map frame at `timestamp`, retrying
/// non-valid answers up to `cfg.max_attempts` times.
pub fn query_corrected_anchor(
    tracker: &dyn TrackingService,
    timestamp: f64,
    cfg: &CorrectionCfg,
) -> Result<Transform, InvalidPoseError> {
    let attempts = cfg.max_attempts.max(1);
    let mut last = PoseStatus::Unknown;
    for attempt in 1..=attempts {
        let answer = tracker.get_pose(CoordinateFrame::Map, CoordinateFrame::Device, timestamp);
        if answer.status.is_valid() {
            return Ok(answer.transform);
        }
        last = answer.status;
        debug!(timestamp, attempt, status = ?last, "pose query not valid");
        if attempt < attempts && !cfg.retry_delay.is_zero() {
            std::thread::sleep(cfg.retry_delay);
        }
    }
    Err(InvalidPoseError {
        timestamp,
        status: last,
        attempts,
    })
}

/// Re-query and re-anchor one measurement. On error the caller keeps the old one.
pub fn refresh_measurement(
    measurement: &PlaneMeasurement,
    tracker: &dyn TrackingService,
    cfg: &CorrectionCfg,
) -> Result<PlaneMeasurement, InvalidPoseError> {
    match query_corrected_anchor(tracker, measurement.capture_timestamp(), cfg) {
        Ok(anchor) => Ok(correct_measurement(measurement, anchor)),
        Err(err) => {
            warn!(%err, "measurement left stale");
            Err(err)
        }
    }
}
