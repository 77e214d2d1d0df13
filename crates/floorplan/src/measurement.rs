//! One captured wall.

use nalgebra::{Point2, Point3};

use crate::geometry::{floor_point, relative_pose, Transform};

/// A fitted wall plane together with the tracking pose at capture time.
///
/// Both poses live in the same map frame. `relative_pose()` is the quantity that
/// stays fixed when the map is corrected.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlaneMeasurement {
    plane_pose: Transform,
    anchor_pose: Transform,
    capture_timestamp: f64,
}

impl PlaneMeasurement {
    pub fn new(plane_pose: Transform, anchor_pose: Transform, capture_timestamp: f64) -> Self {
        Self {
            plane_pose,
            anchor_pose,
            capture_timestamp,
        }
    }

    #[inline]
    pub fn plane_pose(&self) -> &Transform {
        &self.plane_pose
    }

    #[inline]
    pub fn anchor_pose(&self) -> &Transform {
        &self.anchor_pose
    }

    /// Only used to re-query the tracking service for this instant.
    #[inline]
    pub fn capture_timestamp(&self) -> f64 {
        self.capture_timestamp
    }

    /// Plane pose seen from the anchor: `anchor⁻¹ ∘ plane`.
    #[inline]
    pub fn relative_pose(&self) -> Transform {
        relative_pose(&self.anchor_pose, &self.plane_pose)
    }

    /// The wall's own floor point (plane origin projected to the floor).
    #[inline]
    pub fn reference_point(&self) -> Point2<f64> {
        floor_point(&Point3::from(self.plane_pose.translation.vector))
    }
}
