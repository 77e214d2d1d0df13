//! Corner between two adjacent walls.
//!
//! Each wall is a vertical plane, so its floor footprint is the line through the plane
//! origin along its local X axis. The corner is where the second wall's footprint
//! crosses the first wall's plane (Z = 0 in the first wall's frame). Exactly two
//! measurements determine a corner; nothing is averaged.

use nalgebra::{Point2, Point3, Vector3};

use super::transform::{floor_point, relative_pose, Transform};
use crate::cfg::PlanCfg;
use crate::error::DegenerateIntersectionError;
use crate::measurement::PlaneMeasurement;

/// Floor corner shared by the walls with plane poses `first` and `second`.
///
/// Fails when `|x.z| < eps_parallel`, where `x` is the second wall's X axis in the first
/// wall's frame, i.e. the walls are parallel within tolerance. A NaN axis fails too.
pub fn intersect_plane_poses(
    first: &Transform,
    second: &Transform,
    eps_parallel: f64,
) -> Result<Point2<f64>, DegenerateIntersectionError> {
    let local = relative_pose(first, second);
    let origin = local.translation.vector;
    let x_axis = local.rotation * Vector3::x();
    // Negated test so a NaN denominator is rejected as well.
    if !(x_axis.z.abs() >= eps_parallel) {
        return Err(DegenerateIntersectionError {
            denominator: x_axis.z,
        });
    }
    let along = origin.x - x_axis.x / x_axis.z * origin.z;
    let corner = first.transform_point(&Point3::new(along, 0.0, 0.0));
    Ok(floor_point(&corner))
}

/// `intersect_plane_poses` on two measurements with the configured tolerance.
#[inline]
pub fn intersect_walls(
    first: &PlaneMeasurement,
    second: &PlaneMeasurement,
    cfg: &PlanCfg,
) -> Result<Point2<f64>, DegenerateIntersectionError> {
    intersect_plane_poses(first.plane_pose(), second.plane_pose(), cfg.eps_parallel)
}
