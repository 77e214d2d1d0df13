//! Synthetic rooms shared by unit tests.

use nalgebra::{Isometry3, Point3, Translation3, UnitQuaternion, Vector3};

use crate::geometry::{wall_pose, Transform};
use crate::measurement::PlaneMeasurement;

/// Wall through `origin` with outward `normal`, captured from two metres inside the room.
pub(crate) fn wall(origin: Point3<f64>, normal: Vector3<f64>, timestamp: f64) -> PlaneMeasurement {
    let plane = wall_pose(origin, normal).expect("horizontal normal");
    let inward = -normal.normalize();
    let device = Point3::new(origin.x, 1.4, origin.z) + inward * 2.0;
    let look = UnitQuaternion::face_towards(&normal.normalize(), &Vector3::y());
    let anchor = Isometry3::from_parts(Translation3::from(device.coords), look);
    PlaneMeasurement::new(plane, anchor, timestamp)
}

/// Axis-aligned `width × depth` room with walls walked in the order
/// z = 0, x = width, z = depth, x = 0.
pub(crate) fn room_walls(width: f64, depth: f64) -> Vec<PlaneMeasurement> {
    vec![
        wall(
            Point3::new(0.3 * width, 1.1, 0.0),
            Vector3::new(0.0, 0.0, -1.0),
            1.0,
        ),
        wall(
            Point3::new(width, 1.2, 0.6 * depth),
            Vector3::new(1.0, 0.0, 0.0),
            2.0,
        ),
        wall(
            Point3::new(0.7 * width, 0.9, depth),
            Vector3::new(0.0, 0.0, 1.0),
            3.0,
        ),
        wall(
            Point3::new(0.0, 1.3, 0.2 * depth),
            Vector3::new(-1.0, 0.0, 0.0),
            4.0,
        ),
    ]
}

/// Regular `n`-gon room with inradius `radius` centred on the origin.
pub(crate) fn polygon_walls(n: usize, radius: f64) -> Vec<PlaneMeasurement> {
    (0..n)
        .map(|k| {
            let theta = std::f64::consts::TAU * k as f64 / n as f64;
            let normal = Vector3::new(theta.cos(), 0.0, theta.sin());
            let origin = Point3::new(radius * theta.cos(), 1.0, radius * theta.sin());
            wall(origin, normal, k as f64)
        })
        .collect()
}

pub(crate) fn assert_transform_close(a: &Transform, b: &Transform, tol: f64) {
    let dt = (a.translation.vector - b.translation.vector).norm();
    let dr = a.rotation.angle_to(&b.rotation);
    assert!(
        dt < tol && dr < tol,
        "transforms differ: |dt|={dt:e}, angle={dr:e}"
    );
}
