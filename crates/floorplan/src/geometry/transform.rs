//! Rigid 3D transforms and their (position, quaternion) form.

use nalgebra::{Isometry3, Point2, Point3, Quaternion, Translation3, UnitQuaternion, Vector3};

/// Rigid transform (rotation + translation). `a * b` composes, `inverse()` inverts.
pub type Transform = Isometry3<f64>;

/// Pose of `target` expressed in the frame of `base`: `base⁻¹ ∘ target`.
#[inline]
pub fn relative_pose(base: &Transform, target: &Transform) -> Transform {
    base.inverse() * target
}

/// Project a map-frame point onto the floor plane.
#[inline]
pub fn floor_point(p: &Point3<f64>) -> Point2<f64> {
    Point2::new(p.x, p.z)
}

/// Plane pose for a wall through `origin` facing `outward_normal`.
///
/// The vertical component of the normal is dropped so the pose always has local Y up.
/// Returns `None` when the normal is (close to) vertical or not finite.
pub fn wall_pose(origin: Point3<f64>, outward_normal: Vector3<f64>) -> Option<Transform> {
    let horizontal = Vector3::new(outward_normal.x, 0.0, outward_normal.z);
    let norm = horizontal.norm();
    if !norm.is_finite() || norm < 1e-9 || !origin.coords.iter().all(|c| c.is_finite()) {
        return None;
    }
    let rotation = UnitQuaternion::face_towards(&(horizontal / norm), &Vector3::y());
    Some(Isometry3::from_parts(
        Translation3::from(origin.coords),
        rotation,
    ))
}

/// Transform as a plain `(position, unit quaternion)` pair.
///
/// `orientation` is stored as `[x, y, z, w]`, the order tracking services usually report.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PoseParts {
    pub position: [f64; 3],
    pub orientation: [f64; 4],
}

impl PoseParts {
    /// Rebuild the transform, renormalizing the quaternion.
    /// `None` if any coordinate is not finite or the quaternion is zero.
    pub fn to_transform(&self) -> Option<Transform> {
        let [x, y, z, w] = self.orientation;
        let q = Quaternion::new(w, x, y, z);
        let norm = q.norm();
        if !norm.is_finite() || norm < 1e-12 || !self.position.iter().all(|c| c.is_finite()) {
            return None;
        }
        let [px, py, pz] = self.position;
        Some(Isometry3::from_parts(
            Translation3::new(px, py, pz),
            UnitQuaternion::from_quaternion(q),
        ))
    }
}

impl From<Transform> for PoseParts {
    fn from(t: Transform) -> Self {
        let v = t.translation.vector;
        let q = t.rotation.quaternion();
        Self {
            position: [v.x, v.y, v.z],
            orientation: [q.i, q.j, q.k, q.w],
        }
    }
}
