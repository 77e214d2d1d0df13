//! Floor-plan geometry: rigid transforms, wall-pair corners, the plan value type.
//!
//! Conventions
//! - Map frame is right-handed with Y up (opposite gravity). The floor plane is X/Z,
//!   and a 3D map point `(x, y, z)` projects to the 2D floor point `(x, z)`.
//! - A wall's plane pose has its local Z axis along the outward wall normal and its
//!   local Y axis up. Its local X axis therefore runs horizontally along the wall.
//! - All rotations are unit quaternions; no Euler angles anywhere.

mod intersect;
mod plan;
mod transform;

pub use intersect::{intersect_plane_poses, intersect_walls};
pub use plan::{Aabb2, FloorPlan};
pub use transform::{floor_point, relative_pose, wall_pose, PoseParts, Transform};

#[cfg(test)]
mod tests;
