//! Incremental floor-plan reconstruction.
//!
//! Turns an ordered sequence of single-plane wall measurements into a 2D room
//! perimeter and keeps it consistent when the tracking map is later corrected.
//!
//! Layout
//! - `geometry`: rigid transforms, wall-pair intersection, the immutable `FloorPlan`.
//! - `measurement`, `correct`: captured walls and their re-anchoring after map optimization.
//! - `builder`: folds measurements into an open or closed polygon.
//! - `session`: the capture state machine with atomic snapshot publication.
//! - `tracking`: the seam to the external spatial-tracking service.

pub mod builder;
pub mod cfg;
pub mod correct;
pub mod error;
pub mod geometry;
pub mod measurement;
pub mod session;
pub mod tracking;

#[cfg(test)]
pub(crate) mod fixtures;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use builder::{build_plan, PlanBuilder};
pub use cfg::{CorrectionCfg, PlanCfg, SessionCfg};
pub use correct::{correct_measurement, query_corrected_anchor, refresh_measurement};
pub use error::{DegenerateIntersectionError, InvalidPoseError, SessionError};
pub use geometry::{
    floor_point, intersect_plane_poses, intersect_walls, relative_pose, wall_pose, Aabb2,
    FloorPlan, PoseParts, Transform,
};
pub use measurement::PlaneMeasurement;
pub use session::{FinishReport, ReconstructionSession, SessionSnapshot, SessionState};
pub use tracking::{CoordinateFrame, PoseStatus, ReplayTracker, StampedPose, TrackingService};

/// Common exports for quick imports in callers.
pub mod prelude {
    pub use crate::builder::PlanBuilder;
    pub use crate::cfg::SessionCfg;
    pub use crate::geometry::{wall_pose, FloorPlan, PoseParts, Transform};
    pub use crate::measurement::PlaneMeasurement;
    pub use crate::session::{ReconstructionSession, SessionState};
    pub use crate::tracking::{PoseStatus, StampedPose, TrackingService};
    pub use nalgebra::{Point2, Point3, Vector3};
}
