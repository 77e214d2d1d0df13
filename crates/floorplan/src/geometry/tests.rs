use super::*;
use nalgebra::{point, vector, Isometry3, Point2, Point3, Translation3, UnitQuaternion, Vector3};

#[test]
fn wall_pose_follows_axis_convention() {
    let pose = wall_pose(point![1.0, 1.5, 2.0], vector![0.0, 0.3, -2.0]).unwrap();
    let z = pose.rotation * Vector3::z();
    let y = pose.rotation * Vector3::y();
    let x = pose.rotation * Vector3::x();
    assert!((z - vector![0.0, 0.0, -1.0]).norm() < 1e-12);
    assert!((y - Vector3::y()).norm() < 1e-12);
    assert!((x - vector![-1.0, 0.0, 0.0]).norm() < 1e-12);
    assert!((pose.translation.vector - vector![1.0, 1.5, 2.0]).norm() < 1e-12);
}

#[test]
fn wall_pose_rejects_vertical_or_nan_normals() {
    assert!(wall_pose(Point3::origin(), Vector3::y()).is_none());
    assert!(wall_pose(Point3::origin(), vector![f64::NAN, 0.0, 1.0]).is_none());
    assert!(wall_pose(point![f64::INFINITY, 0.0, 0.0], Vector3::x()).is_none());
}

#[test]
fn pose_parts_use_xyzw_order() {
    let rot = UnitQuaternion::from_axis_angle(&Vector3::y_axis(), std::f64::consts::FRAC_PI_2);
    let t = Isometry3::from_parts(Translation3::new(1.0, 2.0, 3.0), rot);
    let parts = PoseParts::from(t);
    assert_eq!(parts.position, [1.0, 2.0, 3.0]);
    let s = std::f64::consts::FRAC_1_SQRT_2;
    assert!((parts.orientation[1] - s).abs() < 1e-12);
    assert!((parts.orientation[3] - s).abs() < 1e-12);
    let back = parts.to_transform().unwrap();
    assert!(back.rotation.angle_to(&rot) < 1e-12);
}

#[test]
fn pose_parts_normalize_and_reject_zero_quaternions() {
    let scaled = PoseParts {
        position: [0.0, 0.0, 0.0],
        orientation: [0.0, 0.0, 0.0, 4.0],
    };
    let t = scaled.to_transform().unwrap();
    assert!(t.rotation.angle() < 1e-12);
    let zero = PoseParts {
        position: [0.0, 0.0, 0.0],
        orientation: [0.0, 0.0, 0.0, 0.0],
    };
    assert!(zero.to_transform().is_none());
    let nan = PoseParts {
        position: [f64::NAN, 0.0, 0.0],
        orientation: [0.0, 0.0, 0.0, 1.0],
    };
    assert!(nan.to_transform().is_none());
}

#[test]
fn relative_pose_composes_back() {
    let a = Isometry3::from_parts(
        Translation3::new(0.5, -1.0, 2.0),
        UnitQuaternion::from_scaled_axis(vector![0.1, 0.7, -0.3]),
    );
    let b = Isometry3::from_parts(
        Translation3::new(-3.0, 0.2, 1.0),
        UnitQuaternion::from_scaled_axis(vector![-0.4, 0.2, 1.1]),
    );
    let rel = relative_pose(&a, &b);
    let recomposed = a * rel;
    assert!((recomposed.translation.vector - b.translation.vector).norm() < 1e-12);
    assert!(recomposed.rotation.angle_to(&b.rotation) < 1e-12);
}

#[test]
fn perpendicular_walls_meet_at_corner() {
    let first = wall_pose(point![2.0, 1.0, 0.0], vector![0.0, 0.0, -1.0]).unwrap();
    let second = wall_pose(point![5.0, 0.5, 1.0], vector![1.0, 0.0, 0.0]).unwrap();
    let p = intersect_plane_poses(&first, &second, 1e-3).unwrap();
    assert!((p - Point2::new(5.0, 0.0)).norm() < 1e-12);
    // Order of the pair does not move the corner.
    let q = intersect_plane_poses(&second, &first, 1e-3).unwrap();
    assert!((p - q).norm() < 1e-12);
}

#[test]
fn oblique_walls_meet_at_line_intersection() {
    // Wall along z = x (normal (1, 0, -1)/√2) and wall x = 4.
    let first = wall_pose(point![1.0, 1.0, 1.0], vector![1.0, 0.0, -1.0]).unwrap();
    let second = wall_pose(point![4.0, 1.0, -2.0], vector![1.0, 0.0, 0.0]).unwrap();
    let p = intersect_plane_poses(&first, &second, 1e-3).unwrap();
    assert!((p - Point2::new(4.0, 4.0)).norm() < 1e-9);
}

#[test]
fn parallel_walls_report_degenerate_intersection() {
    let first = wall_pose(point![0.0, 1.0, 0.0], vector![0.0, 0.0, 1.0]).unwrap();
    let second = wall_pose(point![0.0, 1.0, 2.0], vector![0.0, 0.0, 1.0]).unwrap();
    let err = intersect_plane_poses(&first, &second, 1e-3).unwrap_err();
    assert!(err.denominator.abs() < 1e-12);
    // Opposite-facing parallel walls are degenerate too.
    let facing = wall_pose(point![0.0, 1.0, 2.0], vector![0.0, 0.0, -1.0]).unwrap();
    assert!(intersect_plane_poses(&first, &facing, 1e-3).is_err());
}

#[test]
fn open_plan_measures() {
    let plan = FloorPlan::from_corners(
        vec![
            Point2::new(0.0, 0.0),
            Point2::new(3.0, 0.0),
            Point2::new(3.0, 4.0),
        ],
        false,
    );
    assert_eq!(plan.edge_lengths(), vec![3.0, 4.0]);
    assert_eq!(plan.perimeter(), 7.0);
    assert_eq!(plan.area(), 0.0);
    let bb = plan.bounding_box().unwrap();
    assert_eq!(bb.width(), 3.0);
    assert_eq!(bb.depth(), 4.0);
    assert_eq!(bb.center(), Point2::new(1.5, 2.0));
    assert_eq!(plan.centroid().unwrap(), Point2::new(2.0, 4.0 / 3.0));
}

#[test]
fn closed_plan_adds_closing_edge_and_area() {
    let plan = FloorPlan::from_corners(
        vec![
            Point2::new(0.0, 0.0),
            Point2::new(3.0, 0.0),
            Point2::new(3.0, 4.0),
        ],
        true,
    );
    assert_eq!(plan.edge_lengths(), vec![3.0, 4.0, 5.0]);
    assert!((plan.area() - 6.0).abs() < 1e-12);
    // Clockwise winding gives the same area.
    let reversed = FloorPlan::from_corners(plan.corners().iter().rev().copied().collect(), true);
    assert!((reversed.area() - 6.0).abs() < 1e-12);
}

#[test]
fn empty_plan_has_no_measures() {
    let plan = FloorPlan::empty();
    assert!(plan.is_empty());
    assert!(plan.centroid().is_none());
    assert!(plan.bounding_box().is_none());
    assert_eq!(plan.perimeter(), 0.0);
}
