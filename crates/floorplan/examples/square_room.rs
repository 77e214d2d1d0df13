//! Walk a 4 m × 3 m room, finish with a corrected map, print the plan.
//!
//! Usage:
//!   cargo run -p floorplan --example square_room

use floorplan::prelude::*;
use floorplan::ReplayTracker;
use nalgebra::{Isometry3, Translation3, UnitQuaternion};

fn capture(origin: Point3<f64>, normal: Vector3<f64>, t: f64) -> Option<PlaneMeasurement> {
    let plane = wall_pose(origin, normal)?;
    let device = Point3::new(origin.x, 1.4, origin.z) - normal * 1.5;
    let look = UnitQuaternion::face_towards(&normal, &Vector3::y());
    let anchor = Isometry3::from_parts(Translation3::from(device.coords), look);
    Some(PlaneMeasurement::new(plane, anchor, t))
}

fn main() {
    let walls: Vec<PlaneMeasurement> = [
        (Point3::new(1.0, 1.1, 0.0), Vector3::new(0.0, 0.0, -1.0)),
        (Point3::new(4.0, 1.2, 2.0), Vector3::new(1.0, 0.0, 0.0)),
        (Point3::new(3.0, 0.9, 3.0), Vector3::new(0.0, 0.0, 1.0)),
        (Point3::new(0.0, 1.3, 1.0), Vector3::new(-1.0, 0.0, 0.0)),
    ]
    .into_iter()
    .enumerate()
    .filter_map(|(k, (o, n))| capture(o, n, k as f64))
    .collect();

    let session = ReconstructionSession::new(SessionCfg::default());
    for m in &walls {
        if let Ok(plan) = session.add_measurement(*m) {
            println!("open plan: {} corner(s)", plan.len());
        }
    }

    // Pretend loop closure shifted the whole trajectory by 5 cm.
    let drift = Isometry3::translation(0.05, 0.0, 0.0);
    let mut tracker = ReplayTracker::default();
    for m in &walls {
        tracker.insert(m.capture_timestamp(), StampedPose::valid(drift * m.anchor_pose()));
    }
    match session.finish(&tracker) {
        Ok(report) => {
            for (i, p) in report.plan.corners().iter().enumerate() {
                println!("corner {i}: ({:.3}, {:.3})", p.x, p.y);
            }
            println!("edges: {:?}", report.plan.edge_lengths());
            println!("area: {:.3} m², stale: {}", report.plan.area(), report.stale_count());
        }
        Err(err) => eprintln!("finish failed: {err}"),
    }
}
