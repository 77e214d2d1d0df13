//! Seam to the external spatial-tracking service.
//!
//! The engine only ever asks two things of the tracker: "pose of frame B in frame A
//! at time T" and "save and optimize the map now". `ReplayTracker` answers both from
//! a recorded table so captures can be replayed offline.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use parking_lot::Mutex;

use crate::geometry::Transform;
use crate::measurement::PlaneMeasurement;

/// Reference frames known to the tracking service.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CoordinateFrame {
    /// Persistent, optimizable map frame. Measurements live here.
    Map,
    StartOfService,
    Device,
}

/// Quality flag attached to every pose answer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PoseStatus {
    Valid,
    Initializing,
    Invalid,
    Unknown,
}

impl PoseStatus {
    #[inline]
    pub fn is_valid(self) -> bool {
        matches!(self, PoseStatus::Valid)
    }
}

/// A pose answer; `transform` is meaningless unless `status` is `Valid`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StampedPose {
    pub transform: Transform,
    pub status: PoseStatus,
}

impl StampedPose {
    #[inline]
    pub fn valid(transform: Transform) -> Self {
        Self {
            transform,
            status: PoseStatus::Valid,
        }
    }

    #[inline]
    pub fn unavailable(status: PoseStatus) -> Self {
        Self {
            transform: Transform::identity(),
            status,
        }
    }
}

/// External tracking service, as seen by the engine.
///
/// Both calls may block. `save_and_optimize` returns once the optimized map is
/// queryable.
pub trait TrackingService: Send + Sync {
    fn get_pose(
        &self,
        base: CoordinateFrame,
        target: CoordinateFrame,
        timestamp: f64,
    ) -> StampedPose;

    fn save_and_optimize(&self);
}

/// Tracker replaying recorded `Device`-in-`Map` poses.
///
/// Lookups take the nearest recorded timestamp within `time_tolerance`; anything else
/// answers `Unknown`. Other frame pairs always answer `Unknown`.
#[derive(Debug)]
pub struct ReplayTracker {
    rows: Vec<(f64, StampedPose)>,
    time_tolerance: f64,
    transient_failures: Mutex<Vec<(f64, u32)>>,
    optimize_delay: Duration,
    queries: AtomicUsize,
    optimize_calls: AtomicUsize,
}

impl Default for ReplayTracker {
    fn default() -> Self {
        Self::new(1e-6)
    }
}

impl ReplayTracker {
    pub fn new(time_tolerance: f64) -> Self {
        Self {
            rows: Vec::new(),
            time_tolerance: time_tolerance.abs(),
            transient_failures: Mutex::new(Vec::new()),
            optimize_delay: Duration::ZERO,
            queries: AtomicUsize::new(0),
            optimize_calls: AtomicUsize::new(0),
        }
    }

    /// Tracker that confirms every measurement's anchor pose unchanged.
    pub fn from_measurements(measurements: &[PlaneMeasurement]) -> Self {
        let mut tracker = Self::default();
        for m in measurements {
            tracker.insert(m.capture_timestamp(), StampedPose::valid(*m.anchor_pose()));
        }
        tracker
    }

    pub fn insert(&mut self, timestamp: f64, pose: StampedPose) {
        self.rows.push((timestamp, pose));
    }

    pub fn with_pose(mut self, timestamp: f64, pose: StampedPose) -> Self {
        self.insert(timestamp, pose);
        self
    }

    /// The first `count` queries near `timestamp` answer `Initializing`.
    pub fn with_transient_failures(self, timestamp: f64, count: u32) -> Self {
        self.transient_failures.lock().push((timestamp, count));
        self
    }

    /// Make `save_and_optimize` block for `delay`.
    pub fn with_optimize_delay(mut self, delay: Duration) -> Self {
        self.optimize_delay = delay;
        self
    }

    /// Number of `get_pose` calls so far.
    pub fn queries(&self) -> usize {
        self.queries.load(Ordering::Relaxed)
    }

    /// Number of `save_and_optimize` calls so far.
    pub fn optimize_calls(&self) -> usize {
        self.optimize_calls.load(Ordering::Relaxed)
    }

    fn take_transient_failure(&self, timestamp: f64) -> bool {
        let mut pending = self.transient_failures.lock();
        match pending
            .iter_mut()
            .find(|(t, n)| *n > 0 && (t - timestamp).abs() <= self.time_tolerance)
        {
            Some((_, n)) => {
                *n -= 1;
                true
            }
            None => false,
        }
    }

    fn lookup(&self, timestamp: f64) -> Option<StampedPose> {
        self.rows
            .iter()
            .map(|(t, pose)| ((t - timestamp).abs(), pose))
            .filter(|(dt, _)| *dt <= self.time_tolerance)
            .min_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal))
            .map(|(_, pose)| *pose)
    }
}

impl TrackingService for ReplayTracker {
    fn get_pose(
        &self,
        base: CoordinateFrame,
        target: CoordinateFrame,
        timestamp: f64,
    ) -> StampedPose {
        self.queries.fetch_add(1, Ordering::Relaxed);
        if (base, target) != (CoordinateFrame::Map, CoordinateFrame::Device) {
            return StampedPose::unavailable(PoseStatus::Unknown);
        }
        if self.take_transient_failure(timestamp) {
            return StampedPose::unavailable(PoseStatus::Initializing);
        }
        self.lookup(timestamp)
            .unwrap_or_else(|| StampedPose::unavailable(PoseStatus::Unknown))
    }

    fn save_and_optimize(&self) {
        if !self.optimize_delay.is_zero() {
            std::thread::sleep(self.optimize_delay);
        }
        self.optimize_calls.fetch_add(1, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::{Isometry3, Vector3};

    fn pose_at(x: f64) -> Transform {
        Isometry3::translation(x, 0.0, 0.0)
    }

    #[test]
    fn nearest_row_within_tolerance() {
        let tracker = ReplayTracker::new(0.05)
            .with_pose(1.0, StampedPose::valid(pose_at(1.0)))
            .with_pose(1.04, StampedPose::valid(pose_at(2.0)));
        let got = tracker.get_pose(CoordinateFrame::Map, CoordinateFrame::Device, 1.03);
        assert!(got.status.is_valid());
        assert!((got.transform.translation.vector - Vector3::new(2.0, 0.0, 0.0)).norm() < 1e-12);
        let miss = tracker.get_pose(CoordinateFrame::Map, CoordinateFrame::Device, 1.2);
        assert_eq!(miss.status, PoseStatus::Unknown);
        assert_eq!(tracker.queries(), 2);
    }

    #[test]
    fn other_frame_pairs_are_unknown() {
        let tracker = ReplayTracker::default().with_pose(0.0, StampedPose::valid(pose_at(0.0)));
        let got = tracker.get_pose(
            CoordinateFrame::StartOfService,
            CoordinateFrame::Device,
            0.0,
        );
        assert_eq!(got.status, PoseStatus::Unknown);
    }

    #[test]
    fn transient_failures_run_out() {
        let tracker = ReplayTracker::default()
            .with_pose(3.0, StampedPose::valid(pose_at(0.5)))
            .with_transient_failures(3.0, 2);
        let statuses: Vec<_> = (0..3)
            .map(|_| {
                tracker
                    .get_pose(CoordinateFrame::Map, CoordinateFrame::Device, 3.0)
                    .status
            })
            .collect();
        assert_eq!(
            statuses,
            vec![
                PoseStatus::Initializing,
                PoseStatus::Initializing,
                PoseStatus::Valid
            ]
        );
    }

    #[test]
    fn optimize_calls_are_counted() {
        let tracker = ReplayTracker::default();
        tracker.save_and_optimize();
        tracker.save_and_optimize();
        assert_eq!(tracker.optimize_calls(), 2);
    }
}
