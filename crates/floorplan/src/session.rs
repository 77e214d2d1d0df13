//! Capture session: the single owner of the measurement list.
//!
//! State machine
//! - `Empty` → add → `Capturing`; remove/undo may drop back to `Empty`.
//! - `Capturing` → finish → `Correcting` → `Finished` (terminal).
//!
//! Publication
//! - Measurements, state and plan travel together in one immutable
//!   `SessionSnapshot`. Writers build the next snapshot aside and swap the `Arc`
//!   in a single write; readers clone the `Arc` and never observe a partial update.
//! - The finish pass only holds the write gate to enter `Correcting` and to publish
//!   `Finished`, never across tracker calls. After `teardown()` nothing is published.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use parking_lot::{Mutex, RwLock};
use tracing::{debug, info, warn};

use crate::builder::PlanBuilder;
use crate::cfg::SessionCfg;
use crate::correct::refresh_measurement;
use crate::error::SessionError;
use crate::geometry::FloorPlan;
use crate::measurement::PlaneMeasurement;
use crate::tracking::TrackingService;

/// Lifecycle states of a `ReconstructionSession`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SessionState {
    Empty,
    Capturing,
    Correcting,
    Finished,
}

/// Consistent view of a session at one instant.
#[derive(Clone, Debug)]
pub struct SessionSnapshot {
    state: SessionState,
    measurements: Vec<PlaneMeasurement>,
    plan: Arc<FloorPlan>,
    stale: Vec<usize>,
}

impl SessionSnapshot {
    fn empty() -> Self {
        Self {
            state: SessionState::Empty,
            measurements: Vec::new(),
            plan: Arc::new(FloorPlan::empty()),
            stale: Vec::new(),
        }
    }

    #[inline]
    pub fn state(&self) -> SessionState {
        self.state
    }

    #[inline]
    pub fn measurements(&self) -> &[PlaneMeasurement] {
        &self.measurements
    }

    #[inline]
    pub fn plan(&self) -> &Arc<FloorPlan> {
        &self.plan
    }

    /// Indices of measurements the finish pass could not refresh.
    #[inline]
    pub fn stale_measurements(&self) -> &[usize] {
        &self.stale
    }
}

/// Outcome of the finish pass.
#[derive(Clone, Debug)]
pub struct FinishReport {
    /// The closed plan that was published.
    pub plan: Arc<FloorPlan>,
    /// Measurements re-anchored to a valid corrected pose.
    pub refreshed: usize,
    /// Indices of measurements that kept their last-known pose.
    pub stale: Vec<usize>,
}

impl FinishReport {
    #[inline]
    pub fn stale_count(&self) -> usize {
        self.stale.len()
    }
}

/// Owns the growing wall list and publishes the current plan.
#[derive(Debug)]
pub struct ReconstructionSession {
    cfg: SessionCfg,
    builder: PlanBuilder,
    current: RwLock<Arc<SessionSnapshot>>,
    write_gate: Mutex<()>,
    torn_down: AtomicBool,
}

impl Default for ReconstructionSession {
    fn default() -> Self {
        Self::new(SessionCfg::default())
    }
}

impl ReconstructionSession {
    pub fn new(cfg: SessionCfg) -> Self {
        Self {
            cfg,
            builder: PlanBuilder::new(cfg.plan),
            current: RwLock::new(Arc::new(SessionSnapshot::empty())),
            write_gate: Mutex::new(()),
            torn_down: AtomicBool::new(false),
        }
    }

    #[inline]
    pub fn cfg(&self) -> &SessionCfg {
        &self.cfg
    }

    /// Latest published snapshot.
    pub fn snapshot(&self) -> Arc<SessionSnapshot> {
        Arc::clone(&self.current.read())
    }

    /// Latest published plan (open while capturing, closed once finished).
    pub fn current_plan(&self) -> Arc<FloorPlan> {
        Arc::clone(&self.current.read().plan)
    }

    pub fn state(&self) -> SessionState {
        self.current.read().state
    }

    /// Number of stored measurements.
    pub fn len(&self) -> usize {
        self.current.read().measurements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down.load(Ordering::SeqCst)
    }

    /// Append a wall and publish the rebuilt open plan.
    pub fn add_measurement(
        &self,
        measurement: PlaneMeasurement,
    ) -> Result<Arc<FloorPlan>, SessionError> {
        let _gate = self.write_gate.lock();
        let current = self.live_snapshot()?;
        match current.state {
            SessionState::Empty | SessionState::Capturing => {}
            state => {
                return Err(SessionError::InvalidState {
                    op: "add_measurement",
                    state,
                })
            }
        }
        let mut measurements = current.measurements.clone();
        measurements.push(measurement);
        Ok(self.publish_capture(measurements))
    }

    /// Undo the most recent wall and publish the rebuilt open plan.
    pub fn remove_last_measurement(&self) -> Result<PlaneMeasurement, SessionError> {
        let _gate = self.write_gate.lock();
        let current = self.live_snapshot()?;
        if current.state != SessionState::Capturing {
            return Err(SessionError::InvalidState {
                op: "remove_last_measurement",
                state: current.state,
            });
        }
        let mut measurements = current.measurements.clone();
        let Some(removed) = measurements.pop() else {
            return Err(SessionError::InvalidState {
                op: "remove_last_measurement",
                state: SessionState::Empty,
            });
        };
        self.publish_capture(measurements);
        Ok(removed)
    }

    /// Run the finish pass on the calling thread.
    ///
    /// Asks the tracker to save and optimize, re-anchors every measurement, then
    /// publishes one closed plan. Measurements without a valid corrected pose keep
    /// their last-known pose and are reported as stale.
    pub fn finish(&self, tracker: &dyn TrackingService) -> Result<FinishReport, SessionError> {
        let measurements = self.begin_correction()?;
        self.complete_correction(&measurements, tracker)
    }

    /// Enter `Correcting` now and run the rest of the finish pass on a worker thread.
    pub fn finish_in_background(
        self: &Arc<Self>,
        tracker: Arc<dyn TrackingService>,
    ) -> Result<JoinHandle<Result<FinishReport, SessionError>>, SessionError> {
        let measurements = self.begin_correction()?;
        let session = Arc::clone(self);
        Ok(thread::spawn(move || {
            session.complete_correction(&measurements, tracker.as_ref())
        }))
    }

    /// Stop publishing. A running finish pass lets its in-flight query finish, then
    /// stops and publishes nothing.
    pub fn teardown(&self) {
        let _gate = self.write_gate.lock();
        self.torn_down.store(true, Ordering::SeqCst);
        debug!("session torn down");
    }

    fn live_snapshot(&self) -> Result<Arc<SessionSnapshot>, SessionError> {
        if self.is_torn_down() {
            return Err(SessionError::TornDown);
        }
        Ok(self.snapshot())
    }

    fn begin_correction(&self) -> Result<Vec<PlaneMeasurement>, SessionError> {
        let _gate = self.write_gate.lock();
        let current = self.live_snapshot()?;
        if current.state != SessionState::Capturing {
            return Err(SessionError::InvalidState {
                op: "finish",
                state: current.state,
            });
        }
        self.publish(SessionSnapshot {
            state: SessionState::Correcting,
            measurements: current.measurements.clone(),
            plan: Arc::clone(&current.plan),
            stale: Vec::new(),
        });
        Ok(current.measurements.clone())
    }

    fn complete_correction(
        &self,
        measurements: &[PlaneMeasurement],
        tracker: &dyn TrackingService,
    ) -> Result<FinishReport, SessionError> {
        tracker.save_and_optimize();
        let mut corrected = Vec::with_capacity(measurements.len());
        let mut stale = Vec::new();
        for (i, m) in measurements.iter().enumerate() {
            if self.is_torn_down() {
                debug!(done = i, "finish pass abandoned after teardown");
                return Err(SessionError::TornDown);
            }
            match refresh_measurement(m, tracker, &self.cfg.correction) {
                Ok(fresh) => corrected.push(fresh),
                Err(_) => {
                    stale.push(i);
                    corrected.push(*m);
                }
            }
        }
        let plan = Arc::new(self.builder.build(&corrected, true));

        let _gate = self.write_gate.lock();
        if self.is_torn_down() {
            debug!("finish result discarded after teardown");
            return Err(SessionError::TornDown);
        }
        self.publish(SessionSnapshot {
            state: SessionState::Finished,
            measurements: corrected,
            plan: Arc::clone(&plan),
            stale: stale.clone(),
        });
        if !stale.is_empty() {
            warn!(stale = stale.len(), "finish pass kept stale measurements");
        }
        info!(
            walls = measurements.len(),
            stale = stale.len(),
            "finish pass complete"
        );
        Ok(FinishReport {
            plan,
            refreshed: measurements.len() - stale.len(),
            stale,
        })
    }

    fn publish_capture(&self, measurements: Vec<PlaneMeasurement>) -> Arc<FloorPlan> {
        let plan = Arc::new(self.builder.build(&measurements, false));
        let state = if measurements.is_empty() {
            SessionState::Empty
        } else {
            SessionState::Capturing
        };
        self.publish(SessionSnapshot {
            state,
            measurements,
            plan: Arc::clone(&plan),
            stale: Vec::new(),
        });
        plan
    }

    fn publish(&self, next: SessionSnapshot) {
        debug!(state = ?next.state, walls = next.measurements.len(), "snapshot published");
        *self.current.write() = Arc::new(next);
    }
}
