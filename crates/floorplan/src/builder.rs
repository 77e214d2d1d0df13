//! Fold an ordered list of walls into a floor polygon.
//!
//! Corner layout
//! - Open: `[p(0), c(0,1), c(1,2), …, c(N-2,N-1)]`, where `p(i)` is wall i's own
//!   reference point and `c(a,b)` the corner of walls a and b. N walls give N points.
//! - Closed: the leading reference point becomes the closing corner `c(N-1,0)`,
//!   so N ≥ 2 walls again give N points, one per wall.
//!
//! Degenerate corners (parallel neighbours) fall back to the reference point of the
//! second wall of the pair and are listed in `FloorPlan::degenerate_corners`.
//! No minimum wall count is enforced here.

use nalgebra::Point2;
use tracing::{debug, warn};

use crate::cfg::PlanCfg;
use crate::geometry::{intersect_walls, FloorPlan};
use crate::measurement::PlaneMeasurement;

/// Builds `FloorPlan`s with a fixed tolerance set.
#[derive(Clone, Copy, Debug, Default)]
pub struct PlanBuilder {
    cfg: PlanCfg,
}

impl PlanBuilder {
    pub fn new(cfg: PlanCfg) -> Self {
        Self { cfg }
    }

    #[inline]
    pub fn cfg(&self) -> &PlanCfg {
        &self.cfg
    }

    pub fn build(&self, measurements: &[PlaneMeasurement], closed: bool) -> FloorPlan {
        let n = measurements.len();
        let Some(first) = measurements.first() else {
            return FloorPlan::with_degenerate(Vec::new(), closed, Vec::new());
        };
        let mut degenerate = Vec::new();
        let mut corners = Vec::with_capacity(n);
        if closed && n >= 2 {
            corners.push(self.corner(&measurements[n - 1], first, 0, &mut degenerate));
        } else {
            corners.push(first.reference_point());
        }
        for (i, pair) in measurements.windows(2).enumerate() {
            corners.push(self.corner(&pair[0], &pair[1], i + 1, &mut degenerate));
        }
        debug!(
            walls = n,
            closed,
            degenerate = degenerate.len(),
            "floor plan rebuilt"
        );
        FloorPlan::with_degenerate(corners, closed, degenerate)
    }

    fn corner(
        &self,
        first: &PlaneMeasurement,
        second: &PlaneMeasurement,
        index: usize,
        degenerate: &mut Vec<usize>,
    ) -> Point2<f64> {
        match intersect_walls(first, second, &self.cfg) {
            Ok(p) => p,
            Err(err) => {
                warn!(index, %err, "degenerate corner, using wall reference point");
                degenerate.push(index);
                second.reference_point()
            }
        }
    }
}

/// One-shot `PlanBuilder::build`.
#[inline]
pub fn build_plan(measurements: &[PlaneMeasurement], closed: bool, cfg: &PlanCfg) -> FloorPlan {
    PlanBuilder::new(*cfg).build(measurements, closed)
}
