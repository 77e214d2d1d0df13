//! Tunable tolerances and retry policy.
//!
//! Defaults are fixed constants; callers only override them for experiments
//! or when a tracking backend needs a different retry budget.

use std::time::Duration;

/// Plan-building tolerances.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlanCfg {
    /// Minimum `|x.z|` of the second wall's X axis seen from the first wall.
    /// Below this the two walls count as parallel and have no corner.
    pub eps_parallel: f64,
}

impl Default for PlanCfg {
    fn default() -> Self {
        Self { eps_parallel: 1e-3 }
    }
}

/// Per-measurement correction retry policy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CorrectionCfg {
    /// Queries per measurement before it is left stale. Values below 1 act as 1.
    pub max_attempts: u32,
    /// Sleep between two queries for the same measurement.
    pub retry_delay: Duration,
}

impl Default for CorrectionCfg {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            retry_delay: Duration::ZERO,
        }
    }
}

/// Everything a `ReconstructionSession` needs.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SessionCfg {
    pub plan: PlanCfg,
    pub correction: CorrectionCfg,
}
