//! Error types surfaced by the engine.
//!
//! None of these are fatal to a capture: degenerate corners and stale poses
//! are recovered locally and reported, only `SessionError` signals misuse.

use std::fmt;

use crate::session::SessionState;
use crate::tracking::PoseStatus;

/// Two adjacent walls are (near-)parallel, so their floor lines do not meet.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DegenerateIntersectionError {
    /// `x.z` of the second wall's X axis in the first wall's frame.
    pub denominator: f64,
}

impl fmt::Display for DegenerateIntersectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "walls are parallel or nearly so (x.z = {:e}); no corner between them",
            self.denominator
        )
    }
}

impl std::error::Error for DegenerateIntersectionError {}

/// The tracking service never answered with a valid pose.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct InvalidPoseError {
    pub timestamp: f64,
    /// Status of the last answer.
    pub status: PoseStatus,
    pub attempts: u32,
}

impl fmt::Display for InvalidPoseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "no valid pose at t={} after {} attempt(s), last status {:?}",
            self.timestamp, self.attempts, self.status
        )
    }
}

impl std::error::Error for InvalidPoseError {}

/// Misuse of a `ReconstructionSession`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionError {
    /// `op` is not allowed while the session is in `state`.
    InvalidState {
        op: &'static str,
        state: SessionState,
    },
    /// The session was torn down; nothing is published anymore.
    TornDown,
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::InvalidState { op, state } => {
                write!(f, "`{op}` is not allowed in session state {state:?}")
            }
            SessionError::TornDown => write!(f, "session was torn down"),
        }
    }
}

impl std::error::Error for SessionError {}
