//! Immutable floor-plan polygon.

use nalgebra::{Point2, Vector2};

/// Ordered room corners in walk order, plus derived measures.
///
/// Invariants:
/// - Never mutated after construction; a rebuild yields a new value.
/// - Corners are finite. Degenerate corners carry a substitute point, never NaN.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FloorPlan {
    corners: Vec<Point2<f64>>,
    closed: bool,
    degenerate: Vec<usize>,
}

impl FloorPlan {
    /// Plan without corners.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Plan from explicit corners (no degenerate entries).
    pub fn from_corners(corners: Vec<Point2<f64>>, closed: bool) -> Self {
        Self::with_degenerate(corners, closed, Vec::new())
    }

    pub(crate) fn with_degenerate(
        corners: Vec<Point2<f64>>,
        closed: bool,
        mut degenerate: Vec<usize>,
    ) -> Self {
        degenerate.sort_unstable();
        degenerate.dedup();
        Self {
            corners,
            closed,
            degenerate,
        }
    }

    #[inline]
    pub fn corners(&self) -> &[Point2<f64>] {
        &self.corners
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.corners.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.corners.is_empty()
    }

    /// Whether the plan includes the edge from the last corner back to the first.
    #[inline]
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Sorted indices of corners that fell back to a wall reference point because the
    /// two walls meeting there were parallel.
    #[inline]
    pub fn degenerate_corners(&self) -> &[usize] {
        &self.degenerate
    }

    /// Length of each edge in corner order; a closed plan ends with the closing edge.
    pub fn edge_lengths(&self) -> Vec<f64> {
        let n = self.corners.len();
        if n < 2 {
            return Vec::new();
        }
        let mut out: Vec<f64> = self
            .corners
            .windows(2)
            .map(|w| (w[1] - w[0]).norm())
            .collect();
        if self.closed {
            out.push((self.corners[0] - self.corners[n - 1]).norm());
        }
        out
    }

    pub fn perimeter(&self) -> f64 {
        self.edge_lengths().iter().sum()
    }

    /// Enclosed floor area (shoelace). Zero for open plans and fewer than 3 corners.
    pub fn area(&self) -> f64 {
        let n = self.corners.len();
        if !self.closed || n < 3 {
            return 0.0;
        }
        let twice: f64 = (0..n)
            .map(|k| {
                let p = self.corners[k];
                let q = self.corners[(k + 1) % n];
                p.x * q.y - p.y * q.x
            })
            .sum();
        0.5 * twice.abs()
    }

    pub fn bounding_box(&self) -> Option<Aabb2> {
        let first = *self.corners.first()?;
        let mut bounds = Aabb2 {
            min: first,
            max: first,
        };
        for p in &self.corners[1..] {
            bounds.min = bounds.min.inf(p);
            bounds.max = bounds.max.sup(p);
        }
        Some(bounds)
    }

    /// Mean of the corners.
    pub fn centroid(&self) -> Option<Point2<f64>> {
        if self.corners.is_empty() {
            return None;
        }
        let sum = self
            .corners
            .iter()
            .fold(Vector2::zeros(), |acc, p| acc + p.coords);
        Some(Point2::from(sum / self.corners.len() as f64))
    }
}

/// Axis-aligned floor rectangle; `y` is the map Z axis.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb2 {
    pub min: Point2<f64>,
    pub max: Point2<f64>,
}

impl Aabb2 {
    /// Extent along map X.
    #[inline]
    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }
    /// Extent along map Z.
    #[inline]
    pub fn depth(&self) -> f64 {
        self.max.y - self.min.y
    }
    #[inline]
    pub fn center(&self) -> Point2<f64> {
        nalgebra::center(&self.min, &self.max)
    }
}
