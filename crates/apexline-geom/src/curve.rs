//! Sampled 2D curves: index lookup, closest-point projection, and
//! discrete curvature.
//!
//! A [`SampledCurve`] is an ordered set of samples along a continuous
//! curve, either open or closed (the last sample connects back to the
//! first). Closest-point queries run against an R\*-tree of the curve's
//! segments so repeated projections stay cheap even on densely sampled
//! curves.

use geo::{Closest, ClosestPoint, Line};
use rstar::RTree;
use rstar::primitives::GeomWithData;

use crate::spline;
use crate::types::{GeomError, Point};

/// Denominator floor below which discrete curvature is reported as zero.
const CURVATURE_DENOM_EPS: f64 = 1e-12;

/// Convert a curve `Point` to a `geo::Coord`.
const fn point_to_coord(p: Point) -> geo::Coord<f64> {
    geo::Coord { x: p.x, y: p.y }
}

/// Convert a `geo::Coord` back to a curve `Point`.
const fn coord_to_point(c: geo::Coord<f64>) -> Point {
    Point::new(c.x, c.y)
}

/// A `geo::Line` tagged with its segment index, suitable for R\*-tree
/// insertion.
type IndexedSegment = GeomWithData<Line<f64>, usize>;

/// Find the closest point on a `geo::Line` to a query `geo::Point`,
/// returning the `geo::Coord` of that point.
fn closest_coord_on_line(line: &Line<f64>, query: &geo::Point<f64>) -> geo::Coord<f64> {
    match line.closest_point(query) {
        Closest::Intersection(p) | Closest::SinglePoint(p) => p.into(),
        Closest::Indeterminate => line.start,
    }
}

/// A sampled 2D curve, open or closed.
#[derive(Debug, Clone)]
pub struct SampledCurve {
    points: Vec<Point>,
    closed: bool,
    segments: RTree<IndexedSegment>,
}

impl PartialEq for SampledCurve {
    fn eq(&self, other: &Self) -> bool {
        self.closed == other.closed && self.points == other.points
    }
}

impl SampledCurve {
    /// Create a curve from its samples.
    ///
    /// A closed curve gains an implicit segment from the last sample back
    /// to the first (when it has at least three samples).
    #[must_use]
    pub fn new(points: Vec<Point>, closed: bool) -> Self {
        let segments = build_segment_tree(&points, closed);
        Self {
            points,
            closed,
            segments,
        }
    }

    /// Number of samples on the curve.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.points.len()
    }

    /// Returns `true` if the curve has no samples.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Returns `true` if the curve loops back on itself.
    #[must_use]
    pub const fn is_closed(&self) -> bool {
        self.closed
    }

    /// Returns a slice of all samples.
    #[must_use]
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// The sample at `index`.
    ///
    /// Closed curves wrap the index; open curves require `index < len()`.
    #[must_use]
    pub fn point_at(&self, index: usize) -> Point {
        if self.closed {
            self.points[index % self.points.len()]
        } else {
            self.points[index]
        }
    }

    /// Project `query` onto the curve, returning the closest point on
    /// any of its segments.
    ///
    /// # Errors
    ///
    /// Returns [`GeomError::NoProjection`] when the curve has no
    /// segments (fewer than two samples).
    pub fn closest_point(&self, query: Point) -> Result<Point, GeomError> {
        let q = geo::Point::new(query.x, query.y);
        let nearest = self
            .segments
            .nearest_neighbor(&q)
            .ok_or(GeomError::NoProjection)?;
        Ok(coord_to_point(closest_coord_on_line(nearest.geom(), &q)))
    }

    /// Signed discrete curvature at `index`.
    ///
    /// Uses the Menger curvature of the sample and its two neighbours
    /// (the inverse radius of their circumscribed circle), signed by
    /// turn direction: positive for counter-clockwise. Closed curves
    /// wrap the neighbour lookup; open curves clamp it, so the two
    /// endpoint samples report the curvature of the nearest interior
    /// triple. Curves with fewer than three samples have zero curvature
    /// everywhere.
    #[must_use]
    pub fn curvature_at(&self, index: usize) -> f64 {
        let n = self.points.len();
        if n < 3 {
            return 0.0;
        }
        let (a, b, c) = if self.closed {
            let i = index % n;
            ((i + n - 1) % n, i, (i + 1) % n)
        } else {
            let i = index.clamp(1, n - 2);
            (i - 1, i, i + 1)
        };
        menger_curvature(self.points[a], self.points[b], self.points[c])
    }

    /// Signed discrete curvature at every sample index.
    #[must_use]
    pub fn curvatures(&self) -> Vec<f64> {
        (0..self.points.len()).map(|i| self.curvature_at(i)).collect()
    }

    /// Fit a smooth closed curve through `control` points, resampled to
    /// `num_samples` evenly spaced (by chord length) samples.
    ///
    /// # Errors
    ///
    /// Returns [`GeomError::DegenerateInput`] when fewer than three
    /// control points or zero samples are requested.
    pub fn fit_closed(control: &[Point], num_samples: usize) -> Result<Self, GeomError> {
        Ok(Self::new(spline::resample(control, num_samples, true)?, true))
    }

    /// Fit a smooth open curve through `control` points, resampled to
    /// `num_samples` evenly spaced (by chord length) samples.
    ///
    /// # Errors
    ///
    /// Returns [`GeomError::DegenerateInput`] when fewer than three
    /// control points or fewer than two samples are requested.
    pub fn fit_open(control: &[Point], num_samples: usize) -> Result<Self, GeomError> {
        Ok(Self::new(spline::resample(control, num_samples, false)?, false))
    }
}

/// Build the R\*-tree of curve segments (with wrap segment for closed
/// curves of three or more samples).
fn build_segment_tree(points: &[Point], closed: bool) -> RTree<IndexedSegment> {
    let n = points.len();
    let mut segments: Vec<IndexedSegment> = (0..n.saturating_sub(1))
        .map(|i| {
            GeomWithData::new(
                Line::new(point_to_coord(points[i]), point_to_coord(points[i + 1])),
                i,
            )
        })
        .collect();
    if closed && n >= 3 {
        segments.push(GeomWithData::new(
            Line::new(point_to_coord(points[n - 1]), point_to_coord(points[0])),
            n - 1,
        ));
    }
    RTree::bulk_load(segments)
}

/// Signed Menger curvature of the triple `(a, b, c)`: twice the signed
/// triangle area divided by the product of the three side lengths.
fn menger_curvature(a: Point, b: Point, c: Point) -> f64 {
    let cross = (b.x - a.x).mul_add(c.y - a.y, -((b.y - a.y) * (c.x - a.x)));
    let denom = a.distance(b) * b.distance(c) * c.distance(a);
    if denom < CURVATURE_DENOM_EPS {
        0.0
    } else {
        2.0 * cross / denom
    }
}
