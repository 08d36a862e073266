//! Track model: a centerline with left and right boundary curves.

use crate::curve::SampledCurve;
use crate::types::{GeomError, Point};

/// Tangent magnitude floor below which a normal direction is undefined.
const TANGENT_EPS: f64 = 1e-12;

/// A drivable track: centerline plus left/right boundary curves at a
/// nominal width.
///
/// The boundaries share the centerline's closed/open topology. "Left"
/// is the side a normal rotated 90° counter-clockwise from the local
/// tangent points toward, i.e. the inside of a counter-clockwise loop's
/// left-hand turns.
#[derive(Debug, Clone, PartialEq)]
pub struct Track {
    center: SampledCurve,
    left: SampledCurve,
    right: SampledCurve,
    width: f64,
}

impl Track {
    /// Build a constant-width track around a centerline by offsetting
    /// each centerline sample by ±`width / 2` along its local normal.
    ///
    /// # Errors
    ///
    /// Returns [`GeomError::DegenerateInput`] when `width` is not a
    /// positive finite number, the centerline has fewer than three
    /// samples, or consecutive centerline samples coincide (undefined
    /// tangent).
    pub fn constant_width(center: SampledCurve, width: f64) -> Result<Self, GeomError> {
        if !width.is_finite() || width <= 0.0 {
            return Err(GeomError::DegenerateInput(format!(
                "track width must be positive and finite, got {width}",
            )));
        }
        if center.len() < 3 {
            return Err(GeomError::DegenerateInput(format!(
                "centerline needs at least 3 samples to offset, got {}",
                center.len(),
            )));
        }

        let half = width / 2.0;
        let mut left_points = Vec::with_capacity(center.len());
        let mut right_points = Vec::with_capacity(center.len());
        for i in 0..center.len() {
            let normal = unit_normal(&center, i)?;
            let p = center.point_at(i);
            left_points.push(Point::new(
                half.mul_add(normal.x, p.x),
                half.mul_add(normal.y, p.y),
            ));
            right_points.push(Point::new(
                half.mul_add(-normal.x, p.x),
                half.mul_add(-normal.y, p.y),
            ));
        }

        let closed = center.is_closed();
        Ok(Self {
            left: SampledCurve::new(left_points, closed),
            right: SampledCurve::new(right_points, closed),
            center,
            width,
        })
    }

    /// Assemble a track from pre-built boundary curves.
    ///
    /// # Errors
    ///
    /// Returns [`GeomError::DegenerateInput`] when any curve is empty,
    /// the curves disagree on closed/open topology, or `width` is not a
    /// positive finite number.
    pub fn from_curves(
        center: SampledCurve,
        left: SampledCurve,
        right: SampledCurve,
        width: f64,
    ) -> Result<Self, GeomError> {
        if !width.is_finite() || width <= 0.0 {
            return Err(GeomError::DegenerateInput(format!(
                "track width must be positive and finite, got {width}",
            )));
        }
        if center.is_empty() || left.is_empty() || right.is_empty() {
            return Err(GeomError::DegenerateInput(
                "track curves must be non-empty".to_owned(),
            ));
        }
        if left.is_closed() != center.is_closed() || right.is_closed() != center.is_closed() {
            return Err(GeomError::DegenerateInput(
                "track boundaries must share the centerline's closed/open topology".to_owned(),
            ));
        }
        Ok(Self {
            center,
            left,
            right,
            width,
        })
    }

    /// The centerline curve.
    #[must_use]
    pub const fn center(&self) -> &SampledCurve {
        &self.center
    }

    /// The left boundary curve.
    #[must_use]
    pub const fn left(&self) -> &SampledCurve {
        &self.left
    }

    /// The right boundary curve.
    #[must_use]
    pub const fn right(&self) -> &SampledCurve {
        &self.right
    }

    /// Nominal track width.
    #[must_use]
    pub const fn width(&self) -> f64 {
        self.width
    }
}

/// Unit normal at sample `i`, pointing 90° counter-clockwise from the
/// local tangent (central difference; one-sided at open-curve ends).
fn unit_normal(curve: &SampledCurve, i: usize) -> Result<Point, GeomError> {
    let n = curve.len();
    let (prev, next) = if curve.is_closed() {
        ((i + n - 1) % n, (i + 1) % n)
    } else {
        (i.saturating_sub(1), (i + 1).min(n - 1))
    };
    let a = curve.point_at(prev);
    let b = curve.point_at(next);
    let (tx, ty) = (b.x - a.x, b.y - a.y);
    let len = tx.hypot(ty);
    if len < TANGENT_EPS {
        return Err(GeomError::DegenerateInput(format!(
            "coincident centerline samples around index {i}; tangent undefined",
        )));
    }
    Ok(Point::new(-ty / len, tx / len))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn circle(radius: f64, n: usize) -> SampledCurve {
        #[allow(clippy::cast_precision_loss)]
        let points: Vec<Point> = (0..n)
            .map(|i| {
                let theta = std::f64::consts::TAU * i as f64 / n as f64;
                Point::new(radius * theta.cos(), radius * theta.sin())
            })
            .collect();
        SampledCurve::new(points, true)
    }

    #[test]
    fn constant_width_boundaries_are_offset_by_half_width() {
        let track = Track::constant_width(circle(10.0, 72), 2.0).unwrap();
        for i in 0..track.center().len() {
            let c = track.center().point_at(i);
            let l = track.left().point_at(i);
            let r = track.right().point_at(i);
            assert!((c.distance(l) - 1.0).abs() < 1e-9);
            assert!((c.distance(r) - 1.0).abs() < 1e-9);
            assert!((l.distance(r) - 2.0).abs() < 1e-9);
        }
    }

    #[test]
    fn ccw_circle_left_boundary_is_the_inner_boundary() {
        // Counter-clockwise loop: left of the direction of travel points
        // toward the circle center.
        let track = Track::constant_width(circle(10.0, 72), 2.0).unwrap();
        let origin = Point::new(0.0, 0.0);
        let l = track.left().point_at(0);
        let r = track.right().point_at(0);
        assert!(l.distance(origin) < r.distance(origin));
        assert!((l.distance(origin) - 9.0).abs() < 1e-6);
        assert!((r.distance(origin) - 11.0).abs() < 1e-6);
    }

    #[test]
    fn boundaries_inherit_closed_topology() {
        let track = Track::constant_width(circle(5.0, 36), 1.0).unwrap();
        assert!(track.left().is_closed());
        assert!(track.right().is_closed());
    }

    #[test]
    fn zero_width_is_rejected() {
        assert!(matches!(
            Track::constant_width(circle(5.0, 36), 0.0),
            Err(GeomError::DegenerateInput(_)),
        ));
    }

    #[test]
    fn coincident_samples_are_rejected() {
        // Three coincident samples in a row: the central difference at
        // the middle one has no direction.
        let points = vec![
            Point::new(0.0, 0.0),
            Point::new(0.0, 0.0),
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(1.0, 1.0),
        ];
        let center = SampledCurve::new(points, true);
        assert!(matches!(
            Track::constant_width(center, 1.0),
            Err(GeomError::DegenerateInput(_)),
        ));
    }

    #[test]
    fn from_curves_rejects_topology_mismatch() {
        let center = circle(5.0, 36);
        let left = SampledCurve::new(circle(4.0, 36).points().to_vec(), false);
        let right = circle(6.0, 36);
        assert!(matches!(
            Track::from_curves(center, left, right, 2.0),
            Err(GeomError::DegenerateInput(_)),
        ));
    }

    #[test]
    fn from_curves_accepts_matching_curves() {
        let track = Track::from_curves(circle(5.0, 36), circle(4.0, 36), circle(6.0, 36), 2.0);
        assert!(track.is_ok());
    }
}
