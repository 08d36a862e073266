//! Racing-line fitting: turn the selected route points into a smooth,
//! densely sampled curve.

use apexline_geom::{Point, SampledCurve};

use crate::types::PlannerError;

/// Fit the selected route points into a smooth racing line with
/// `output_samples` points.
///
/// Fewer than three route points cannot support a spline, so they are
/// returned as-is in a curve of their own (a single point or a straight
/// segment).
///
/// # Errors
///
/// Returns [`PlannerError::Geom`] when the spline resampling rejects
/// the input, for example an `output_samples` below the minimum for an
/// open curve.
pub fn fit_racing_line(
    points: &[Point],
    closed: bool,
    output_samples: usize,
) -> Result<SampledCurve, PlannerError> {
    if points.len() < 3 {
        return Ok(SampledCurve::new(points.to_vec(), closed));
    }
    let curve = if closed {
        SampledCurve::fit_closed(points, output_samples)?
    } else {
        SampledCurve::fit_open(points, output_samples)?
    };
    Ok(curve)
}
