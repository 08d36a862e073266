//! Cross-section construction: perpendicular track slices at evenly
//! spaced longitudinal positions.
//!
//! For each segment index `i` the builder picks the centerline sample
//! at `floor(i * center_len / segment_count)` and projects it onto the
//! left and right boundary curves, yielding the bounded lateral
//! interval the later stages discretize.

use apexline_geom::{Point, Track};

use crate::types::PlannerError;

/// Cross-sections narrower than this are treated as collapsed.
const MIN_SECTION_WIDTH: f64 = 1e-9;

/// One perpendicular slice of the track.
///
/// Immutable once built; consumed by the lateral sampler and the graph
/// builder, then discarded.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CrossSection {
    segment: usize,
    center_index: usize,
    left: Point,
    right: Point,
}

impl CrossSection {
    /// Longitudinal segment index this section belongs to.
    #[must_use]
    pub const fn segment(&self) -> usize {
        self.segment
    }

    /// Index of the centerline sample this section was built from.
    #[must_use]
    pub const fn center_index(&self) -> usize {
        self.center_index
    }

    /// Point on the left boundary.
    #[must_use]
    pub const fn left(&self) -> Point {
        self.left
    }

    /// Point on the right boundary.
    #[must_use]
    pub const fn right(&self) -> Point {
        self.right
    }

    /// Vector from the right boundary point to the left boundary point.
    #[must_use]
    pub fn lateral_vector(&self) -> Point {
        Point::new(self.left.x - self.right.x, self.left.y - self.right.y)
    }

    /// Local track width at this section.
    #[must_use]
    pub fn width(&self) -> f64 {
        self.left.distance(self.right)
    }
}

/// Centerline sample index for segment `i` of `segment_count`.
pub(crate) const fn center_index(center_len: usize, segment_count: usize, i: usize) -> usize {
    i * center_len / segment_count
}

/// Build one cross-section per segment.
///
/// # Errors
///
/// Returns [`PlannerError::InvalidSegmentCount`] when `segment_count`
/// is zero, and [`PlannerError::DegenerateTrack`] when a boundary
/// projection fails or a section's width collapses below tolerance.
pub fn build_cross_sections(
    track: &Track,
    segment_count: usize,
) -> Result<Vec<CrossSection>, PlannerError> {
    if segment_count < 1 {
        return Err(PlannerError::InvalidSegmentCount { got: segment_count });
    }

    let center_len = track.center().len();
    let mut sections = Vec::with_capacity(segment_count);
    for i in 0..segment_count {
        let index = center_index(center_len, segment_count, i);
        let center_point = track.center().point_at(index);

        let left = project(i, center_point, track.left())?;
        let right = project(i, center_point, track.right())?;

        if left.distance(right) < MIN_SECTION_WIDTH {
            return Err(PlannerError::DegenerateTrack {
                segment: i,
                reason: "track width collapsed to zero".to_owned(),
            });
        }

        sections.push(CrossSection {
            segment: i,
            center_index: index,
            left,
            right,
        });
    }
    Ok(sections)
}

/// Project a centerline point onto one boundary curve.
fn project(
    segment: usize,
    center_point: Point,
    boundary: &apexline_geom::SampledCurve,
) -> Result<Point, PlannerError> {
    boundary
        .closest_point(center_point)
        .map_err(|source| PlannerError::DegenerateTrack {
            segment,
            reason: format!("boundary projection failed: {source}"),
        })
}
