//! Lateral sampling: discretize a cross-section into evenly spaced
//! candidate node positions.

use apexline_geom::Point;

use crate::cross_section::CrossSection;
use crate::types::PlannerError;

/// Candidate node positions across `section`, evenly spaced from the
/// right boundary (`t = 0`) to the left boundary (`t = 1`).
///
/// Node `j` of `nodes_per_segment` sits at lateral parameter
/// `t = j / (nodes_per_segment - 1)`, so both boundary points are
/// always included.
///
/// # Errors
///
/// Returns [`PlannerError::InvalidSampleCount`] when
/// `nodes_per_segment < 2`; a single node would place the divisor at
/// zero.
pub fn sample_nodes(
    section: &CrossSection,
    nodes_per_segment: usize,
) -> Result<Vec<Point>, PlannerError> {
    if nodes_per_segment < 2 {
        return Err(PlannerError::InvalidSampleCount {
            got: nodes_per_segment,
        });
    }

    #[allow(clippy::cast_precision_loss)]
    let step = 1.0 / (nodes_per_segment - 1) as f64;
    Ok((0..nodes_per_segment)
        .map(|j| {
            #[allow(clippy::cast_precision_loss)]
            let t = step * j as f64;
            section.right().lerp(section.left(), t)
        })
        .collect())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use apexline_geom::{SampledCurve, Track};
    use crate::cross_section::build_cross_sections;

    fn straight_section() -> CrossSection {
        // Straight horizontal track of width 4: right boundary at y = -2,
        // left at y = +2.
        let make = |y: f64| {
            SampledCurve::new(
                (0..10).map(|i| Point::new(f64::from(i), y)).collect(),
                false,
            )
        };
        let track = Track::from_curves(make(0.0), make(2.0), make(-2.0), 4.0).unwrap();
        build_cross_sections(&track, 5).unwrap()[2]
    }

    #[test]
    fn nodes_span_right_to_left() {
        let section = straight_section();
        let nodes = sample_nodes(&section, 5).unwrap();
        assert_eq!(nodes.len(), 5);
        assert!(nodes[0].distance(section.right()) < 1e-12);
        assert!(nodes[4].distance(section.left()) < 1e-12);
    }

    #[test]
    fn nodes_are_evenly_spaced() {
        let section = straight_section();
        let nodes = sample_nodes(&section, 9).unwrap();
        let expected = section.width() / 8.0;
        for pair in nodes.windows(2) {
            assert!((pair[0].distance(pair[1]) - expected).abs() < 1e-9);
        }
    }

    #[test]
    fn middle_node_is_the_section_midpoint() {
        let section = straight_section();
        let nodes = sample_nodes(&section, 3).unwrap();
        let midpoint = section.right().lerp(section.left(), 0.5);
        assert!(nodes[1].distance(midpoint) < 1e-12);
    }

    #[test]
    fn two_nodes_are_exactly_the_boundaries() {
        let section = straight_section();
        let nodes = sample_nodes(&section, 2).unwrap();
        assert_eq!(nodes.len(), 2);
        assert!(nodes[0].distance(section.right()) < 1e-12);
        assert!(nodes[1].distance(section.left()) < 1e-12);
    }

    #[test]
    fn one_node_is_rejected_not_divided_by_zero() {
        let section = straight_section();
        assert!(matches!(
            sample_nodes(&section, 1),
            Err(PlannerError::InvalidSampleCount { got: 1 }),
        ));
    }

    #[test]
    fn zero_nodes_rejected() {
        let section = straight_section();
        assert!(matches!(
            sample_nodes(&section, 0),
            Err(PlannerError::InvalidSampleCount { got: 0 }),
        ));
    }
}
