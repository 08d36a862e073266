//! apexline-planner: Minimum-curvature racing line planning (sans-IO).
//!
//! Turns a bounded track into a smooth racing line through:
//! cross-section construction -> lateral sampling -> route selection
//! (pluggable strategy) -> spline fitting.
//!
//! This crate has **no I/O dependencies** -- it operates on in-memory
//! track geometry from `apexline-geom` and returns structured data
//! plus per-stage diagnostics.

use std::time::Instant;

use apexline_geom::{Polyline, Track};

pub mod cross_section;
pub mod diagnostics;
pub mod fit;
pub mod graph;
pub mod lateral;
pub mod route;
pub mod types;

pub use diagnostics::{PlanDiagnostics, PlanSummary, StageDiagnostics};
pub use graph::PathGraph;
pub use route::{RouteSelection, RouteStrategy, RouteStrategyKind};
pub use types::{PlanResult, PlannerConfig, PlannerError};

/// Run the full planning pipeline.
///
/// Takes a bounded track and a configuration, then produces a
/// [`PlanResult`] containing the selected route points, the fitted
/// racing line, and per-stage diagnostics.
///
/// # Pipeline steps
///
/// 1. Validate the configuration
/// 2. Build one cross-section per segment
/// 3. Select one lateral position per section (pluggable strategy)
/// 4. Fit the selected points into a smooth racing line
///
/// # Errors
///
/// Returns [`PlannerError::InvalidSegmentCount`],
/// [`PlannerError::InvalidSampleCount`], or
/// [`PlannerError::InvalidConfig`] for configuration defects;
/// [`PlannerError::DegenerateTrack`] when the track geometry cannot
/// support cross-sections; and strategy- or fitting-specific errors
/// from the later stages.
pub fn plan(track: &Track, config: &PlannerConfig) -> Result<PlanResult, PlannerError> {
    config.validate()?;
    let run_start = Instant::now();

    // 1. Cross-sections, one per segment.
    let stage_start = Instant::now();
    let sections = cross_section::build_cross_sections(track, config.segment_count)?;
    let cross_sections_stage = StageDiagnostics {
        duration: stage_start.elapsed(),
    };

    // 2. Route selection.
    let stage_start = Instant::now();
    let selection = config.strategy.select(track, &sections, config)?;
    let route_stage = StageDiagnostics {
        duration: stage_start.elapsed(),
    };

    // 3. Racing-line fitting.
    let stage_start = Instant::now();
    let closed = track.center().is_closed();
    let racing_line = fit::fit_racing_line(&selection.points, closed, config.output_samples)?;
    let fit_stage = StageDiagnostics {
        duration: stage_start.elapsed(),
    };

    let diagnostics = PlanDiagnostics {
        cross_sections: cross_sections_stage,
        route: route_stage,
        fit: fit_stage,
        total_duration: run_start.elapsed(),
        summary: PlanSummary {
            segments: sections.len(),
            strategy: config.strategy,
            graph_nodes: selection.graph_nodes,
            graph_edges: selection.graph_edges,
            total_route_cost: selection.total_cost,
        },
    };

    Ok(PlanResult {
        points: Polyline::new(selection.points),
        racing_line,
        diagnostics,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use apexline_geom::{Point, SampledCurve};

    fn circle_track() -> Track {
        #[allow(clippy::cast_precision_loss)]
        let points: Vec<Point> = (0..360)
            .map(|i| {
                let theta = std::f64::consts::TAU * f64::from(i) / 360.0;
                Point::new(10.0 * theta.cos(), 10.0 * theta.sin())
            })
            .collect();
        Track::constant_width(SampledCurve::new(points, true), 2.0).unwrap()
    }

    #[test]
    fn plan_runs_end_to_end_with_defaults() {
        let result = plan(&circle_track(), &PlannerConfig::default()).unwrap();
        assert_eq!(result.points.len(), 50);
        assert_eq!(result.racing_line.len(), 1000);
        assert!(result.racing_line.is_closed());
        assert_eq!(result.diagnostics.summary.segments, 50);
        assert_eq!(
            result.diagnostics.summary.strategy,
            RouteStrategyKind::CurvatureBlend,
        );
    }

    #[test]
    fn plan_rejects_invalid_config_before_touching_geometry() {
        let config = PlannerConfig {
            output_samples: 0,
            ..PlannerConfig::default()
        };
        assert!(matches!(
            plan(&circle_track(), &config),
            Err(PlannerError::InvalidConfig(_)),
        ));
    }

    #[test]
    fn graph_strategy_populates_route_cost() {
        let config = PlannerConfig {
            segment_count: 20,
            strategy: RouteStrategyKind::GraphShortestPath,
            ..PlannerConfig::default()
        };
        let result = plan(&circle_track(), &config).unwrap();
        assert!(result.diagnostics.summary.total_route_cost.is_some());
        assert_eq!(result.diagnostics.summary.graph_nodes, 100);
        assert_eq!(result.diagnostics.summary.graph_edges, 500);
    }

    #[test]
    fn single_segment_skips_spline_fitting() {
        let config = PlannerConfig {
            segment_count: 1,
            ..PlannerConfig::default()
        };
        let result = plan(&circle_track(), &config).unwrap();
        assert_eq!(result.points.len(), 1);
        assert_eq!(result.racing_line.len(), 1);
    }
}
