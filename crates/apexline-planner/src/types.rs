//! Shared types for the apexline planning core.

use serde::{Deserialize, Serialize};

use apexline_geom::{GeomError, Polyline, SampledCurve};

use crate::diagnostics::PlanDiagnostics;
use crate::route::RouteStrategyKind;

/// Configuration for a planning run.
///
/// All parameters have defaults matching the planner's reference
/// behavior. Invalid combinations are rejected by [`validate`]
/// (and thus by [`plan`](crate::plan)) before any geometry work starts.
///
/// [`validate`]: Self::validate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannerConfig {
    /// Number of longitudinal segments (cross-sections) along the track.
    /// Must be at least 1.
    pub segment_count: usize,

    /// Number of lateral candidate nodes per cross-section. Must be at
    /// least 2. Only the graph strategy consumes this.
    pub nodes_per_segment: usize,

    /// Which route selection strategy to use.
    pub strategy: RouteStrategyKind,

    /// Scales the curvature term in graph edge costs:
    /// `cost = distance * (1 + weight * |curvature|)`. Zero keeps edge
    /// costs purely Euclidean. Must be finite and non-negative.
    pub curvature_penalty_weight: f64,

    /// Fixed `(min, max)` curvature range for the blend strategy's
    /// normalization. `None` derives the range from the sampled
    /// curvatures; `Some((lo, hi))` requires `hi > lo`.
    pub curvature_clamp_range: Option<(f64, f64)>,

    /// Number of samples on the fitted output racing line.
    pub output_samples: usize,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            segment_count: 50,
            nodes_per_segment: 5,
            strategy: RouteStrategyKind::default(),
            curvature_penalty_weight: 0.0,
            curvature_clamp_range: None,
            output_samples: 1000,
        }
    }
}

impl PlannerConfig {
    /// Check every invariant the planner relies on.
    ///
    /// # Errors
    ///
    /// Returns [`PlannerError::InvalidSegmentCount`],
    /// [`PlannerError::InvalidSampleCount`], or
    /// [`PlannerError::InvalidConfig`] for the first violated invariant.
    pub fn validate(&self) -> Result<(), PlannerError> {
        if self.segment_count < 1 {
            return Err(PlannerError::InvalidSegmentCount {
                got: self.segment_count,
            });
        }
        if self.nodes_per_segment < 2 {
            return Err(PlannerError::InvalidSampleCount {
                got: self.nodes_per_segment,
            });
        }
        if !self.curvature_penalty_weight.is_finite() || self.curvature_penalty_weight < 0.0 {
            return Err(PlannerError::InvalidConfig(format!(
                "curvature_penalty_weight must be finite and non-negative, got {}",
                self.curvature_penalty_weight,
            )));
        }
        if let Some((lo, hi)) = self.curvature_clamp_range {
            if !lo.is_finite() || !hi.is_finite() || hi <= lo {
                return Err(PlannerError::InvalidConfig(format!(
                    "curvature_clamp_range must satisfy lo < hi with finite bounds, got ({lo}, {hi})",
                )));
            }
        }
        if self.output_samples == 0 {
            return Err(PlannerError::InvalidConfig(
                "output_samples must be at least 1".to_owned(),
            ));
        }
        Ok(())
    }
}

/// Result of a planning run.
#[derive(Debug, Clone)]
pub struct PlanResult {
    /// One selected point per segment, in segment order (cyclic for
    /// closed tracks).
    pub points: Polyline,

    /// The selected points fitted into a smooth curve.
    pub racing_line: SampledCurve,

    /// Per-stage timings and run summary.
    pub diagnostics: PlanDiagnostics,
}

/// Errors that can occur during planning.
#[derive(Debug, thiserror::Error)]
pub enum PlannerError {
    /// A boundary projection failed or a cross-section collapsed to
    /// zero width.
    #[error("degenerate track at segment {segment}: {reason}")]
    DegenerateTrack {
        /// Longitudinal segment where the defect was detected.
        segment: usize,
        /// What went wrong.
        reason: String,
    },

    /// `segment_count` was below 1.
    #[error("segment count must be at least 1, got {got}")]
    InvalidSegmentCount {
        /// The rejected value.
        got: usize,
    },

    /// `nodes_per_segment` was below 2 (a single node cannot span a
    /// cross-section without dividing by zero).
    #[error("nodes per segment must be at least 2, got {got}")]
    InvalidSampleCount {
        /// The rejected value.
        got: usize,
    },

    /// A configuration field held an unusable value.
    #[error("invalid planner configuration: {0}")]
    InvalidConfig(String),

    /// The graph strategy was invoked on a graph with zero layers.
    #[error("path graph has no segments to route through")]
    EmptyGraph,

    /// Shortest-path reconstruction failed inside the graph strategy.
    #[error("route search failed: {0}")]
    RouteSearch(String),

    /// A curve operation failed.
    #[error(transparent)]
    Geom(#[from] GeomError),
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(PlannerConfig::default().validate().is_ok());
        let config = PlannerConfig::default();
        assert_eq!(config.segment_count, 50);
        assert_eq!(config.nodes_per_segment, 5);
        assert_eq!(config.strategy, RouteStrategyKind::CurvatureBlend);
        assert!(config.curvature_penalty_weight.abs() < f64::EPSILON);
        assert!(config.curvature_clamp_range.is_none());
        assert_eq!(config.output_samples, 1000);
    }

    #[test]
    fn zero_segments_rejected() {
        let config = PlannerConfig {
            segment_count: 0,
            ..PlannerConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(PlannerError::InvalidSegmentCount { got: 0 }),
        ));
    }

    #[test]
    fn single_node_per_segment_rejected() {
        let config = PlannerConfig {
            nodes_per_segment: 1,
            ..PlannerConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(PlannerError::InvalidSampleCount { got: 1 }),
        ));
    }

    #[test]
    fn negative_penalty_weight_rejected() {
        let config = PlannerConfig {
            curvature_penalty_weight: -1.0,
            ..PlannerConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(PlannerError::InvalidConfig(_)),
        ));
    }

    #[test]
    fn inverted_clamp_range_rejected() {
        let config = PlannerConfig {
            curvature_clamp_range: Some((0.05, -0.05)),
            ..PlannerConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(PlannerError::InvalidConfig(_)),
        ));
    }

    #[test]
    fn zero_output_samples_rejected() {
        let config = PlannerConfig {
            output_samples: 0,
            ..PlannerConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(PlannerError::InvalidConfig(_)),
        ));
    }

    #[test]
    fn config_serde_round_trip() {
        let config = PlannerConfig {
            segment_count: 30,
            nodes_per_segment: 7,
            strategy: RouteStrategyKind::GraphShortestPath,
            curvature_penalty_weight: 2.5,
            curvature_clamp_range: Some((-0.05, 0.05)),
            output_samples: 500,
        };
        let json = serde_json::to_string(&config).unwrap();
        let back: PlannerConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, back);
    }

    #[test]
    fn error_display_names_the_bad_value() {
        let err = PlannerError::InvalidSampleCount { got: 1 };
        assert_eq!(err.to_string(), "nodes per segment must be at least 2, got 1");
    }
}
