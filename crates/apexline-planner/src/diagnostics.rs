//! Planner diagnostics: timing and counts for each planning stage.
//!
//! A [`PlanDiagnostics`] value is returned with every
//! [`plan`](crate::plan) result, replacing ad hoc progress printing
//! with structured data the caller can log, serialize, or ignore.
//!
//! Durations are serialized as fractional seconds (`f64`) for JSON
//! compatibility, since `std::time::Duration` does not implement serde
//! traits.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::route::RouteStrategyKind;

/// Serde support for `std::time::Duration` as fractional seconds.
mod duration_serde {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    /// Serialize a `Duration` as fractional seconds (`f64`).
    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        duration.as_secs_f64().serialize(serializer)
    }

    /// Deserialize a `Duration` from fractional seconds (`f64`).
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let secs = f64::deserialize(deserializer)?;
        Duration::try_from_secs_f64(secs).map_err(|_| {
            serde::de::Error::custom(
                "duration seconds must be finite, non-negative, and representable as a Duration",
            )
        })
    }
}

/// Diagnostics collected from a single planning run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanDiagnostics {
    /// Stage 1: cross-section construction.
    pub cross_sections: StageDiagnostics,
    /// Stage 2: route selection (includes graph construction for the
    /// graph strategy).
    pub route: StageDiagnostics,
    /// Stage 3: racing-line fitting.
    pub fit: StageDiagnostics,
    /// Total wall-clock duration of the run (seconds).
    #[serde(with = "duration_serde")]
    pub total_duration: Duration,
    /// Summary counts for the run.
    pub summary: PlanSummary,
}

/// Diagnostics for a single planning stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageDiagnostics {
    /// Wall-clock duration of this stage (seconds).
    #[serde(with = "duration_serde")]
    pub duration: Duration,
}

/// Summary counts across the whole run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanSummary {
    /// Number of longitudinal segments planned over.
    pub segments: usize,
    /// Strategy that selected the route.
    pub strategy: RouteStrategyKind,
    /// Nodes in the path graph (zero for the blend strategy).
    pub graph_nodes: usize,
    /// Edges in the path graph (zero for the blend strategy).
    pub graph_edges: usize,
    /// Total cost of the selected cycle (graph strategy only).
    pub total_route_cost: Option<f64>,
}
