//! Layered cyclic path graph over the lateral node candidates.
//!
//! The graph is stored as a position arena indexed by
//! `(segment, lateral)` — no adjacency lists and no per-node edge
//! storage. Every node in layer `i` implicitly connects to every node
//! in layer `i + 1 mod N`, and edge costs are evaluated on demand from
//! the endpoint positions and the destination layer's centerline
//! curvature. This keeps the structure flat and cycle-free while still
//! describing `N · M²` directed edges.

use apexline_geom::{Point, Track};

use crate::cross_section::{self, CrossSection};
use crate::lateral;
use crate::types::{PlannerConfig, PlannerError};

/// Layered cyclic directed graph of candidate racing-line positions.
#[derive(Debug, Clone)]
pub struct PathGraph {
    /// Node positions, layer-major: `positions[segment * M + lateral]`.
    pub(crate) positions: Vec<Point>,
    /// Centerline curvature at each layer's longitudinal position.
    pub(crate) curvature: Vec<f64>,
    /// Number of layers (`N`, the segment count).
    pub(crate) layers: usize,
    /// Nodes per layer (`M`).
    pub(crate) nodes_per_layer: usize,
    /// Curvature penalty weight applied to edge costs.
    pub(crate) penalty_weight: f64,
    /// Whether layer `N - 1` connects back to layer 0.
    pub(crate) cyclic: bool,
}

impl PathGraph {
    /// Build the graph from pre-built cross-sections.
    ///
    /// Construction is deterministic in `(track, sections, config)`.
    ///
    /// # Errors
    ///
    /// Returns [`PlannerError::EmptyGraph`] when `sections` is empty
    /// and [`PlannerError::InvalidSampleCount`] when the configured
    /// lateral resolution is below 2.
    pub fn build(
        track: &Track,
        sections: &[CrossSection],
        config: &PlannerConfig,
    ) -> Result<Self, PlannerError> {
        if sections.is_empty() {
            return Err(PlannerError::EmptyGraph);
        }
        let m = config.nodes_per_segment;
        let mut positions = Vec::with_capacity(sections.len() * m);
        let mut curvature = Vec::with_capacity(sections.len());
        for section in sections {
            positions.extend(lateral::sample_nodes(section, m)?);
            curvature.push(track.center().curvature_at(section.center_index()));
        }
        Ok(Self {
            positions,
            curvature,
            layers: sections.len(),
            nodes_per_layer: m,
            penalty_weight: config.curvature_penalty_weight,
            cyclic: track.center().is_closed(),
        })
    }

    /// Number of layers (`N`).
    #[must_use]
    pub const fn layer_count(&self) -> usize {
        self.layers
    }

    /// Nodes per layer (`M`).
    #[must_use]
    pub const fn nodes_per_layer(&self) -> usize {
        self.nodes_per_layer
    }

    /// Total node count, `N · M`.
    #[must_use]
    pub const fn node_count(&self) -> usize {
        self.layers * self.nodes_per_layer
    }

    /// Total directed edge count: `N · M²` cyclic, `(N − 1) · M²` open.
    #[must_use]
    pub const fn edge_count(&self) -> usize {
        let m2 = self.nodes_per_layer * self.nodes_per_layer;
        if self.cyclic {
            self.layers * m2
        } else {
            self.layers.saturating_sub(1) * m2
        }
    }

    /// Whether the final layer connects back to layer 0.
    #[must_use]
    pub const fn is_cyclic(&self) -> bool {
        self.cyclic
    }

    /// Position of node `(segment, lateral)`.
    #[must_use]
    pub fn position(&self, segment: usize, lateral: usize) -> Point {
        self.positions[segment * self.nodes_per_layer + lateral]
    }

    /// Centerline curvature at `segment`'s longitudinal position.
    #[must_use]
    pub fn layer_curvature(&self, segment: usize) -> f64 {
        self.curvature[segment]
    }

    /// Cost of the directed edge from node `(segment, lateral)` in
    /// layer `segment` to node `to_lateral` in the next layer
    /// (`segment + 1 mod N`): Euclidean distance scaled by
    /// `1 + weight · |curvature(destination layer)|`.
    #[must_use]
    pub fn edge_cost(&self, from: (usize, usize), to_lateral: usize) -> f64 {
        let dest_layer = (from.0 + 1) % self.layers;
        let a = self.position(from.0, from.1);
        let b = self.position(dest_layer, to_lateral);
        let penalty = self
            .penalty_weight
            .mul_add(self.curvature[dest_layer].abs(), 1.0);
        a.distance(b) * penalty
    }
}

/// Build cross-sections and the graph in one step.
///
/// # Errors
///
/// Propagates cross-section and sampling failures; see
/// [`cross_section::build_cross_sections`] and [`PathGraph::build`].
pub fn build_path_graph(track: &Track, config: &PlannerConfig) -> Result<PathGraph, PlannerError> {
    let sections = cross_section::build_cross_sections(track, config.segment_count)?;
    PathGraph::build(track, &sections, config)
}
