//! Route selection: pick one lateral position per cross-section.
//!
//! This module defines the [`RouteStrategy`] trait for pluggable
//! selection strategies and the [`RouteStrategyKind`] enum for runtime
//! selection. Two strategies ship:
//!
//! - [`GraphShortestPath`](RouteStrategyKind::GraphShortestPath) builds
//!   the layered path graph and finds the cheapest closed cycle through
//!   it, trying every layer-0 node as the start.
//! - [`CurvatureBlend`](RouteStrategyKind::CurvatureBlend) skips the
//!   graph entirely and blends each section between its boundaries
//!   according to normalized centerline curvature.

use std::collections::HashMap;

use petgraph::algo::dijkstra;
use petgraph::graph::{DiGraph, NodeIndex};
use serde::{Deserialize, Serialize};

use apexline_geom::{Point, Track};

use crate::cross_section::CrossSection;
use crate::graph::PathGraph;
use crate::types::{PlannerConfig, PlannerError};

/// Relative tolerance for treating two cycle costs as tied.
const COST_TIE_TOLERANCE: f64 = 1e-9;

/// Absolute tolerance for cost-difference path reconstruction.
const RECONSTRUCT_EPS: f64 = 1e-10;

/// Below this spread the sampled curvature range is considered uniform
/// and blending falls back to the track midline.
const CURVATURE_RANGE_EPS: f64 = 1e-12;

/// Selects which route selection strategy to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RouteStrategyKind {
    /// Shortest closed cycle through the layered path graph.
    ///
    /// Exhaustive over starting nodes: each of the `M` layer-0 nodes is
    /// tried as a start, and the cheapest resulting cycle wins. Cost
    /// ties within a relative tolerance are broken by shorter physical
    /// length, then by lower starting node index.
    GraphShortestPath,

    /// Blend each cross-section between its boundaries by normalized
    /// centerline curvature.
    ///
    /// Straight sections sit at the right boundary (`t = 0`), the
    /// sharpest left-hand sections at the left boundary (`t = 1`), and
    /// everything else interpolates linearly in between. No graph is
    /// built, so this runs in `O(N)`.
    #[default]
    CurvatureBlend,
}

/// The outcome of route selection: one point per segment plus counts
/// for diagnostics.
#[derive(Debug, Clone)]
pub struct RouteSelection {
    /// Selected positions, one per segment, in segment order.
    pub points: Vec<Point>,
    /// Total cost of the selected cycle (graph strategy only).
    pub total_cost: Option<f64>,
    /// Nodes in the path graph (zero for the blend strategy).
    pub graph_nodes: usize,
    /// Edges in the path graph (zero for the blend strategy).
    pub graph_edges: usize,
}

/// Trait for route selection strategies.
///
/// Input: the track and its cross-sections. Output: one selected point
/// per cross-section, in order.
pub trait RouteStrategy {
    /// Select one lateral position per cross-section.
    ///
    /// # Errors
    ///
    /// Returns [`PlannerError::EmptyGraph`] when `sections` is empty
    /// and strategy-specific errors otherwise.
    fn select(
        &self,
        track: &Track,
        sections: &[CrossSection],
        config: &PlannerConfig,
    ) -> Result<RouteSelection, PlannerError>;
}

impl RouteStrategy for RouteStrategyKind {
    fn select(
        &self,
        track: &Track,
        sections: &[CrossSection],
        config: &PlannerConfig,
    ) -> Result<RouteSelection, PlannerError> {
        if sections.is_empty() {
            return Err(PlannerError::EmptyGraph);
        }
        match *self {
            Self::GraphShortestPath => select_graph_shortest_path(track, sections, config),
            Self::CurvatureBlend => select_curvature_blend(track, sections, config),
        }
    }
}

// ---------------------------------------------------------------------------
// Graph shortest-path strategy
// ---------------------------------------------------------------------------

/// Find the cheapest cycle (closed track) or path (open track) through
/// the layered graph.
fn select_graph_shortest_path(
    track: &Track,
    sections: &[CrossSection],
    config: &PlannerConfig,
) -> Result<RouteSelection, PlannerError> {
    let path_graph = PathGraph::build(track, sections, config)?;
    let n = path_graph.layer_count();
    let m = path_graph.nodes_per_layer();

    // Unroll the cyclic graph into a DAG: closed tracks get an extra
    // layer duplicating layer 0 so a cycle becomes a start-to-duplicate
    // path; open tracks are already a DAG.
    let unrolled_layers = if path_graph.is_cyclic() { n + 1 } else { n };
    let digraph = build_unrolled(&path_graph, unrolled_layers);
    let last_layer = unrolled_layers - 1;

    let mut best: Option<Candidate> = None;
    for start_lateral in 0..m {
        let start = node_index(0, start_lateral, m);
        let candidate = if path_graph.is_cyclic() {
            let target = node_index(last_layer, start_lateral, m);
            // Collect into a std map; petgraph's dijkstra returns its
            // own hashbrown map type.
            let costs: HashMap<NodeIndex, f64> = dijkstra(&digraph, start, Some(target), |e| {
                *e.weight()
            })
            .into_iter()
            .collect();
            let Some(&cost) = costs.get(&target) else {
                continue;
            };
            let mut laterals = reconstruct(&digraph, &costs, m, start, target)?;
            // Drop the duplicate of the start node at the unrolled end.
            laterals.truncate(n);
            Candidate::new(&path_graph, cost, laterals)
        } else {
            let costs: HashMap<NodeIndex, f64> = dijkstra(&digraph, start, None, |e| *e.weight())
                .into_iter()
                .collect();
            let Some((end, cost)) = cheapest_end(&costs, last_layer, m) else {
                continue;
            };
            let laterals = reconstruct(&digraph, &costs, m, start, end)?;
            Candidate::new(&path_graph, cost, laterals)
        };

        // Ascending start order makes the lower start index win ties.
        let replace = match &best {
            None => true,
            Some(current) => candidate.beats(current),
        };
        if replace {
            best = Some(candidate);
        }
    }

    let Some(winner) = best else {
        return Err(PlannerError::RouteSearch(
            "no starting node yields a complete route".to_owned(),
        ));
    };

    let points = winner
        .laterals
        .iter()
        .enumerate()
        .map(|(segment, &lateral)| path_graph.position(segment, lateral))
        .collect();
    Ok(RouteSelection {
        points,
        total_cost: Some(winner.cost),
        graph_nodes: path_graph.node_count(),
        graph_edges: path_graph.edge_count(),
    })
}

/// One complete route found from a single starting node.
struct Candidate {
    cost: f64,
    length: f64,
    laterals: Vec<usize>,
}

impl Candidate {
    fn new(path_graph: &PathGraph, cost: f64, laterals: Vec<usize>) -> Self {
        // Physical length of the route, including the wrap edge on
        // closed tracks.
        let positions: Vec<Point> = laterals
            .iter()
            .enumerate()
            .map(|(segment, &lateral)| path_graph.position(segment, lateral))
            .collect();
        let mut length = 0.0;
        for pair in positions.windows(2) {
            length += pair[0].distance(pair[1]);
        }
        if path_graph.is_cyclic()
            && let (Some(first), Some(last)) = (positions.first(), positions.last())
        {
            length += last.distance(*first);
        }
        Self {
            cost,
            length,
            laterals,
        }
    }

    /// Whether this candidate should replace `current`: strictly
    /// cheaper, or tied in cost but physically shorter.
    fn beats(&self, current: &Self) -> bool {
        let tolerance = COST_TIE_TOLERANCE * current.cost.abs().max(1.0);
        if self.cost < current.cost - tolerance {
            return true;
        }
        if self.cost > current.cost + tolerance {
            return false;
        }
        self.length + tolerance < current.length
    }
}

/// Node index of `(layer, lateral)` in the unrolled graph.
///
/// Nodes are added layer-major, so petgraph's insertion-order indices
/// line up with this arithmetic.
fn node_index(layer: usize, lateral: usize, nodes_per_layer: usize) -> NodeIndex {
    NodeIndex::new(layer * nodes_per_layer + lateral)
}

/// Build the unrolled layered DAG with edge weights from the path
/// graph's cost function.
fn build_unrolled(path_graph: &PathGraph, unrolled_layers: usize) -> DiGraph<(), f64> {
    let m = path_graph.nodes_per_layer();
    let node_count = unrolled_layers * m;
    let edge_count = (unrolled_layers - 1) * m * m;
    let mut digraph = DiGraph::with_capacity(node_count, edge_count);
    for _ in 0..node_count {
        digraph.add_node(());
    }
    for layer in 0..unrolled_layers - 1 {
        for from in 0..m {
            for to in 0..m {
                digraph.add_edge(
                    node_index(layer, from, m),
                    node_index(layer + 1, to, m),
                    path_graph.edge_cost((layer, from), to),
                );
            }
        }
    }
    digraph
}

/// Cheapest reachable node in the final layer, if any.
fn cheapest_end(
    costs: &HashMap<NodeIndex, f64>,
    last_layer: usize,
    nodes_per_layer: usize,
) -> Option<(NodeIndex, f64)> {
    let mut best: Option<(NodeIndex, f64)> = None;
    for lateral in 0..nodes_per_layer {
        let node = node_index(last_layer, lateral, nodes_per_layer);
        if let Some(&cost) = costs.get(&node)
            && best.is_none_or(|(_, best_cost)| cost < best_cost)
        {
            best = Some((node, cost));
        }
    }
    best
}

/// Reconstruct the lateral index sequence of the shortest path from
/// `start` to `end` by walking the Dijkstra cost map backward: the
/// predecessor of a node is the previous-layer node whose cost plus
/// the connecting edge weight equals the node's own cost.
fn reconstruct(
    digraph: &DiGraph<(), f64>,
    costs: &HashMap<NodeIndex, f64>,
    nodes_per_layer: usize,
    start: NodeIndex,
    end: NodeIndex,
) -> Result<Vec<usize>, PlannerError> {
    let mut laterals = vec![end.index() % nodes_per_layer];
    let mut current = end;
    while current != start {
        let layer = current.index() / nodes_per_layer;
        if layer == 0 {
            return Err(PlannerError::RouteSearch(format!(
                "reconstruction reached layer 0 at node {current:?} without meeting the start",
            )));
        }
        let Some(&current_cost) = costs.get(&current) else {
            return Err(PlannerError::RouteSearch(format!(
                "node {current:?} on the reconstructed path has no recorded cost",
            )));
        };

        let mut predecessor = None;
        for lateral in 0..nodes_per_layer {
            let candidate = node_index(layer - 1, lateral, nodes_per_layer);
            let Some(&candidate_cost) = costs.get(&candidate) else {
                continue;
            };
            let Some(edge) = digraph.find_edge(candidate, current) else {
                continue;
            };
            let Some(&weight) = digraph.edge_weight(edge) else {
                continue;
            };
            if (candidate_cost + weight - current_cost).abs() < RECONSTRUCT_EPS {
                predecessor = Some((candidate, lateral));
                break;
            }
        }

        let Some((candidate, lateral)) = predecessor else {
            return Err(PlannerError::RouteSearch(format!(
                "reconstruction stalled at node {current:?} (start={start:?}, end={end:?})",
            )));
        };
        laterals.push(lateral);
        current = candidate;
    }
    laterals.reverse();
    Ok(laterals)
}

// ---------------------------------------------------------------------------
// Curvature blend strategy
// ---------------------------------------------------------------------------

/// Blend each section between its boundaries by normalized curvature.
fn select_curvature_blend(
    track: &Track,
    sections: &[CrossSection],
    config: &PlannerConfig,
) -> Result<RouteSelection, PlannerError> {
    let curvatures: Vec<f64> = sections
        .iter()
        .map(|section| track.center().curvature_at(section.center_index()))
        .collect();

    let range = match config.curvature_clamp_range {
        Some(range) => Some(range),
        None => auto_curvature_range(&curvatures),
    };

    let points = sections
        .iter()
        .zip(&curvatures)
        .map(|(section, &curvature)| {
            let alpha = range.map_or(0.5, |(lo, hi)| {
                ((curvature - lo) / (hi - lo)).clamp(0.0, 1.0)
            });
            section.right().lerp(section.left(), alpha)
        })
        .collect();

    Ok(RouteSelection {
        points,
        total_cost: None,
        graph_nodes: 0,
        graph_edges: 0,
    })
}

/// Derive the normalization range from the sampled curvatures.
///
/// Returns `None` when the spread is too small to normalize over, which
/// the caller treats as "blend to the midline everywhere".
fn auto_curvature_range(curvatures: &[f64]) -> Option<(f64, f64)> {
    let mut lo = f64::INFINITY;
    let mut hi = f64::NEG_INFINITY;
    for &curvature in curvatures {
        lo = lo.min(curvature);
        hi = hi.max(curvature);
    }
    if (hi - lo).abs() <= CURVATURE_RANGE_EPS {
        None
    } else {
        Some((lo, hi))
    }
}
