//! Dyad-proposal helpers shared by all three samplers (§4.4): uniform
//! random dyads respecting directedness, bipartite cross-mode constraints
//! and the `allowLoops` flag, plus rejection-sampled non-edges for TNT/IFD.

use eenet_graph::graph::{Graph, GraphShape};
use eenet_graph::NodeId;
use rand::Rng;

use super::edge_set::EdgeSet;
use crate::rng::ChainRng;

/// A uniformly random dyad respecting the graph's shape: cross-mode for
/// bipartite graphs, any ordered pair for directed graphs, any unordered
/// pair for undirected graphs, with self-pairs excluded unless
/// `allow_loops` is set.
pub fn random_pair(shape: &GraphShape, rng: &mut ChainRng) -> (NodeId, NodeId) {
    let n = shape.number_of_nodes;
    if shape.bipartite {
        let a = rng.gen_range(0..shape.mode_a_count);
        let b = rng.gen_range(shape.mode_a_count..n);
        (a, b)
    } else {
        loop {
            let i = rng.gen_range(0..n);
            let j = rng.gen_range(0..n);
            if i != j || shape.allow_loops {
                return (i, j);
            }
        }
    }
}

/// A uniformly random dyad that is currently *not* an edge, found by
/// rejection sampling over `random_pair`. Sub-quadratic in expectation for
/// any graph whose density is bounded away from 1, which every graph this
/// sampler runs on is in practice. Returns `None` only when the graph is
/// already at its maximum possible edge count.
pub fn random_non_edge(graph: &Graph, rng: &mut ChainRng) -> Option<(NodeId, NodeId)> {
    if graph.number_of_edges() >= graph.max_possible_edges() {
        return None;
    }
    loop {
        let (i, j) = random_pair(&graph.shape(), rng);
        if !graph.has_edge(i, j) {
            return Some((i, j));
        }
    }
}

/// A uniformly random existing edge, drawn in O(1) from the sampler's own
/// `EdgeSet` mirror of the graph's edge list.
pub fn random_existing_edge(edges: &EdgeSet, rng: &mut ChainRng) -> Option<(NodeId, NodeId)> {
    if edges.is_empty() {
        return None;
    }
    let index = rng.gen_range(0..edges.len());
    Some(edges.nth(index))
}
