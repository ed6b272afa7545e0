use super::{Effect, EffectContext};
use crate::types::{NodeId, Weight};

/// The edge-count statistic: `z = number of arcs/edges`. Present in almost
/// every specification as the analogue of an intercept.
#[derive(Debug, Clone, Copy, Default)]
pub struct ArcEffect;

impl Effect for ArcEffect {
    fn name(&self) -> &str {
        "Arc"
    }

    fn delta(&self, ctx: &EffectContext, i: NodeId, j: NodeId) -> Weight {
        if ctx.graph.has_edge(i, j) {
            -1.0
        } else {
            1.0
        }
    }

    fn direct(&self, ctx: &EffectContext) -> Weight {
        ctx.graph.number_of_edges() as Weight
    }
}

/// Counts reciprocated dyads in a directed graph: `z = |{(i, j) : i -> j and
/// j -> i}|`, each mutual pair counted once (not once per direction):
/// completing a dyad's second arc moves the count by +1, not +2.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReciprocityEffect;

impl Effect for ReciprocityEffect {
    fn name(&self) -> &str {
        "Reciprocity"
    }

    fn delta(&self, ctx: &EffectContext, i: NodeId, j: NodeId) -> Weight {
        if !ctx.graph.has_edge(j, i) {
            return 0.0;
        }
        if ctx.graph.has_edge(i, j) {
            -1.0
        } else {
            1.0
        }
    }

    fn direct(&self, ctx: &EffectContext) -> Weight {
        ctx.graph
            .iter_edges()
            .filter(|&(i, j)| i < j && ctx.graph.has_edge(j, i))
            .count() as Weight
    }
}
