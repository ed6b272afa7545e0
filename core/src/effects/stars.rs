use super::{alternating_delta, Effect, EffectContext};
use crate::decay::DecayTable;
use crate::types::{Direction, NodeId, Weight};

/// Which degree an alternating-k-star effect is keyed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StarKind {
    /// `z = λ Σ_v [1 - (1-1/λ)^indeg(v)]`. Toggling `i -> j` only moves
    /// `indeg(j)`.
    In,
    /// `z = λ Σ_v [1 - (1-1/λ)^outdeg(v)]`. Toggling `i -> j` only moves
    /// `outdeg(i)`.
    Out,
    /// `z = λ Σ_v [1 - (1-1/λ)^deg(v)]` over an undirected graph. Toggling an
    /// edge moves the degree of both endpoints, so both contribute.
    Undirected,
}

/// The alternating-k-star family (§3, §4.3): a geometrically decaying sum
/// over per-node degree, parameterised by λ. `AltInStars`/`AltOutStars` on
/// directed graphs, plain `AltStars` on undirected graphs.
#[derive(Debug, Clone)]
pub struct AltKStarsEffect {
    name: String,
    kind: StarKind,
    decay: DecayTable,
}

impl AltKStarsEffect {
    pub fn new(name: impl Into<String>, kind: StarKind, decay: DecayTable) -> Self {
        Self {
            name: name.into(),
            kind,
            decay,
        }
    }

    fn term(&self, d: u64) -> Weight {
        self.decay.lambda() * (1.0 - self.decay.power(d))
    }
}

impl Effect for AltKStarsEffect {
    fn name(&self) -> &str {
        &self.name
    }

    fn delta(&self, ctx: &EffectContext, i: NodeId, j: NodeId) -> Weight {
        let inserting = !ctx.graph.has_edge(i, j);
        match self.kind {
            StarKind::In => {
                let before = ctx.graph.degree(j, Direction::In);
                alternating_delta(&self.decay, before, inserting)
            }
            StarKind::Out => {
                let before = ctx.graph.degree(i, Direction::Out);
                alternating_delta(&self.decay, before, inserting)
            }
            StarKind::Undirected => {
                let before_i = ctx.graph.degree(i, Direction::Out);
                let before_j = ctx.graph.degree(j, Direction::Out);
                alternating_delta(&self.decay, before_i, inserting)
                    + alternating_delta(&self.decay, before_j, inserting)
            }
        }
    }

    fn direct(&self, ctx: &EffectContext) -> Weight {
        let direction = match self.kind {
            StarKind::In => Direction::In,
            StarKind::Out | StarKind::Undirected => Direction::Out,
        };
        (0..ctx.graph.number_of_nodes())
            .map(|v| self.term(ctx.graph.degree(v, direction)))
            .sum()
    }
}
