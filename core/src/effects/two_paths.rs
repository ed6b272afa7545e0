use super::{alternating_delta, Effect, EffectContext};
use crate::decay::DecayTable;
use crate::two_path_cache::TwoPathCache;
use crate::types::{Direction, NodeId, Weight};

/// Which two-path map an alternating-k-two-paths effect is evaluated over.
/// Unlike the triangle family, this statistic sums the alternating weight
/// over *every* dyad, not only existing arcs, so there is no "own term" and
/// no existence gating: every dyad whose cache entry moves contributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TwoPathKind {
    Mix,
    In,
    Out,
    Undirected,
}

fn get(cache: &TwoPathCache, kind: TwoPathKind, a: NodeId, b: NodeId) -> u64 {
    match kind {
        TwoPathKind::Mix => cache.get_mix(a, b),
        TwoPathKind::In => cache.get_in(a, b),
        TwoPathKind::Out => cache.get_out(a, b),
        TwoPathKind::Undirected => cache.get_two(a, b),
    }
}

/// `z = λ Σ_{a != b} [1 - (1-1/λ)^{weight(a,b)}]`, summed over all dyads of
/// the appropriate two-path map (§4.3: "Alternating k-two-paths:... analogous
/// closed forms").
#[derive(Debug, Clone)]
pub struct AltKTwoPathsEffect {
    name: String,
    kind: TwoPathKind,
    decay: DecayTable,
}

impl AltKTwoPathsEffect {
    pub fn new(name: impl Into<String>, kind: TwoPathKind, decay: DecayTable) -> Self {
        Self {
            name: name.into(),
            kind,
            decay,
        }
    }

    fn term(&self, count: u64) -> Weight {
        self.decay.lambda() * (1.0 - self.decay.power(count))
    }
}

impl Effect for AltKTwoPathsEffect {
    fn name(&self) -> &str {
        &self.name
    }

    fn delta(&self, ctx: &EffectContext, i: NodeId, j: NodeId) -> Weight {
        let graph = ctx.graph;
        let cache = ctx.cache;
        let inserting = !graph.has_edge(i, j);
        let mut total = 0.0;

        match self.kind {
            TwoPathKind::Mix => {
                for k in graph.neighbours(i, Direction::In) {
                    if k != j {
                        total += alternating_delta(&self.decay, cache.get_mix(k, j), inserting);
                    }
                }
                for k in graph.neighbours(j, Direction::Out) {
                    if k != i {
                        total += alternating_delta(&self.decay, cache.get_mix(i, k), inserting);
                    }
                }
            }
            TwoPathKind::In => {
                for s in graph.neighbours(i, Direction::Out) {
                    if s != j {
                        total += alternating_delta(&self.decay, cache.get_in(j, s), inserting);
                    }
                }
            }
            TwoPathKind::Out => {
                for p in graph.neighbours(j, Direction::In) {
                    if p != i {
                        total += alternating_delta(&self.decay, cache.get_out(p, i), inserting);
                    }
                }
            }
            TwoPathKind::Undirected => {
                for k in graph.neighbours(i, Direction::Out) {
                    if k != j {
                        total += alternating_delta(&self.decay, cache.get_two(j, k), inserting);
                    }
                }
                for k in graph.neighbours(j, Direction::Out) {
                    if k != i {
                        total += alternating_delta(&self.decay, cache.get_two(i, k), inserting);
                    }
                }
            }
        }
        total
    }

    fn direct(&self, ctx: &EffectContext) -> Weight {
        let n = ctx.graph.number_of_nodes();
        let mut total = 0.0;
        for a in 0..n {
            for b in 0..n {
                if a != b {
                    total += self.term(get(ctx.cache, self.kind, a, b));
                }
            }
        }
        // Every symmetric map counts each unordered dyad from both sides;
        // the directed `Mix` map is the only asymmetric one and is summed
        // in full above, matching its own ordered-pair definition.
        if matches!(self.kind, TwoPathKind::Mix) {
            total
        } else {
            total / 2.0
        }
    }
}
