use super::{alternating_delta, Effect, EffectContext};
use crate::decay::DecayTable;
use crate::two_path_cache::TwoPathCache;
use crate::types::{Direction, NodeId, Weight};

/// The four directed alternating-k-triangle flavours (§3, §4.3), each keyed
/// to a different two-path map evaluated over the *existing* arcs of the
/// graph:
///
/// - `T` (transitive): for arc `a -> b`, weight `mix[a, b]` (paths `a -> k -> b`).
/// - `C` (cyclic): for arc `a -> b`, weight `mix[b, a]` (paths `b -> k -> a`).
/// - `D`: for arc `a -> b`, weight `out[a, b]` (shared successors of a, b).
/// - `U`: for arc `a -> b`, weight `in[a, b]` (shared predecessors of a, b).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriangleVariant {
    T,
    C,
    D,
    U,
}

fn weight_for(cache: &TwoPathCache, variant: TriangleVariant, a: NodeId, b: NodeId) -> u64 {
    match variant {
        TriangleVariant::T => cache.get_mix(a, b),
        TriangleVariant::C => cache.get_mix(b, a),
        TriangleVariant::D => cache.get_out(a, b),
        TriangleVariant::U => cache.get_in(a, b),
    }
}

/// `z = λ Σ_{arcs a->b} [1 - (1-1/λ)^{weight(a,b)}]` for directed graphs.
#[derive(Debug, Clone)]
pub struct AltKTrianglesEffect {
    name: String,
    variant: TriangleVariant,
    decay: DecayTable,
}

impl AltKTrianglesEffect {
    pub fn new(name: impl Into<String>, variant: TriangleVariant, decay: DecayTable) -> Self {
        Self {
            name: name.into(),
            variant,
            decay,
        }
    }

    fn own_term(&self, count: u64) -> Weight {
        self.decay.lambda() * (1.0 - self.decay.power(count))
    }
}

impl Effect for AltKTrianglesEffect {
    fn name(&self) -> &str {
        &self.name
    }

    fn delta(&self, ctx: &EffectContext, i: NodeId, j: NodeId) -> Weight {
        let graph = ctx.graph;
        let cache = ctx.cache;
        let inserting = !graph.has_edge(i, j);

        // Toggling i -> j never changes weight(i, j) itself (that weight
        // depends only on third nodes), so the arc's own term contributes
        // wholesale, gated on insertion/removal.
        let own = weight_for(cache, self.variant, i, j);
        let mut total = super::signed(inserting, self.own_term(own));

        // The other arcs whose weight(a, b) moves are exactly the dyads the
        // two-path cache itself touches when i -> j is toggled (see
        // `apply_directed_update`): mix moves at (k, j) for predecessors k of
        // i, and at (i, k) for successors k of j.
        match self.variant {
            TriangleVariant::T => {
                for k in graph.neighbours(i, Direction::In) {
                    if k != j && graph.has_edge(k, j) {
                        total += alternating_delta(&self.decay, cache.get_mix(k, j), inserting);
                    }
                }
                for k in graph.neighbours(j, Direction::Out) {
                    if k != i && graph.has_edge(i, k) {
                        total += alternating_delta(&self.decay, cache.get_mix(i, k), inserting);
                    }
                }
            }
            TriangleVariant::C => {
                // weight(a, b) = mix[b, a]; mix[k, j] feeds the term for arc
                // (j, k), mix[i, k] feeds the term for arc (k, i).
                for k in graph.neighbours(i, Direction::In) {
                    if k != j && graph.has_edge(j, k) {
                        total += alternating_delta(&self.decay, cache.get_mix(k, j), inserting);
                    }
                }
                for k in graph.neighbours(j, Direction::Out) {
                    if k != i && graph.has_edge(k, i) {
                        total += alternating_delta(&self.decay, cache.get_mix(i, k), inserting);
                    }
                }
            }
            TriangleVariant::D => {
                // out[p, i] moves for every predecessor p of j (p != i); it
                // feeds the term for arc (p, i).
                for p in graph.neighbours(j, Direction::In) {
                    if p != i && graph.has_edge(p, i) {
                        total += alternating_delta(&self.decay, cache.get_out(p, i), inserting);
                    }
                }
            }
            TriangleVariant::U => {
                // in[j, s] moves for every successor s of i (s != j); it
                // feeds the term for arc (j, s).
                for s in graph.neighbours(i, Direction::Out) {
                    if s != j && graph.has_edge(j, s) {
                        total += alternating_delta(&self.decay, cache.get_in(j, s), inserting);
                    }
                }
            }
        }
        total
    }

    fn direct(&self, ctx: &EffectContext) -> Weight {
        ctx.graph
            .iter_edges()
            .map(|(a, b)| self.own_term(weight_for(ctx.cache, self.variant, a, b)))
            .sum()
    }
}

/// `z = λ Σ_{edges a<b} [1 - (1-1/λ)^{two[a,b]}]` for undirected graphs:
/// alternating-k-triangles without a directed-triad flavour.
#[derive(Debug, Clone)]
pub struct AltKTrianglesUndirectedEffect {
    decay: DecayTable,
}

impl AltKTrianglesUndirectedEffect {
    pub fn new(decay: DecayTable) -> Self {
        Self { decay }
    }

    fn own_term(&self, count: u64) -> Weight {
        self.decay.lambda() * (1.0 - self.decay.power(count))
    }
}

impl Effect for AltKTrianglesUndirectedEffect {
    fn name(&self) -> &str {
        "AltKTriangles"
    }

    fn delta(&self, ctx: &EffectContext, i: NodeId, j: NodeId) -> Weight {
        let graph = ctx.graph;
        let cache = ctx.cache;
        let inserting = !graph.has_edge(i, j);

        let own = cache.get_two(i, j);
        let mut total = super::signed(inserting, self.own_term(own));

        for k in graph.neighbours(i, Direction::Out) {
            if k != j && graph.has_edge(j, k) {
                total += alternating_delta(&self.decay, cache.get_two(j, k), inserting);
            }
        }
        for k in graph.neighbours(j, Direction::Out) {
            if k != i && graph.has_edge(i, k) {
                total += alternating_delta(&self.decay, cache.get_two(i, k), inserting);
            }
        }
        total
    }

    fn direct(&self, ctx: &EffectContext) -> Weight {
        ctx.graph
            .iter_edges()
            .map(|(a, b)| self.own_term(ctx.cache.get_two(a, b)))
            .sum()
    }
}
