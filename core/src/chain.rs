//! The `Chain` aggregate (§9): a graph, its two-path cache, its attribute
//! table and the effect registry evaluated over them, kept mutually
//! consistent as edges are toggled. Samplers and the estimator drive a
//! `Chain`; they never touch `Graph`/`TwoPathCache` directly.

use crate::attributes::AttributeStore;
use crate::effects::{EffectContext, EffectRegistry};
use crate::error::Result;
use crate::graph::Graph;
use crate::two_path_cache::{TwoPathCache, TwoPathStorage};
use crate::types::{NodeId, Weight};

#[derive(Debug)]
pub struct Chain {
    graph: Graph,
    cache: TwoPathCache,
    attributes: AttributeStore,
    registry: EffectRegistry,
    /// Current zₖ(G) for every effect in `registry`, maintained
    /// incrementally by `commit_toggle` rather than recomputed each sweep.
    current_statistics: Vec<Weight>,
}

impl Chain {
    pub fn new(graph: Graph, storage: TwoPathStorage, attributes: AttributeStore, registry: EffectRegistry) -> Self {
        let cache = TwoPathCache::from_graph(&graph, storage);
        let current_statistics = {
            let ctx = EffectContext {
                graph: &graph,
                cache: &cache,
                attributes: &attributes,
            };
            registry.direct_vector(&ctx)
        };
        Self {
            graph,
            cache,
            attributes,
            registry,
            current_statistics,
        }
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn attributes(&self) -> &AttributeStore {
        &self.attributes
    }

    pub fn registry(&self) -> &EffectRegistry {
        &self.registry
    }

    /// Current zₖ(G), in registry order.
    pub fn statistics(&self) -> &[Weight] {
        &self.current_statistics
    }

    pub fn context(&self) -> EffectContext {
        EffectContext {
            graph: &self.graph,
            cache: &self.cache,
            attributes: &self.attributes,
        }
    }

    /// Δz for every effect if `(i, j)` were toggled next. Does not mutate
    /// anything; callers use this to decide whether to accept a proposal
    /// before calling `commit_toggle`.
    pub fn delta_for(&self, i: NodeId, j: NodeId) -> Vec<Weight> {
        self.registry.delta_vector(&self.context(), i, j)
    }

    /// Applies a previously-computed toggle: flips the edge, brings the
    /// two-path cache up to date, and folds `deltas` into the running
    /// statistics vector. `deltas` must be exactly the vector `delta_for`
    /// returned for this same `(i, j)` against the current state.
    pub fn commit_toggle(&mut self, i: NodeId, j: NodeId, deltas: &[Weight]) -> Result<bool> {
        let inserted = self.graph.toggle_edge(i, j)?;
        let sign: i8 = if inserted { 1 } else { -1 };
        self.cache.update_after_edge_change(&self.graph, i, j, sign);
        for (z, d) in self.current_statistics.iter_mut().zip(deltas) {
            *z += d;
        }
        #[cfg(debug_assertions)]
        self.cache.assert_consistent(&self.graph)?;
        Ok(inserted)
    }

    /// Recomputes `current_statistics` from scratch. Used by tests checking
    /// the correctness identity, and by the simulator when starting a fresh
    /// run from a loaded graph.
    pub fn resync_statistics(&mut self) {
        let ctx = self.context();
        self.current_statistics = self.registry.direct_vector(&ctx);
    }
}
