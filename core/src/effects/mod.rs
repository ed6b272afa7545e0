//! The change-statistic library (§4.3): one `Effect` implementation per
//! named statistic in `structParams`/`attrParams`, each computing
//! Δzₖ(G, i, j) in terms of the two-path cache rather than by rescanning
//! the graph.

mod arc;
mod attribute_effects;
mod cycles;
mod registry;
mod stars;
mod triangles;
mod two_paths;

pub use arc::{ArcEffect, ReciprocityEffect};
pub use attribute_effects::*;
pub use cycles::{
    BipartiteAltK4CyclesAEffect, BipartiteAltKCyclesEffect, BipartiteCycleMode, FourCyclesEffect,
    PowerFourCyclesEffect,
};
pub use registry::{EffectRegistry, EffectSpec};
pub use stars::{AltKStarsEffect, StarKind};
pub use triangles::{AltKTrianglesEffect, AltKTrianglesUndirectedEffect, TriangleVariant};
pub use two_paths::{AltKTwoPathsEffect, TwoPathKind};

use crate::attributes::AttributeStore;
use crate::decay::DecayTable;
use crate::graph::Graph;
use crate::two_path_cache::TwoPathCache;
use crate::types::{NodeId, Weight};

/// Everything a change-statistic needs to read, borrowed read-only for the
/// duration of the call (§9: "both are borrowed read-only by
/// change-statistic functions").
pub struct EffectContext<'a> {
    pub graph: &'a Graph,
    pub cache: &'a TwoPathCache,
    pub attributes: &'a AttributeStore,
}

/// A single named, parameterised change-statistic.
///
/// `delta` must be pure: it observes `ctx` (which reflects the graph
/// *before* the candidate toggle) and returns
/// `zₖ(G ⊕ (i, j)) − zₖ(G)`. It must never mutate the graph or cache.
///
/// `direct` recomputes zₖ(G) from scratch; it exists only so tests can
/// check the correctness identity in §4.3 (summed change statistics equal
/// the direct statistic to within 1e-6). It is not used on the sampler's
/// hot path.
pub trait Effect: std::fmt::Debug + Send + Sync {
    fn name(&self) -> &str;

    fn delta(&self, ctx: &EffectContext, i: NodeId, j: NodeId) -> Weight;

    fn direct(&self, ctx: &EffectContext) -> Weight;

    /// Effects whose direct complexity is not sub-linear in N (§4.3: "any
    /// effect that fails this bar is marked 'slow'"). False for everything
    /// except `PowerFourCycles`.
    fn is_slow(&self) -> bool {
        false
    }
}

/// `λ · [(1 - 1/λ)^before − (1 - 1/λ)^after]`, the building block shared by
/// every alternating statistic (stars, triangles, two-paths, bipartite
/// cycles). `inserting` selects whether `after = before + 1` or
/// `before - 1`.
pub(crate) fn alternating_delta(decay: &DecayTable, before: u64, inserting: bool) -> Weight {
    let after = if inserting {
        before + 1
    } else {
        before.saturating_sub(1)
    };
    decay.lambda() * (decay.power(before) - decay.power(after))
}

/// `C(n, 2)` for a non-negative count, used by the four-cycle family.
pub(crate) fn binomial2(n: u64) -> Weight {
    if n == 0 {
        0.0
    } else {
        (n as f64) * ((n - 1) as f64) / 2.0
    }
}

pub(crate) fn signed(inserting: bool, magnitude: Weight) -> Weight {
    if inserting {
        magnitude
    } else {
        -magnitude
    }
}
