//! Incremental two-path caches (§3, §4.2). These are the data structure the
//! rest of the change-statistic library leans on to stay sub-linear: every
//! `update_after_edge_change` call visits only the neighbours of the two
//! toggled endpoints, never the whole graph.

use hashbrown::HashMap;

use crate::error::{EeError, Result};
use crate::graph::Graph;
use crate::types::{Count, Direction, NodeId};

/// Selects the backing storage for every pair-count map in a cache. Chosen
/// once at build time, the way the teacher's `TWOPATH_LOOKUP` /
/// `TWOPATH_HASHTABLES` compile-time switches become a runtime choice here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TwoPathStorage {
    /// O(N^2) memory, O(1) access. Good for dense, small-to-medium graphs.
    Dense,
    /// Sub-quadratic memory, O(1) expected access. Good for sparse, large graphs.
    Hash,
}

#[derive(Debug, Clone)]
struct DensePairCounter {
    n: usize,
    symmetric: bool,
    data: Vec<Count>,
}

impl DensePairCounter {
    fn new(n: usize, symmetric: bool) -> Self {
        Self {
            n,
            symmetric,
            data: vec![0; n * n],
        }
    }

    fn index(&self, i: NodeId, j: NodeId) -> usize {
        i as usize * self.n + j as usize
    }

    fn get(&self, i: NodeId, j: NodeId) -> Count {
        self.data[self.index(i, j)]
    }

    fn increment(&mut self, i: NodeId, j: NodeId) {
        self.data[self.index(i, j)] += 1;
        if self.symmetric && i != j {
            self.data[self.index(j, i)] += 1;
        }
    }

    fn decrement(&mut self, i: NodeId, j: NodeId) {
        let idx = self.index(i, j);
        debug_assert!(self.data[idx] > 0, "two-path count underflow at ({i}, {j})");
        self.data[idx] -= 1;
        if self.symmetric && i != j {
            let jdx = self.index(j, i);
            debug_assert!(self.data[jdx] > 0, "two-path count underflow at ({j}, {i})");
            self.data[jdx] -= 1;
        }
    }

    fn clear(&mut self) {
        self.data.iter_mut().for_each(|v| *v = 0);
    }
}

#[derive(Debug, Clone, Default)]
struct HashPairCounter {
    symmetric: bool,
    map: HashMap<(NodeId, NodeId), Count>,
}

impl HashPairCounter {
    fn new(symmetric: bool) -> Self {
        Self {
            symmetric,
            map: HashMap::new(),
        }
    }

    fn key(&self, i: NodeId, j: NodeId) -> (NodeId, NodeId) {
        if self.symmetric && j < i {
            (j, i)
        } else {
            (i, j)
        }
    }

    fn get(&self, i: NodeId, j: NodeId) -> Count {
        *self.map.get(&self.key(i, j)).unwrap_or(&0)
    }

    fn increment(&mut self, i: NodeId, j: NodeId) {
        *self.map.entry(self.key(i, j)).or_insert(0) += 1;
    }

    fn decrement(&mut self, i: NodeId, j: NodeId) {
        let key = self.key(i, j);
        match self.map.get_mut(&key) {
            Some(count) => {
                debug_assert!(*count > 0, "two-path count underflow at {:?}", key);
                *count -= 1;
                if *count == 0 {
                    // Zero entries must never be stored: hash absence IS zero.
                    self.map.remove(&key);
                }
            }
            None => debug_assert!(false, "decrement of an absent pair {:?}", key),
        }
    }

    fn clear(&mut self) {
        self.map.clear();
    }
}

/// A single pair-count map, behind whichever storage strategy was chosen.
#[derive(Debug, Clone)]
enum PairStore {
    Dense(DensePairCounter),
    Hash(HashPairCounter),
}

impl PairStore {
    fn new(storage: TwoPathStorage, n: usize, symmetric: bool) -> Self {
        match storage {
            TwoPathStorage::Dense => PairStore::Dense(DensePairCounter::new(n, symmetric)),
            TwoPathStorage::Hash => PairStore::Hash(HashPairCounter::new(symmetric)),
        }
    }

    fn get(&self, i: NodeId, j: NodeId) -> Count {
        match self {
            PairStore::Dense(d) => d.get(i, j),
            PairStore::Hash(h) => h.get(i, j),
        }
    }

    fn increment(&mut self, i: NodeId, j: NodeId) {
        match self {
            PairStore::Dense(d) => d.increment(i, j),
            PairStore::Hash(h) => h.increment(i, j),
        }
    }

    fn decrement(&mut self, i: NodeId, j: NodeId) {
        match self {
            PairStore::Dense(d) => d.decrement(i, j),
            PairStore::Hash(h) => h.decrement(i, j),
        }
    }

    fn clear(&mut self) {
        match self {
            PairStore::Dense(d) => d.clear(),
            PairStore::Hash(h) => h.clear(),
        }
    }
}

/// The incremental two-path cache. Which maps are populated depends on the
/// graph kind it was built for; only the accessors matching that kind should
/// be called (the sampler and change-statistic library both know the graph
/// kind they are working with, so this is an internal contract, not a
/// user-facing one).
#[derive(Debug, Clone)]
pub enum TwoPathCache {
    Directed {
        mix: PairStore,
        in_two: PairStore,
        out_two: PairStore,
    },
    Undirected {
        two: PairStore,
    },
    Bipartite {
        a2p: PairStore,
        b2p: PairStore,
    },
}

impl TwoPathCache {
    pub fn new_directed(number_of_nodes: usize, storage: TwoPathStorage) -> Self {
        TwoPathCache::Directed {
            mix: PairStore::new(storage, number_of_nodes, false),
            in_two: PairStore::new(storage, number_of_nodes, true),
            out_two: PairStore::new(storage, number_of_nodes, true),
        }
    }

    pub fn new_undirected(number_of_nodes: usize, storage: TwoPathStorage) -> Self {
        TwoPathCache::Undirected {
            two: PairStore::new(storage, number_of_nodes, true),
        }
    }

    pub fn new_bipartite(number_of_nodes: usize, storage: TwoPathStorage) -> Self {
        TwoPathCache::Bipartite {
            a2p: PairStore::new(storage, number_of_nodes, true),
            b2p: PairStore::new(storage, number_of_nodes, true),
        }
    }

    /// Builds an empty cache matching the shape of `graph`, then populates
    /// it with the graph's current edges via direct recomputation (a
    /// one-time O(N * average degree) pass; the incremental update path is
    /// reserved for the sampler's hot loop).
    pub fn from_graph(graph: &Graph, storage: TwoPathStorage) -> Self {
        let n = graph.number_of_nodes() as usize;
        let mut cache = if graph.is_directed() {
            Self::new_directed(n, storage)
        } else if graph.is_bipartite() {
            Self::new_bipartite(n, storage)
        } else {
            Self::new_undirected(n, storage)
        };
        cache.recompute_from_scratch(graph);
        cache
    }

    /// Clears and recomputes every map by direct neighbourhood intersection,
    /// bypassing the incremental path entirely. Used for cache
    /// initialisation and (in debug builds) as the ground truth that
    /// `assert_consistent` compares against.
    pub fn recompute_from_scratch(&mut self, graph: &Graph) {
        match self {
            TwoPathCache::Directed { mix, in_two, out_two } => {
                mix.clear();
                in_two.clear();
                out_two.clear();
                for i in 0..graph.number_of_nodes() {
                    for k in graph.neighbours(i, Direction::Out) {
                        for j in graph.neighbours(k, Direction::Out) {
                            if j != i {
                                mix.increment(i, j);
                            }
                        }
                    }
                }
                for i in 0..graph.number_of_nodes() {
                    for j in (i + 1)..graph.number_of_nodes() {
                        let common_in = count_common(
                            graph.neighbours(i, Direction::In),
                            graph.neighbours(j, Direction::In),
                        );
                        for _ in 0..common_in {
                            in_two.increment(i, j);
                        }
                        let common_out = count_common(
                            graph.neighbours(i, Direction::Out),
                            graph.neighbours(j, Direction::Out),
                        );
                        for _ in 0..common_out {
                            out_two.increment(i, j);
                        }
                    }
                }
            }
            TwoPathCache::Undirected { two } => {
                two.clear();
                for i in 0..graph.number_of_nodes() {
                    for j in (i + 1)..graph.number_of_nodes() {
                        let common = count_common(
                            graph.neighbours(i, Direction::Out),
                            graph.neighbours(j, Direction::Out),
                        );
                        for _ in 0..common {
                            two.increment(i, j);
                        }
                    }
                }
            }
            TwoPathCache::Bipartite { a2p, b2p } => {
                a2p.clear();
                b2p.clear();
                for i in 0..graph.number_of_nodes() {
                    for j in (i + 1)..graph.number_of_nodes() {
                        if graph.mode_of(i) != graph.mode_of(j) {
                            continue;
                        }
                        let common = count_common(
                            graph.neighbours(i, Direction::Out),
                            graph.neighbours(j, Direction::Out),
                        );
                        if common == 0 {
                            continue;
                        }
                        let target = match graph.mode_of(i) {
                            crate::types::Mode::A => &mut *a2p,
                            crate::types::Mode::B => &mut *b2p,
                        };
                        for _ in 0..common {
                            target.increment(i, j);
                        }
                    }
                }
            }
        }
    }

    pub fn get_mix(&self, i: NodeId, j: NodeId) -> Count {
        match self {
            TwoPathCache::Directed { mix, .. } => mix.get(i, j),
            _ => unreachable!("get_mix called on a non-directed cache"),
        }
    }

    pub fn get_in(&self, i: NodeId, j: NodeId) -> Count {
        match self {
            TwoPathCache::Directed { in_two, .. } => in_two.get(i, j),
            _ => unreachable!("get_in called on a non-directed cache"),
        }
    }

    pub fn get_out(&self, i: NodeId, j: NodeId) -> Count {
        match self {
            TwoPathCache::Directed { out_two, .. } => out_two.get(i, j),
            _ => unreachable!("get_out called on a non-directed cache"),
        }
    }

    pub fn get_two(&self, i: NodeId, j: NodeId) -> Count {
        match self {
            TwoPathCache::Undirected { two } => two.get(i, j),
            _ => unreachable!("get_two called on a non-undirected cache"),
        }
    }

    pub fn get_a2p(&self, i: NodeId, j: NodeId) -> Count {
        match self {
            TwoPathCache::Bipartite { a2p, .. } => a2p.get(i, j),
            _ => unreachable!("get_a2p called on a non-bipartite cache"),
        }
    }

    pub fn get_b2p(&self, i: NodeId, j: NodeId) -> Count {
        match self {
            TwoPathCache::Bipartite { b2p, .. } => b2p.get(i, j),
            _ => unreachable!("get_b2p called on a non-bipartite cache"),
        }
    }

    /// Brings the cache into consistency with `graph` after edge `(i, j)`
    /// has already been toggled in `graph`, touching only the neighbours of
    /// `i` and `j` (§4.2). `delta` is `+1` for an insertion, `-1` for a
    /// deletion.
    pub fn update_after_edge_change(&mut self, graph: &Graph, i: NodeId, j: NodeId, delta: i8) {
        debug_assert!(delta == 1 || delta == -1);
        match self {
            TwoPathCache::Directed { mix, in_two, out_two } => {
                apply_directed_update(mix, in_two, out_two, graph, i, j, delta);
            }
            TwoPathCache::Undirected { two } => {
                apply_undirected_update(two, graph, i, j, delta);
            }
            TwoPathCache::Bipartite { a2p, b2p } => {
                apply_bipartite_update(a2p, b2p, graph, i, j, delta);
            }
        }
    }

    /// Debug-only ground-truth check: recomputes a sibling cache from
    /// scratch and compares every entry against `self`. Fatal on mismatch,
    /// per the `CacheInconsistency` error taxonomy entry.
    #[cfg(debug_assertions)]
    pub fn assert_consistent(&self, graph: &Graph) -> Result<()> {
        let mut shadow = self.empty_clone();
        shadow.recompute_from_scratch(graph);
        if !self.matches(&shadow, graph.number_of_nodes()) {
            return Err(EeError::CacheInconsistency(
                "two-path cache diverged from direct recomputation".to_string(),
            ));
        }
        Ok(())
    }

    #[cfg(debug_assertions)]
    fn empty_clone(&self) -> Self {
        let storage = |p: &PairStore| match p {
            PairStore::Dense(_) => TwoPathStorage::Dense,
            PairStore::Hash(_) => TwoPathStorage::Hash,
        };
        match self {
            TwoPathCache::Directed { mix, .. } => {
                let n = match mix {
                    PairStore::Dense(d) => d.n,
                    PairStore::Hash(_) => 0,
                };
                TwoPathCache::new_directed(n, storage(mix))
            }
            TwoPathCache::Undirected { two } => {
                let n = match two {
                    PairStore::Dense(d) => d.n,
                    PairStore::Hash(_) => 0,
                };
                TwoPathCache::new_undirected(n, storage(two))
            }
            TwoPathCache::Bipartite { a2p, .. } => {
                let n = match a2p {
                    PairStore::Dense(d) => d.n,
                    PairStore::Hash(_) => 0,
                };
                TwoPathCache::new_bipartite(n, storage(a2p))
            }
        }
    }

    #[cfg(debug_assertions)]
    fn matches(&self, other: &Self, n: NodeId) -> bool {
        let pairwise = |a: &PairStore, b: &PairStore| {
            (0..n).all(|i| (0..n).all(|j| a.get(i, j) == b.get(i, j)))
        };
        match (self, other) {
            (
                TwoPathCache::Directed { mix: m1, in_two: i1, out_two: o1 },
                TwoPathCache::Directed { mix: m2, in_two: i2, out_two: o2 },
            ) => pairwise(m1, m2) && pairwise(i1, i2) && pairwise(o1, o2),
            (TwoPathCache::Undirected { two: t1 }, TwoPathCache::Undirected { two: t2 }) => {
                pairwise(t1, t2)
            }
            (
                TwoPathCache::Bipartite { a2p: a1, b2p: b1 },
                TwoPathCache::Bipartite { a2p: a2, b2p: b2 },
            ) => pairwise(a1, a2) && pairwise(b1, b2),
            _ => false,
        }
    }
}

fn count_common(a: impl Iterator<Item = NodeId>, b: impl Iterator<Item = NodeId>) -> u64 {
    let b_set: hashbrown::HashSet<NodeId> = b.collect();
    a.filter(|x| b_set.contains(x)).count() as u64
}

fn step(store: &mut PairStore, i: NodeId, j: NodeId, delta: i8) {
    if delta > 0 {
        store.increment(i, j);
    } else {
        store.decrement(i, j);
    }
}

fn apply_directed_update(
    mix: &mut PairStore,
    in_two: &mut PairStore,
    out_two: &mut PairStore,
    graph: &Graph,
    i: NodeId,
    j: NodeId,
    delta: i8,
) {
    // mix[k, j] changes for every predecessor k of i (k != j): k -> i -> j.
    for k in graph.neighbours(i, Direction::In) {
        if k != j {
            step(mix, k, j, delta);
        }
    }
    // mix[i, k] changes for every successor k of j (k != i): i -> j -> k.
    for k in graph.neighbours(j, Direction::Out) {
        if k != i {
            step(mix, i, k, delta);
        }
    }
    // in[j, s] changes for every successor s of i (s != j): i is now (or was)
    // a shared predecessor of j and s.
    for s in graph.neighbours(i, Direction::Out) {
        if s != j {
            step(in_two, j, s, delta);
        }
    }
    // out[p, i] changes for every predecessor p of j (p != i): j is now (or
    // was) a shared successor of p and i.
    for p in graph.neighbours(j, Direction::In) {
        if p != i {
            step(out_two, p, i, delta);
        }
    }
}

fn apply_undirected_update(two: &mut PairStore, graph: &Graph, i: NodeId, j: NodeId, delta: i8) {
    for k in graph.neighbours(i, Direction::Out) {
        if k != j {
            step(two, j, k, delta);
        }
    }
    for k in graph.neighbours(j, Direction::Out) {
        if k != i {
            step(two, i, k, delta);
        }
    }
}

fn apply_bipartite_update(
    a2p: &mut PairStore,
    b2p: &mut PairStore,
    graph: &Graph,
    a: NodeId,
    b: NodeId,
    delta: i8,
) {
    // a is mode A, b is mode B, by construction of every caller in this crate.
    for other_a in graph.neighbours(b, Direction::Out) {
        if other_a != a {
            step(a2p, a, other_a, delta);
        }
    }
    for other_b in graph.neighbours(a, Direction::Out) {
        if other_b != b {
            step(b2p, b, other_b, delta);
        }
    }
}
