//! Shared scalar type aliases, mirrored after the teacher's `NodeT` / `EdgeT`
//! convention so that the rest of the crate reads as ordinary arithmetic
//! rather than a maze of `usize`/`u64` casts.

/// Node index. Nodes are numbered `0..N`.
pub type NodeId = u32;

/// A two-path (or triad/cycle) count. Per the documented invariant, these
/// never overflow into signed territory: they are unsigned 64-bit from the
/// start.
pub type Count = u64;

/// A natural parameter, sufficient statistic, or change-statistic value.
pub type Weight = f64;

/// Decay parameter λ for alternating statistics. Must be strictly greater
/// than 1 wherever it is used; effects that do not use decay leave it unset.
pub type Decay = f64;

/// Which side of a directed adjacency query is wanted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    In,
    Out,
}

/// Bipartite node class. Mode A nodes are `0..mode_a_count`, the rest are
/// mode B.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    A,
    B,
}
