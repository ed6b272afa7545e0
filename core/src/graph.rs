use indexmap::IndexSet;

use crate::error::{EeError, Result};
use crate::types::{Direction, Mode, NodeId};

/// Immutable shape of a graph, fixed at construction time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GraphShape {
    pub number_of_nodes: NodeId,
    pub directed: bool,
    pub bipartite: bool,
    /// Only meaningful when `bipartite` is true: nodes `0..mode_a_count` are
    /// mode A, the rest are mode B.
    pub mode_a_count: NodeId,
    pub allow_loops: bool,
}

impl GraphShape {
    pub fn validate(&self) -> Result<()> {
        if self.bipartite && self.mode_a_count > self.number_of_nodes {
            return Err(EeError::InvalidGraph(format!(
                "mode-A count {} exceeds the total node count {}",
                self.mode_a_count, self.number_of_nodes
            )));
        }
        if self.bipartite && self.directed {
            return Err(EeError::InvalidGraph(
                "bipartite graphs are not combined with directedness in this model".to_string(),
            ));
        }
        Ok(())
    }
}

/// A mutable graph supporting amortised O(1) edge insertion/deletion and
/// stable, insertion-ordered neighbour enumeration.
///
/// Directed graphs maintain separate out- and in-adjacency. Undirected and
/// bipartite graphs maintain a single symmetric adjacency and answer both
/// `Direction`s from it.
#[derive(Debug, Clone)]
pub struct Graph {
    shape: GraphShape,
    name: String,
    out_adjacency: Vec<IndexSet<NodeId>>,
    in_adjacency: Vec<IndexSet<NodeId>>,
    number_of_edges: u64,
}

impl Graph {
    /// Builds an edgeless graph of the given shape.
    pub fn new(shape: GraphShape, name: impl Into<String>) -> Result<Self> {
        shape.validate()?;
        let n = shape.number_of_nodes as usize;
        let in_adjacency = if shape.directed {
            vec![IndexSet::new(); n]
        } else {
            Vec::new()
        };
        Ok(Self {
            shape,
            name: name.into(),
            out_adjacency: vec![IndexSet::new(); n],
            in_adjacency,
            number_of_edges: 0,
        })
    }

    pub fn shape(&self) -> GraphShape {
        self.shape
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn number_of_nodes(&self) -> NodeId {
        self.shape.number_of_nodes
    }

    pub fn number_of_edges(&self) -> u64 {
        self.number_of_edges
    }

    pub fn is_directed(&self) -> bool {
        self.shape.directed
    }

    pub fn is_bipartite(&self) -> bool {
        self.shape.bipartite
    }

    /// Total possible number of (ordered or unordered, as appropriate) edges
    /// `D` used by the TNT acceptance correction.
    pub fn max_possible_edges(&self) -> u64 {
        let n = self.shape.number_of_nodes as u64;
        if self.shape.bipartite {
            let a = self.shape.mode_a_count as u64;
            let b = n - a;
            a * b
        } else if self.shape.directed {
            n * (n - 1)
        } else {
            n * (n - 1) / 2
        }
    }

    pub fn density(&self) -> f64 {
        let max_edges = self.max_possible_edges();
        if max_edges == 0 {
            0.0
        } else {
            self.number_of_edges as f64 / max_edges as f64
        }
    }

    pub fn mode_of(&self, i: NodeId) -> Mode {
        debug_assert!(self.shape.bipartite, "mode_of is only defined for bipartite graphs");
        if i < self.shape.mode_a_count {
            Mode::A
        } else {
            Mode::B
        }
    }

    fn check_bounds(&self, i: NodeId) -> Result<()> {
        if i >= self.shape.number_of_nodes {
            return Err(EeError::InvalidEdge {
                i,
                j: i,
                reason: format!("node id out of range (0..{})", self.shape.number_of_nodes),
            });
        }
        Ok(())
    }

    fn check_endpoints(&self, i: NodeId, j: NodeId) -> Result<()> {
        self.check_bounds(i)?;
        self.check_bounds(j)?;
        if i == j && !self.shape.allow_loops {
            return Err(EeError::InvalidEdge {
                i,
                j,
                reason: "self-loops are not allowed by this graph's configuration".to_string(),
            });
        }
        if self.shape.bipartite && self.mode_of(i) == self.mode_of(j) {
            return Err(EeError::InvalidEdge {
                i,
                j,
                reason: "bipartite edges must cross modes".to_string(),
            });
        }
        Ok(())
    }

    pub fn has_edge(&self, i: NodeId, j: NodeId) -> bool {
        self.out_adjacency[i as usize].contains(&j)
    }

    /// Inserts edge `(i, j)`. Requires `!has_edge(i, j)`. Does not touch any
    /// two-path cache; callers (the sampler) are responsible for calling
    /// `TwoPathCache::update_after_edge_change` around this.
    pub fn insert_edge(&mut self, i: NodeId, j: NodeId) -> Result<()> {
        self.check_endpoints(i, j)?;
        if self.has_edge(i, j) {
            return Err(EeError::InvalidEdge {
                i,
                j,
                reason: "edge already present".to_string(),
            });
        }
        self.out_adjacency[i as usize].insert(j);
        if self.shape.directed {
            self.in_adjacency[j as usize].insert(i);
        } else {
            self.out_adjacency[j as usize].insert(i);
        }
        self.number_of_edges += 1;
        Ok(())
    }

    /// Removes edge `(i, j)`. Requires `has_edge(i, j)`.
    pub fn remove_edge(&mut self, i: NodeId, j: NodeId) -> Result<()> {
        self.check_bounds(i)?;
        self.check_bounds(j)?;
        if !self.has_edge(i, j) {
            return Err(EeError::InvalidEdge {
                i,
                j,
                reason: "edge not present".to_string(),
            });
        }
        // `swap_remove` moves the last element into the removed slot rather
        // than shifting every later element down, keeping removal O(1); it
        // still gives each toggle sequence a single, deterministic outcome,
        // which is all reproducibility (§4.4) requires of iteration order.
        self.out_adjacency[i as usize].swap_remove(&j);
        if self.shape.directed {
            self.in_adjacency[j as usize].swap_remove(&i);
        } else {
            self.out_adjacency[j as usize].swap_remove(&i);
        }
        self.number_of_edges -= 1;
        Ok(())
    }

    /// Toggles edge `(i, j)`: inserts it if absent, removes it if present.
    /// Returns whether the edge was inserted (`true`) or removed (`false`).
    pub fn toggle_edge(&mut self, i: NodeId, j: NodeId) -> Result<bool> {
        if self.has_edge(i, j) {
            self.remove_edge(i, j)?;
            Ok(false)
        } else {
            self.insert_edge(i, j)?;
            Ok(true)
        }
    }

    /// Iterates the neighbours of `i` in stable, insertion-ordered order.
    /// For undirected and bipartite graphs `direction` is ignored, since
    /// adjacency is symmetric.
    pub fn neighbours(&self, i: NodeId, direction: Direction) -> impl Iterator<Item = NodeId> + '_ {
        let adjacency = if self.shape.directed {
            match direction {
                Direction::Out => &self.out_adjacency,
                Direction::In => &self.in_adjacency,
            }
        } else {
            &self.out_adjacency
        };
        adjacency[i as usize].iter().copied()
    }

    pub fn degree(&self, i: NodeId, direction: Direction) -> u64 {
        self.neighbours(i, direction).count() as u64
    }

    /// Enumerates all edges in stable order, yielding each undirected edge
    /// once and each directed arc once.
    pub fn iter_edges(&self) -> impl Iterator<Item = (NodeId, NodeId)> + '_ {
        self.out_adjacency.iter().enumerate().flat_map(move |(i, neighbours)| {
            let i = i as NodeId;
            let directed = self.shape.directed;
            neighbours.iter().copied().filter_map(move |j| {
                if directed || i < j {
                    Some((i, j))
                } else {
                    None
                }
            })
        })
    }
}
