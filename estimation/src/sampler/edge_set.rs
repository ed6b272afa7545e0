//! A swap-remove edge list: lets the TNT and IFD samplers draw a uniformly
//! random *existing* edge in O(1) without rescanning the graph, and keeps
//! itself in lock-step with every `Chain::commit_toggle` the sampler makes.
//! Canonicalisation mirrors `Graph::iter_edges`: undirected and bipartite
//! edges are stored with the lower index first, directed arcs keep their
//! given orientation.

use hashbrown::HashMap;

use eenet_graph::NodeId;

#[derive(Debug, Clone)]
pub struct EdgeSet {
    symmetric: bool,
    edges: Vec<(NodeId, NodeId)>,
    position: HashMap<(NodeId, NodeId), usize>,
}

impl EdgeSet {
    pub fn new(symmetric: bool) -> Self {
        Self {
            symmetric,
            edges: Vec::new(),
            position: HashMap::new(),
        }
    }

    pub fn from_edges(symmetric: bool, edges: impl Iterator<Item = (NodeId, NodeId)>) -> Self {
        let mut set = Self::new(symmetric);
        for (i, j) in edges {
            set.insert(i, j);
        }
        set
    }

    fn key(&self, i: NodeId, j: NodeId) -> (NodeId, NodeId) {
        if self.symmetric && j < i {
            (j, i)
        } else {
            (i, j)
        }
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    pub fn insert(&mut self, i: NodeId, j: NodeId) {
        let key = self.key(i, j);
        if self.position.contains_key(&key) {
            return;
        }
        self.position.insert(key, self.edges.len());
        self.edges.push(key);
    }

    pub fn remove(&mut self, i: NodeId, j: NodeId) {
        let key = self.key(i, j);
        if let Some(pos) = self.position.remove(&key) {
            let last = self.edges.len() - 1;
            self.edges.swap(pos, last);
            self.edges.pop();
            if pos < self.edges.len() {
                let moved = self.edges[pos];
                self.position.insert(moved, pos);
            }
        }
    }

    pub fn nth(&self, index: usize) -> (NodeId, NodeId) {
        self.edges[index]
    }
}
