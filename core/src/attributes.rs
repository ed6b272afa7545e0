//! Per-node attribute store: binary, categorical, continuous and set-valued
//! arrays, each with a first-class NA sentinel, keyed by name the way the
//! teacher keys its node/edge type vocabularies.

use hashbrown::HashSet;
use indexmap::IndexMap;

use crate::error::{EeError, Result};
use crate::types::NodeId;

#[derive(Debug, Clone, Default)]
pub struct AttributeStore {
    binary: IndexMap<String, Vec<Option<bool>>>,
    categorical: IndexMap<String, Vec<Option<u64>>>,
    continuous: IndexMap<String, Vec<Option<f64>>>,
    set_valued: IndexMap<String, Vec<Option<HashSet<u64>>>>,
}

impl AttributeStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn check_len(&self, name: &str, values: &[impl Sized], number_of_nodes: usize) -> Result<()> {
        if values.len() != number_of_nodes {
            return Err(EeError::Config(format!(
                "attribute '{}' has {} values but the graph has {} nodes",
                name,
                values.len(),
                number_of_nodes
            )));
        }
        Ok(())
    }

    pub fn add_binary(&mut self, name: impl Into<String>, values: Vec<Option<bool>>, number_of_nodes: usize) -> Result<()> {
        let name = name.into();
        self.check_len(&name, &values, number_of_nodes)?;
        self.binary.insert(name, values);
        Ok(())
    }

    pub fn add_categorical(&mut self, name: impl Into<String>, values: Vec<Option<u64>>, number_of_nodes: usize) -> Result<()> {
        let name = name.into();
        self.check_len(&name, &values, number_of_nodes)?;
        self.categorical.insert(name, values);
        Ok(())
    }

    pub fn add_continuous(&mut self, name: impl Into<String>, values: Vec<Option<f64>>, number_of_nodes: usize) -> Result<()> {
        let name = name.into();
        self.check_len(&name, &values, number_of_nodes)?;
        self.continuous.insert(name, values);
        Ok(())
    }

    pub fn add_set_valued(&mut self, name: impl Into<String>, values: Vec<Option<HashSet<u64>>>, number_of_nodes: usize) -> Result<()> {
        let name = name.into();
        self.check_len(&name, &values, number_of_nodes)?;
        self.set_valued.insert(name, values);
        Ok(())
    }

    pub fn binary(&self, name: &str, node: NodeId) -> Option<bool> {
        self.binary.get(name).and_then(|v| v[node as usize])
    }

    pub fn categorical(&self, name: &str, node: NodeId) -> Option<u64> {
        self.categorical.get(name).and_then(|v| v[node as usize])
    }

    pub fn continuous(&self, name: &str, node: NodeId) -> Option<f64> {
        self.continuous.get(name).and_then(|v| v[node as usize])
    }

    pub fn set_valued(&self, name: &str, node: NodeId) -> Option<&HashSet<u64>> {
        self.set_valued.get(name).and_then(|v| v[node as usize].as_ref())
    }

    pub fn has_binary(&self, name: &str) -> bool {
        self.binary.contains_key(name)
    }

    pub fn has_categorical(&self, name: &str) -> bool {
        self.categorical.contains_key(name)
    }

    pub fn has_continuous(&self, name: &str) -> bool {
        self.continuous.contains_key(name)
    }

    pub fn has_set_valued(&self, name: &str) -> bool {
        self.set_valued.contains_key(name)
    }
}

/// Jaccard similarity between two (possibly absent) sets, `0.0` when either
/// side is `None` or both sets are empty is defined as `0.0` to keep the
/// change-statistic finite.
pub fn jaccard_similarity(a: Option<&HashSet<u64>>, b: Option<&HashSet<u64>>) -> f64 {
    match (a, b) {
        (Some(a), Some(b)) => {
            if a.is_empty() && b.is_empty() {
                return 0.0;
            }
            let intersection = a.intersection(b).count();
            let union = a.union(b).count();
            if union == 0 {
                0.0
            } else {
                intersection as f64 / union as f64
            }
        }
        _ => 0.0,
    }
}
