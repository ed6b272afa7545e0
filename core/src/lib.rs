//! Graph store, two-path caches, attribute tables and the change-statistic
//! library that the estimation and I/O crates build on.

pub mod attributes;
pub mod chain;
pub mod decay;
pub mod effects;
pub mod error;
pub mod graph;
pub mod two_path_cache;
pub mod types;

pub use attributes::AttributeStore;
pub use chain::Chain;
pub use decay::DecayTable;
pub use error::{EeError, Result};
pub use graph::{Graph, GraphShape};
pub use two_path_cache::{TwoPathCache, TwoPathStorage};
pub use types::{Count, Direction, Mode, NodeId, Weight};
